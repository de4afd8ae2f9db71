use crate::libs::export::{ExportFormat, Exporter};
use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportTarget {
    Tasks,
    Projects,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// What to export
    #[arg(value_enum, default_value_t = ExportTarget::Tasks)]
    target: ExportTarget,
    /// Output format: csv or json
    #[arg(short, long, default_value = "csv")]
    format: String,
    /// Output file path (defaults to a timestamped name)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    let format = ExportFormat::parse(&args.format)
        .ok_or_else(|| anyhow::anyhow!("unknown export format '{}', expected csv|json", args.format))?;
    let exporter = Exporter::new(format, args.output);

    match args.target {
        ExportTarget::Tasks => exporter.export_tasks(),
        ExportTarget::Projects => exporter.export_projects(),
    }
}
