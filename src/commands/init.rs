use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::msg_success;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write defaults without the interactive wizard
    #[arg(long)]
    defaults: bool,
}

pub fn cmd(args: InitArgs) -> Result<()> {
    let config = if args.defaults { Config::default() } else { Config::init()? };
    config.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
