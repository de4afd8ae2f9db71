#[cfg(test)]
mod tests {
    use taskflow::db::projects::Projects;
    use taskflow::db::tasks::Tasks;
    use taskflow::libs::export::{ExportFormat, Exporter};
    use taskflow::libs::project::ProjectMode;
    use taskflow::libs::task::NewTask;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ExportTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for ExportTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ExportTestContext { temp_dir }
        }
    }

    fn seed() -> i64 {
        let mut projects = Projects::new().unwrap();
        let mut tasks = Tasks::new().unwrap();
        let pid = projects.create("Exported", ProjectMode::Personal).unwrap().id.unwrap();
        let task = tasks
            .create(
                NewTask {
                    title: "Ship it".to_string(),
                    project_id: Some(pid),
                    tags: vec!["release".to_string()],
                    ..Default::default()
                },
                ProjectMode::Personal,
                0,
            )
            .unwrap();
        tasks.toggle_complete(task.id.unwrap(), true).unwrap();
        pid
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_tasks_json(ctx: &mut ExportTestContext) {
        seed();
        let out = ctx.temp_dir.path().join("tasks.json");

        Exporter::new(ExportFormat::Json, Some(out.clone())).export_tasks().unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title"], "Ship it");
        assert_eq!(rows[0]["project"], "Exported");
        assert_eq!(rows[0]["tags"], "release");
        assert_eq!(rows[0]["completed"], true);
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_tasks_csv(ctx: &mut ExportTestContext) {
        seed();
        let out = ctx.temp_dir.path().join("tasks.csv");

        Exporter::new(ExportFormat::Csv, Some(out.clone())).export_tasks().unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert!(header.contains("title"));
        assert!(header.contains("project"));
        let row = lines.next().unwrap();
        assert!(row.contains("Ship it"));
        assert!(row.contains("release"));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_export_projects_includes_counters(ctx: &mut ExportTestContext) {
        seed();
        let out = ctx.temp_dir.path().join("projects.json");

        Exporter::new(ExportFormat::Json, Some(out.clone())).export_projects().unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        let rows = json.as_array().unwrap();
        let exported = rows.iter().find(|p| p["name"] == "Exported").unwrap();
        assert_eq!(exported["task_count"], 1);
        assert_eq!(exported["completed_task_count"], 1);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("xlsx"), None);
    }
}
