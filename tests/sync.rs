#[cfg(test)]
mod tests {
    use taskflow::db::db::Db;
    use taskflow::db::projects::Projects;
    use taskflow::db::tags::Tags;
    use taskflow::db::tasks::Tasks;
    use taskflow::libs::project::ProjectMode;
    use taskflow::libs::sync::{last_sync_time, reconcile, SyncManager, SyncState};
    use taskflow::libs::task::NewTask;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SyncTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for SyncTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            SyncTestContext { _temp_dir: temp_dir }
        }
    }

    fn seed_tagged_task(pid: i64) -> i64 {
        let mut tasks = Tasks::new().unwrap();
        let task = tasks
            .create(
                NewTask {
                    title: "Seeded".to_string(),
                    project_id: Some(pid),
                    tags: vec!["urgent".to_string()],
                    ..Default::default()
                },
                ProjectMode::Personal,
                0,
            )
            .unwrap();
        task.id.unwrap()
    }

    #[test_context(SyncTestContext)]
    #[test]
    fn test_reconcile_on_clean_database_repairs_nothing(_ctx: &mut SyncTestContext) {
        let mut projects = Projects::new().unwrap();
        let pid = projects.create("Clean", ProjectMode::Personal).unwrap().id.unwrap();
        seed_tagged_task(pid);

        let mut db = Db::new().unwrap();
        let report = reconcile(&mut db.conn).unwrap();
        assert!(report.is_clean());
    }

    #[test_context(SyncTestContext)]
    #[test]
    fn test_reconcile_repairs_corrupted_counters(_ctx: &mut SyncTestContext) {
        let mut projects = Projects::new().unwrap();
        let pid = projects.create("Drifted", ProjectMode::Personal).unwrap().id.unwrap();
        seed_tagged_task(pid);

        // Corrupt the denormalized counters behind the stores' backs
        let mut db = Db::new().unwrap();
        db.conn
            .execute("UPDATE projects SET task_count = 99, completed_task_count = 7 WHERE id = ?1", [pid])
            .unwrap();
        db.conn.execute("UPDATE tags SET usage_count = 42", []).unwrap();

        let report = reconcile(&mut db.conn).unwrap();
        assert_eq!(report.projects_repaired, 1);
        assert_eq!(report.tags_repaired, 1);

        let project = projects.get_by_id(pid).unwrap().unwrap();
        assert_eq!(project.task_count, 1);
        assert_eq!(project.completed_task_count, 0);

        let mut tags = Tags::new().unwrap();
        let tag = tags.get_by_name("urgent").unwrap().unwrap();
        assert_eq!(tag.usage_count, 1);
    }

    #[test_context(SyncTestContext)]
    #[test]
    fn test_reconcile_stamps_last_sync_time(_ctx: &mut SyncTestContext) {
        let mut db = Db::new().unwrap();
        assert!(last_sync_time(&db.conn).unwrap().is_none());

        let before = chrono::Utc::now();
        reconcile(&mut db.conn).unwrap();

        let stamped = last_sync_time(&db.conn).unwrap().unwrap();
        assert!(stamped >= before);
    }

    #[test_context(SyncTestContext)]
    #[test]
    fn test_reconcile_ignores_soft_deleted_tasks(_ctx: &mut SyncTestContext) {
        let mut projects = Projects::new().unwrap();
        let pid = projects.create("Ghosts", ProjectMode::Personal).unwrap().id.unwrap();
        let tid = seed_tagged_task(pid);

        let mut tasks = Tasks::new().unwrap();
        tasks.delete(tid).unwrap();

        let mut db = Db::new().unwrap();
        let report = reconcile(&mut db.conn).unwrap();
        assert!(report.is_clean());
        assert_eq!(projects.get_by_id(pid).unwrap().unwrap().task_count, 0);
    }

    #[test_context(SyncTestContext)]
    #[test]
    fn test_run_once_reports_and_notifies(_ctx: &mut SyncTestContext) {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let mut projects = Projects::new().unwrap();
        let pid = projects.create("Watched", ProjectMode::Personal).unwrap().id.unwrap();
        seed_tagged_task(pid);

        Db::new()
            .unwrap()
            .conn
            .execute("UPDATE projects SET task_count = 5 WHERE id = ?1", [pid])
            .unwrap();

        let events = Arc::new(AtomicUsize::new(0));
        let seen = events.clone();
        let manager = SyncManager::new(30).with_observer(move |_event| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(manager.state(), SyncState::Idle);
        let report = manager.run_once().unwrap();
        assert_eq!(report.projects_repaired, 1);
        assert_eq!(manager.state(), SyncState::Idle);
        assert_eq!(events.load(Ordering::SeqCst), 1);
    }
}
