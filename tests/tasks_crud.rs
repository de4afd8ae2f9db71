#[cfg(test)]
mod tests {
    use taskflow::db::projects::Projects;
    use taskflow::db::tasks::Tasks;
    use taskflow::libs::project::ProjectMode;
    use taskflow::libs::task::{NewTask, TaskFilter, TaskPatch, TaskStatus};
    use taskflow::libs::validation::ErrorCode;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct TaskTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for TaskTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            TaskTestContext { _temp_dir: temp_dir }
        }
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_create_defaults(_ctx: &mut TaskTestContext) {
        let mut tasks = Tasks::new().unwrap();

        let task = tasks.create(NewTask::new("Write report"), ProjectMode::Personal, 0).unwrap();
        assert!(!task.completed);
        assert_eq!(task.status, TaskStatus::Todo);
        assert!(task.due_date.is_some());
        assert!(task.position > 0);
        assert!(!task.is_deleted);

        // Created without a project, the task lands in the mode's Inbox
        let mut projects = Projects::new().unwrap();
        let inbox = projects.get_or_create_default(ProjectMode::Personal).unwrap();
        assert_eq!(task.project_id, inbox.id.unwrap());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_create_rejects_empty_title(_ctx: &mut TaskTestContext) {
        let mut tasks = Tasks::new().unwrap();

        let err = tasks.create(NewTask::new("   "), ProjectMode::Personal, 0).unwrap_err();
        assert_eq!(err.downcast_ref::<ErrorCode>(), Some(&ErrorCode::MissingRequiredField));

        // Nothing was written
        assert!(tasks.fetch(TaskFilter::All).unwrap().is_empty());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_update_merges_fields(_ctx: &mut TaskTestContext) {
        let mut tasks = Tasks::new().unwrap();

        let task = tasks.create(NewTask::new("Original"), ProjectMode::Personal, 0).unwrap();
        let id = task.id.unwrap();

        let updated = tasks
            .update(
                id,
                TaskPatch {
                    title: Some("Updated".to_string()),
                    description: Some("With detail".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.title, "Updated");
        assert_eq!(updated.description, "With detail");
        // Untouched fields survive the merge
        assert_eq!(updated.status, TaskStatus::Todo);
        assert_eq!(updated.project_id, task.project_id);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_completion_transition_sets_status_and_timestamp(_ctx: &mut TaskTestContext) {
        let mut tasks = Tasks::new().unwrap();

        let task = tasks.create(NewTask::new("Finish me"), ProjectMode::Personal, 0).unwrap();
        let id = task.id.unwrap();

        let done = tasks.toggle_complete(id, true).unwrap();
        assert!(done.completed);
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed_at.is_some());

        let reopened = tasks.toggle_complete(id, false).unwrap();
        assert!(!reopened.completed);
        assert_eq!(reopened.status, TaskStatus::Todo);
        assert!(reopened.completed_at.is_none());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_soft_delete_hides_task(_ctx: &mut TaskTestContext) {
        let mut tasks = Tasks::new().unwrap();

        let task = tasks.create(NewTask::new("Disposable"), ProjectMode::Personal, 0).unwrap();
        let id = task.id.unwrap();

        tasks.delete(id).unwrap();
        assert!(tasks.get_by_id(id).unwrap().is_none());
        assert!(tasks.fetch(TaskFilter::All).unwrap().is_empty());

        // Deleting again reports not-found, same as a task that never existed
        let err = tasks.delete(id).unwrap_err();
        assert_eq!(err.downcast_ref::<ErrorCode>(), Some(&ErrorCode::TaskNotFound));
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_bulk_toggle_complete(_ctx: &mut TaskTestContext) {
        let mut tasks = Tasks::new().unwrap();

        let mut ids = Vec::new();
        for i in 1..=4 {
            let task = tasks
                .create(NewTask::new(&format!("Task {}", i)), ProjectMode::Personal, 0)
                .unwrap();
            ids.push(task.id.unwrap());
        }

        // Pre-complete one of them; it does not count as changed
        tasks.toggle_complete(ids[0], true).unwrap();
        let changed = tasks.bulk_toggle_complete(&ids, true).unwrap();
        assert_eq!(changed, 3);

        let completed = tasks.fetch(TaskFilter::ByStatus(TaskStatus::Completed)).unwrap();
        assert_eq!(completed.len(), 4);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_update_positions(_ctx: &mut TaskTestContext) {
        let mut tasks = Tasks::new().unwrap();

        let a = tasks.create(NewTask::new("First"), ProjectMode::Personal, 0).unwrap().id.unwrap();
        let b = tasks.create(NewTask::new("Second"), ProjectMode::Personal, 0).unwrap().id.unwrap();

        tasks.update_positions(&[(a, 200), (b, 100)]).unwrap();

        let ordered = tasks.fetch(TaskFilter::All).unwrap();
        assert_eq!(ordered[0].id.unwrap(), b);
        assert_eq!(ordered[1].id.unwrap(), a);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_purge_deleted(_ctx: &mut TaskTestContext) {
        let mut tasks = Tasks::new().unwrap();

        let keep = tasks.create(NewTask::new("Keeper"), ProjectMode::Personal, 0).unwrap().id.unwrap();
        let drop = tasks.create(NewTask::new("Goner"), ProjectMode::Personal, 0).unwrap().id.unwrap();

        tasks.delete(drop).unwrap();
        assert_eq!(tasks.purge_deleted().unwrap(), 1);
        assert!(tasks.get_by_id(keep).unwrap().is_some());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_today_filter_uses_utc_range(_ctx: &mut TaskTestContext) {
        let mut tasks = Tasks::new().unwrap();

        // Default due date is the start of today, which the filter includes
        let due_today = tasks.create(NewTask::new("Due today"), ProjectMode::Personal, 0).unwrap();
        tasks
            .create(
                NewTask {
                    title: "Due next week".to_string(),
                    due_date: Some(chrono::Utc::now() + chrono::Duration::days(7)),
                    ..Default::default()
                },
                ProjectMode::Personal,
                0,
            )
            .unwrap();

        let today = tasks.fetch(TaskFilter::Today { offset_minutes: 0 }).unwrap();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].id, due_today.id);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_fetch_by_ids_and_project(_ctx: &mut TaskTestContext) {
        let mut tasks = Tasks::new().unwrap();
        let mut projects = Projects::new().unwrap();

        let side = projects.create("Side project", ProjectMode::Personal).unwrap();
        let side_id = side.id.unwrap();

        let a = tasks.create(NewTask::new("Inbox task"), ProjectMode::Personal, 0).unwrap();
        let b = tasks
            .create(
                NewTask {
                    title: "Side task".to_string(),
                    project_id: Some(side_id),
                    ..Default::default()
                },
                ProjectMode::Personal,
                0,
            )
            .unwrap();

        let by_project = tasks.fetch(TaskFilter::ByProject(side_id)).unwrap();
        assert_eq!(by_project.len(), 1);
        assert_eq!(by_project[0].id, b.id);

        let by_ids = tasks.fetch(TaskFilter::ByIds(vec![a.id.unwrap(), b.id.unwrap()])).unwrap();
        assert_eq!(by_ids.len(), 2);
    }
}
