#[cfg(test)]
mod tests {
    use taskflow::db::projects::Projects;
    use taskflow::db::tasks::Tasks;
    use taskflow::libs::project::{ProjectMode, ProjectPatch, MAX_PROJECTS_PER_MODE};
    use taskflow::libs::task::{NewTask, TaskFilter};
    use taskflow::libs::validation::ErrorCode;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ProjectTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for ProjectTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ProjectTestContext { _temp_dir: temp_dir }
        }
    }

    #[test_context(ProjectTestContext)]
    #[test]
    fn test_default_project_lazy_creation(_ctx: &mut ProjectTestContext) {
        let mut projects = Projects::new().unwrap();

        let inbox = projects.get_or_create_default(ProjectMode::Personal).unwrap();
        assert!(inbox.is_default);
        assert_eq!(inbox.name, "Inbox");
        assert_eq!(inbox.task_count, 0);

        // Second call returns the same project
        let again = projects.get_or_create_default(ProjectMode::Personal).unwrap();
        assert_eq!(inbox.id, again.id);

        // Each mode gets its own default
        let work_inbox = projects.get_or_create_default(ProjectMode::Professional).unwrap();
        assert_ne!(inbox.id, work_inbox.id);
    }

    #[test_context(ProjectTestContext)]
    #[test]
    fn test_default_project_is_immutable(_ctx: &mut ProjectTestContext) {
        let mut projects = Projects::new().unwrap();
        let inbox = projects.get_or_create_default(ProjectMode::Personal).unwrap();
        let id = inbox.id.unwrap();

        let err = projects
            .update(
                id,
                ProjectPatch {
                    name: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert_eq!(err.downcast_ref::<ErrorCode>(), Some(&ErrorCode::DefaultProjectImmutable));

        let err = projects.delete(id, true).unwrap_err();
        assert_eq!(err.downcast_ref::<ErrorCode>(), Some(&ErrorCode::DefaultProjectImmutable));

        // Archiving the default is allowed, renaming is not
        let archived = projects
            .update(
                id,
                ProjectPatch {
                    is_archived: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(archived.is_archived);
    }

    #[test_context(ProjectTestContext)]
    #[test]
    fn test_project_limit_per_mode(_ctx: &mut ProjectTestContext) {
        let mut projects = Projects::new().unwrap();

        for i in 0..MAX_PROJECTS_PER_MODE {
            projects.create(&format!("Project {}", i), ProjectMode::Personal).unwrap();
        }

        let err = projects.create("One too many", ProjectMode::Personal).unwrap_err();
        assert_eq!(err.downcast_ref::<ErrorCode>(), Some(&ErrorCode::ProjectLimitReached));

        // The other mode is unaffected
        projects.create("Professional one", ProjectMode::Professional).unwrap();
    }

    #[test_context(ProjectTestContext)]
    #[test]
    fn test_check_deletion_classifies_tasks(_ctx: &mut ProjectTestContext) {
        let mut projects = Projects::new().unwrap();
        let mut tasks = Tasks::new().unwrap();

        let project = projects.create("Cleanup", ProjectMode::Personal).unwrap();
        let pid = project.id.unwrap();

        let t1 = tasks
            .create(
                NewTask {
                    title: "Done already".to_string(),
                    project_id: Some(pid),
                    ..Default::default()
                },
                ProjectMode::Personal,
                0,
            )
            .unwrap();
        tasks.toggle_complete(t1.id.unwrap(), true).unwrap();
        tasks
            .create(
                NewTask {
                    title: "Still open".to_string(),
                    project_id: Some(pid),
                    ..Default::default()
                },
                ProjectMode::Personal,
                0,
            )
            .unwrap();

        let check = projects.check_deletion(pid).unwrap();
        assert_eq!(check.task_count, 2);
        assert_eq!(check.completed_count, 1);
        assert_eq!(check.incomplete_count, 1);
        assert!(check.requires_confirmation());
    }

    #[test_context(ProjectTestContext)]
    #[test]
    fn test_delete_requires_confirmation_with_incomplete_tasks(_ctx: &mut ProjectTestContext) {
        let mut projects = Projects::new().unwrap();
        let mut tasks = Tasks::new().unwrap();

        let project = projects.create("Doomed", ProjectMode::Personal).unwrap();
        let pid = project.id.unwrap();
        let task = tasks
            .create(
                NewTask {
                    title: "Unfinished business".to_string(),
                    project_id: Some(pid),
                    ..Default::default()
                },
                ProjectMode::Personal,
                0,
            )
            .unwrap();

        // Without confirmation the delete fails and nothing changes
        let err = projects.delete(pid, false).unwrap_err();
        assert_eq!(err.downcast_ref::<ErrorCode>(), Some(&ErrorCode::ConfirmationRequired));
        assert!(projects.get_by_id(pid).unwrap().is_some());
        assert!(tasks.get_by_id(task.id.unwrap()).unwrap().is_some());

        // With confirmation the project and its tasks soft-delete together
        projects.delete(pid, true).unwrap();
        assert!(projects.get_by_id(pid).unwrap().is_none());
        assert!(tasks.get_by_id(task.id.unwrap()).unwrap().is_none());
        assert!(tasks.fetch(TaskFilter::ByProject(pid)).unwrap().is_empty());
    }

    #[test_context(ProjectTestContext)]
    #[test]
    fn test_delete_without_incomplete_tasks_needs_no_confirmation(_ctx: &mut ProjectTestContext) {
        let mut projects = Projects::new().unwrap();
        let mut tasks = Tasks::new().unwrap();

        let project = projects.create("Finished", ProjectMode::Personal).unwrap();
        let pid = project.id.unwrap();
        let task = tasks
            .create(
                NewTask {
                    title: "Wrapped up".to_string(),
                    project_id: Some(pid),
                    ..Default::default()
                },
                ProjectMode::Personal,
                0,
            )
            .unwrap();
        tasks.toggle_complete(task.id.unwrap(), true).unwrap();

        projects.delete(pid, false).unwrap();
        assert!(projects.get_by_id(pid).unwrap().is_none());
    }

    #[test_context(ProjectTestContext)]
    #[test]
    fn test_create_validates_name(_ctx: &mut ProjectTestContext) {
        let mut projects = Projects::new().unwrap();

        let err = projects.create("", ProjectMode::Personal).unwrap_err();
        assert_eq!(err.downcast_ref::<ErrorCode>(), Some(&ErrorCode::MissingRequiredField));

        let err = projects.create(&"x".repeat(101), ProjectMode::Personal).unwrap_err();
        assert_eq!(err.downcast_ref::<ErrorCode>(), Some(&ErrorCode::InvalidInput));
    }
}
