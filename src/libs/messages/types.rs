#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(String),
    TaskUpdated(String),
    TaskDeleted(String),
    TaskCompleted(String),
    TaskReopened(String),
    TaskNotFound(i64),
    TasksToggled(usize),
    TasksHeader,
    TodayTasksHeader(String), // local date
    NoTasksFound,
    NoTaskIdsProvided,
    TaskMoved(String, String), // task title, project name
    ConfirmDeleteTask(String),
    PromptTaskTitle,
    PromptTaskDescription,

    // === PROJECT MESSAGES ===
    ProjectCreated(String),
    ProjectUpdated(String),
    ProjectDeleted(String),
    ProjectArchived(String),
    ProjectNotFound(i64),
    ProjectListHeader,
    NoProjectsFound,
    DefaultProjectImmutable,
    ProjectLimitReached(i64),
    ProjectHasIncompleteTasks(String, i64), // name, incomplete count
    ConfirmDeleteProject(String),
    ConfirmDeleteProjectWithTasks(String, i64),
    PromptProjectName,
    SelectProjectMode,

    // === TAG MESSAGES ===
    TagCreated(String),
    TagUpdated(String),
    TagDeleted(String),
    TagNotFound(String),
    TagAlreadyExists(String),
    TagListHeader,
    NoTagsFound,
    NoTasksWithTag(String),
    TasksWithTag(String),
    PromptTagName,
    PromptTagColor,

    // === SYNC MESSAGES ===
    SyncStarted,
    SyncAlreadyRunning,
    SyncStopped,
    SyncCompleted(usize, usize), // projects repaired, tags repaired
    SyncNothingToRepair,
    SyncFailed(String),
    LastSyncTime(String),
    NeverSynced,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigFileNotFound,
    ConfigParseError,
    PromptSyncInterval,
    PromptTimezoneOffset,
    PromptDefaultMode,

    // === EXPORT MESSAGES ===
    ExportCompleted(String), // path
    ExportFailed(String),
    ExportNothingToExport,

    // === VALIDATION / GENERIC MESSAGES ===
    ValidationFailed(String),
    ConfirmationRequired,
    OperationCancelled,
    PurgedDeletedRows(usize),
    MigrationsApplied(usize),
    Custom(String),
}
