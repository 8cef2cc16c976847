use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error when fewer positional arguments than required are given
    #[error("you must specify a command and a project id list")]
    NotEnoughArguments,
    /// Error when the command name is not one of the known workflows
    #[error("invalid command: '{0}'")]
    InvalidCommand(String),
    /// Error when the project id list resolves to nothing
    #[error("empty project id list")]
    EmptyProjects,
    /// Error when a configured project has an empty identifier
    #[error("empty project id in config file")]
    EmptyProjectId,
    /// Error when a configured project path does not exist
    #[error("project path does not exist: '{0}'")]
    ProjectPathNotExist(String),
    /// Error when a configured project path is not a directory
    #[error("project path is not a directory: '{0}'")]
    ProjectPathNotDirectory(String),
    /// Error when a requested project id has no configuration entry
    #[error("project id is not configured: '{0}'")]
    ProjectIdNotExist(String),
    /// Error when the main branch name is missing from the config file
    #[error("empty git main branch in config file")]
    EmptyGitSourceBranch,
    /// Error reading the configuration file
    #[error("cannot read config file '{path}': {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },
    /// Error parsing the configuration file
    #[error("cannot parse config file '{path}': {source}")]
    ConfigParse {
        path: String,
        source: serde_yaml::Error,
    },
    /// Error when the configured git server is not a valid URL
    #[error("invalid git server url in config file: '{0}'")]
    InvalidServerUrl(String),
    /// Error when a command requires a branch name and none was given
    #[error("empty branch name in command line")]
    EmptyBranch,
    /// Error when a command requires a task title and none was given
    #[error("empty task title in command line")]
    EmptyTaskTitle,
    /// Error when the repository id is missing from the config file
    #[error("empty git repository id in config file")]
    EmptyGitRepositoryId,
    /// Error when the remote name is missing from the config file
    #[error("empty git remote name in config file")]
    EmptyGitRemoteName,
    /// Error when remote integration is disabled or unconfigured
    #[error("git integration is disabled in config file")]
    GitDisabled,
    /// Error when no tag in the repository matches the version pattern
    #[error("no version tags found")]
    NoTagsFound,
    /// Error when a numeric version component cannot be parsed
    #[error("cannot parse version component '{0}'")]
    VersionParse(String),
    /// Error when the operator declines tag creation
    #[error("tag creation rejected")]
    TagCreationRejected,
    /// Error when a configured user has no exact match on the git server
    #[error("user '{0}' not found on git server")]
    UserNotFound(String),
    /// Error when no resolved identity carries the author role
    #[error("no author users configured")]
    EmptyAuthors,
    /// Error when no resolved identity carries the reviewer role
    #[error("no reviewer users configured")]
    EmptyReviewers,
    /// Error when a git subcommand exits non-zero
    #[error("git {args} failed: {output}")]
    GitCommand { args: String, output: String },
    /// Error from the git server's REST API transport
    #[error("git server request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Error when the git server answers with a non-success status
    #[error("git server returned {status}: {body}")]
    RemoteStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during JSON serialization or deserialization
    #[error("json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    /// Error when user input fails.
    #[error("inquire error: {0}")]
    Inquire(#[from] inquire::InquireError),
    /// Error from one project of a multi-project run
    #[error("project '{id}': {source}")]
    Project { id: String, source: Box<AppError> },
}
