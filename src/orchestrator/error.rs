use std::path::PathBuf;

/// Terminal failures of a launcher run. Every variant stops the run.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Python runtime not found (tried: {0})")]
    RuntimeMissing(String),

    #[error("Missing dependencies: {}", .0.join(", "))]
    DependenciesMissing(Vec<String>),

    #[error("Database connection failed: {0}")]
    DatabaseConnectionFailed(String),

    #[error("Application entry point not found: {}", .0.display())]
    EntryPointMissing(PathBuf),

    #[error("Failed to start application: {0}")]
    LaunchFailed(String),
}

impl LaunchError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
