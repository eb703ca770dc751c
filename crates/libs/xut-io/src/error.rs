//! Process capture errors.

/// Errors raised while running and capturing an external process.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The process could not be created.
    #[error("Failed to create process {0}")]
    ProcessCreationFailed(String),

    /// The process ran but its exit status could not be collected.
    #[error("Failed to get exit status from process")]
    ProcessExitStatusUnavailable,

    /// The runner task panicked or was cancelled.
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}
