//! Build error types.

use std::{path::PathBuf, process::ExitStatus};

/// Build collaborator errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// The solution file could not be understood.
    #[error("Failed to parse solution {path}: {reason}")]
    SolutionParse { path: PathBuf, reason: String },

    /// The solution holds no UI-test project.
    #[error("No Xamarin UITest project found in solution: {0}")]
    NoTestProjects(PathBuf),

    /// The build tool could not be started.
    #[error("Build tool not available: {0}")]
    ToolNotFound(String),

    /// A build command exited unsuccessfully.
    #[error("Build failed for project {project} ({status})")]
    BuildFailed { project: String, status: ExitStatus },

    /// Running the build tool failed before an exit status was known.
    #[error(transparent)]
    Process(#[from] xut_io::error::Error),
}
