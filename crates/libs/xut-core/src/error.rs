//! Step error types.

use std::{fmt, path::PathBuf};

use xut_build::OutputType;

/// Broad class of a fatal step failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Missing or invalid input, reported before any external process runs.
    Configuration,
    /// Build tool, build or output collection failure.
    Collaborator,
    /// A referred project produced no usable artifact.
    Resolution,
    /// The test runner reported failure or could not be run.
    Execution,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Configuration => f.write_str("configuration"),
            FailureKind::Collaborator => f.write_str("collaborator"),
            FailureKind::Resolution => f.write_str("resolution"),
            FailureKind::Execution => f.write_str("execution"),
        }
    }
}

/// Step errors. Every variant is fatal for the whole step.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Issue with input: {0}")]
    Config(#[from] xut_config::error::Error),

    #[error(transparent)]
    Build(#[from] xut_build::error::Error),

    #[error("No {output_type} generated for project: {project}")]
    NoArtifact {
        project: String,
        output_type: OutputType,
    },

    #[error(
        "Failed to find the NUnit console runner. Install nunit3-console or set NUNIT_CONSOLE_PATH"
    )]
    TestRunnerNotFound,

    #[error("Test runner reported failure: {0}")]
    RunnerFailed(String),

    #[error("Test failed ({test_project} against {project}), error: {reason}")]
    TestFailed {
        test_project: String,
        project: String,
        reason: String,
        /// Last failure message found in the result log, if any.
        message: Option<String>,
    },

    #[error("Test result does not exist at: {0}")]
    ResultLogMissing(PathBuf),

    #[error("Failed to export {key}: {reason}")]
    ExportFailed { key: String, reason: String },

    #[error(transparent)]
    Process(#[from] xut_io::error::Error),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}

impl Error {
    /// Class of the failure, following the step's error taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Config(_) => FailureKind::Configuration,
            Error::Build(_) | Error::TestRunnerNotFound | Error::IO(_) => FailureKind::Collaborator,
            Error::NoArtifact { .. } => FailureKind::Resolution,
            Error::RunnerFailed(_)
            | Error::TestFailed { .. }
            | Error::ResultLogMissing(_)
            | Error::ExportFailed { .. }
            | Error::Process(_) => FailureKind::Execution,
        }
    }
}
