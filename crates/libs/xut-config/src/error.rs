//! Configuration error types.

use std::path::PathBuf;

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required input is missing or empty.
    #[error("no {0} parameter specified")]
    MissingInput(&'static str),

    /// The solution path does not point to an existing file.
    #[error("solution does not exist at: {0}")]
    SolutionNotFound(PathBuf),

    /// I/O operation failed.
    #[error(transparent)]
    IO(#[from] std::io::Error),

    /// TOML deserialization failed.
    #[error(transparent)]
    Deserialization(#[from] toml::de::Error),
}
