//! Common types and utilities.

/// Build error type.
pub use crate::error::Error;

/// Build result type.
pub type Result<T> = core::result::Result<T, Error>;
