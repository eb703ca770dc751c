//! Common types and utilities.

/// Step error type.
pub use crate::error::Error;

/// Step result type.
pub type Result<T> = core::result::Result<T, Error>;
