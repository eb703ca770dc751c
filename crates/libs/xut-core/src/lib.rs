//! Output matching and UI-test orchestration for the xut step.
//!
//! After the solution is built, every UI-test project is matched with the
//! application artifacts of the projects it refers to. The external test
//! runner is then invoked once per (test project, application) pair, strictly
//! in sequence, and the first failure ends the step. The final status and the
//! last result log are exported to the calling pipeline on every exit path.
//!
//! - [`result_log`]: failure message extraction from the runner's result log
//! - [`resolve`]: test project to artifact matching
//! - [`run`]: per-pair execution, fail fast
//! - [`report`]: aggregate outcome and its export
//! - [`step`]: the whole build, resolve and run sequence

pub mod error;
pub mod export;
pub mod nunit;
pub mod prelude;
pub mod report;
pub mod resolve;
pub mod result_log;
pub mod run;
pub mod step;
