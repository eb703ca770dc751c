//! Aggregate outcome of the step and its export to the calling pipeline.

use std::fmt;

use tracing::{error, info, warn};

use crate::{export::Exporter, prelude::*};

/// Key of the overall status export.
pub const RESULT_KEY: &str = "BITRISE_XAMARIN_TEST_RESULT";
/// Key of the full result log export.
pub const FULL_RESULTS_TEXT_KEY: &str = "BITRISE_XAMARIN_TEST_FULL_RESULTS_TEXT";

/// Overall step status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Succeeded,
    Failed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Succeeded => f.write_str("succeeded"),
            Status::Failed => f.write_str("failed"),
        }
    }
}

/// Where the step is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Building,
    ResolvingArtifacts,
    /// Running the pair at this zero-based index.
    Executing(usize),
    Succeeded,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Validating => f.write_str("validating"),
            Stage::Building => f.write_str("building"),
            Stage::ResolvingArtifacts => f.write_str("resolving artifacts"),
            Stage::Executing(idx) => write!(f, "executing pair {}", idx + 1),
            Stage::Succeeded => f.write_str("succeeded"),
            Stage::Failed => f.write_str("failed"),
        }
    }
}

/// State accumulated over one step invocation.
///
/// The status only ever moves from succeeded to failed. The result log slot
/// holds the text of the most recent test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOutcome {
    status: Status,
    stage: Stage,
    last_result_log: String,
}

impl Default for AggregateOutcome {
    fn default() -> Self {
        Self {
            status: Status::Succeeded,
            stage: Stage::Validating,
            last_result_log: String::new(),
        }
    }
}

impl AggregateOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn last_result_log(&self) -> &str {
        &self.last_result_log
    }

    /// Move to `stage`. Terminal stages are left untouched.
    pub fn enter(&mut self, stage: Stage) {
        if matches!(self.stage, Stage::Succeeded | Stage::Failed) {
            return;
        }
        info!("Stage: {stage}");
        self.stage = stage;
    }

    /// Replace the result log slot with the text of the latest run.
    pub fn set_result_log(&mut self, text: String) {
        self.last_result_log = text;
    }

    pub fn mark_failed(&mut self) {
        self.status = Status::Failed;
        self.stage = Stage::Failed;
    }

    fn mark_finished(&mut self) {
        if self.status == Status::Succeeded {
            self.stage = Stage::Succeeded;
        }
    }
}

/// Export the outcome of the step and hand `result` back.
///
/// Must run exactly once per step invocation, on every exit path. A failed
/// `result` is logged and turns the outcome into a failure. The status is always
/// exported; the last result log is exported whenever it is non-empty. Export
/// failures are warnings and never change `result`.
pub async fn finalize<E: Exporter>(
    exporter: &E,
    outcome: &mut AggregateOutcome,
    result: Result<()>,
) -> Result<()> {
    if let Err(err) = &result {
        error!("Step failed ({} failure): {err}", err.kind());
        outcome.mark_failed();
    }
    outcome.mark_finished();

    let status = outcome.status.to_string();
    if let Err(err) = exporter.export(RESULT_KEY, &status).await {
        warn!("Failed to export environment: {RESULT_KEY}, error: {err}");
    }

    if !outcome.last_result_log.is_empty() {
        if let Err(err) = exporter
            .export(FULL_RESULTS_TEXT_KEY, &outcome.last_result_log)
            .await
        {
            warn!("Failed to export environment: {FULL_RESULTS_TEXT_KEY}, error: {err}");
        }
    }

    info!("Step {}", outcome.status);
    result
}
