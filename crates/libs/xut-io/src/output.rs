//! Captured process output, grouped by labeled run.

use std::process::ExitStatus;

use tokio::sync::mpsc::channel;
use tracing::{error, info};

use crate::{
    error::Error,
    runner::{RunEvent, Runner},
};

/// Output lines of every captured run, in execution order.
#[derive(Debug, Default)]
pub struct RunOutput {
    /// `(label, lines)` per run. Consecutive runs with the same label share an entry.
    pub logs: Vec<(String, Vec<String>)>,
}

impl RunOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line to the entry of `label`.
    pub fn push_line(&mut self, label: &str, line: String) {
        match self.logs.last_mut() {
            Some((last, lines)) if last == label => lines.push(line),
            _ => self.logs.push((label.to_string(), vec![line])),
        }
    }

    /// Lines captured for `label`, across all of its entries.
    pub fn lines(&self, label: &str) -> Vec<&str> {
        self.logs
            .iter()
            .filter(|(l, _)| l == label)
            .flat_map(|(_, lines)| lines.iter().map(String::as_str))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    /// Run `runner` to completion, storing its output under `label`.
    ///
    /// Blocks until the process exits. A non-zero exit status is returned as
    /// `Ok`; only failures to start or observe the process are errors.
    pub async fn capture(&mut self, label: &str, runner: Runner) -> Result<ExitStatus, Error> {
        let (tx, mut rx) = channel(64);
        let handle = runner.spawn(tx);
        let mut creation_error = None;

        while let Some(event) = rx.recv().await {
            match event {
                RunEvent::ProcessCreationFailed(err) => {
                    error!("{label} - Failed to create process - {err}");
                    creation_error = Some(err);
                }
                RunEvent::ProcessCreated => info!("{label} - Started"),
                RunEvent::ProcessEnd(success) => {
                    if success {
                        info!("{label} - Ended successfully");
                    } else {
                        error!("{label} - Failed");
                    }
                }
                RunEvent::ProcessNewOutputLine(line) => self.push_line(label, line),
            }
        }

        let exit_status = handle.await?;
        if let Some(err) = creation_error {
            return Err(Error::ProcessCreationFailed(err));
        }
        exit_status.ok_or(Error::ProcessExitStatusUnavailable)
    }
}
