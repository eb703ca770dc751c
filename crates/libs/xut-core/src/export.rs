//! Export of key/value pairs to the calling pipeline.

use xut_io::{output::RunOutput, runner::Runner};

use crate::prelude::*;

/// Default exporter command.
pub const DEFAULT_ENVMAN: &str = "envman";

/// Persists a named value for the pipeline steps that run after this one.
#[allow(async_fn_in_trait)]
pub trait Exporter {
    async fn export(&self, key: &str, value: &str) -> Result<()>;
}

/// Exports through `envman add --key <KEY>`, the value fed on stdin.
#[derive(Debug, Clone)]
pub struct EnvmanExporter {
    command: String,
}

impl Default for EnvmanExporter {
    fn default() -> Self {
        Self::new(DEFAULT_ENVMAN)
    }
}

impl EnvmanExporter {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Exporter for EnvmanExporter {
    async fn export(&self, key: &str, value: &str) -> Result<()> {
        let runner = Runner::new(self.command.clone(), vec!["add", "--key", key]).with_stdin(value);
        let mut output = RunOutput::new();
        let status = output
            .capture(&format!("export {key}"), runner)
            .await
            .map_err(|err| Error::ExportFailed {
                key: key.to_string(),
                reason: err.to_string(),
            })?;
        if !status.success() {
            return Err(Error::ExportFailed {
                key: key.to_string(),
                reason: status.to_string(),
            });
        }
        Ok(())
    }
}
