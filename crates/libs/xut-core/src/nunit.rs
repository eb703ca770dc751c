//! Test runner collaborator: the NUnit 3 console.

use std::path::{Path, PathBuf};

use xut_io::{lookup::find_in_path, output::RunOutput, runner::Runner};

use crate::prelude::*;

/// Executable names searched on `PATH`, in order.
pub const NUNIT_CONSOLE_NAMES: &[&str] = &["nunit3-console", "nunit3-console.exe"];

/// Everything one test run needs.
#[derive(Debug, Clone, Copy)]
pub struct TestInvocation<'a> {
    pub test_assembly: &'a Path,
    /// Name of the environment variable carrying the artifact path to the tests.
    pub artifact_env: &'a str,
    pub artifact_path: &'a Path,
    pub test_filter: Option<&'a str>,
    pub result_log_path: &'a Path,
}

/// An external test runner executing one test assembly per call.
#[allow(async_fn_in_trait)]
pub trait TestRunner {
    /// Command line of `invocation`, for logging.
    fn printable_command(&self, invocation: &TestInvocation<'_>) -> String;

    /// Run `invocation` to completion.
    ///
    /// Returns an error when the runner reports failure or cannot be run.
    /// The runner writes its result log to `invocation.result_log_path`.
    async fn run(&self, invocation: &TestInvocation<'_>, output: &mut RunOutput) -> Result<()>;
}

/// NUnit 3 console runner.
#[derive(Debug, Clone)]
pub struct NunitConsole {
    console_path: PathBuf,
    /// Extra environment for every run.
    envs: Vec<(String, String)>,
}

impl NunitConsole {
    pub fn new(console_path: PathBuf) -> Self {
        Self {
            console_path,
            envs: Vec::new(),
        }
    }

    /// Find the console: `explicit` when given, otherwise the first match on `PATH`.
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) if path.is_file() => Ok(path.to_path_buf()),
            Some(_) => Err(Error::TestRunnerNotFound),
            None => find_in_path(NUNIT_CONSOLE_NAMES).ok_or(Error::TestRunnerNotFound),
        }
    }

    /// Add an environment variable to every run.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    fn needs_mono(&self) -> bool {
        !cfg!(windows)
            && self
                .console_path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
    }

    fn runner(&self, invocation: &TestInvocation<'_>) -> Runner {
        let mut args = Vec::new();
        let command = if self.needs_mono() {
            args.push(self.console_path.to_string_lossy().into_owned());
            String::from("mono")
        } else {
            self.console_path.to_string_lossy().into_owned()
        };
        args.push(invocation.test_assembly.to_string_lossy().into_owned());
        if let Some(filter) = invocation.test_filter {
            args.push(format!("--test={filter}"));
        }
        args.push(format!(
            "--result={}",
            invocation.result_log_path.to_string_lossy()
        ));

        let mut runner = Runner::new(command, args);
        for (key, value) in &self.envs {
            runner = runner.with_env(key.clone(), value.clone());
        }
        // The artifact path is only ever set on the child process
        runner.with_env(
            invocation.artifact_env,
            invocation.artifact_path.to_string_lossy(),
        )
    }
}

impl TestRunner for NunitConsole {
    fn printable_command(&self, invocation: &TestInvocation<'_>) -> String {
        self.runner(invocation).get_full_command()
    }

    async fn run(&self, invocation: &TestInvocation<'_>, output: &mut RunOutput) -> Result<()> {
        let label = format!(
            "test {}",
            invocation
                .test_assembly
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
        let status = output.capture(&label, self.runner(invocation)).await?;
        if !status.success() {
            return Err(Error::RunnerFailed(status.to_string()));
        }
        Ok(())
    }
}
