//! Test execution sequencing.
//!
//! Runs the test runner once per execution pair, strictly one after the other.
//! Every run writes to the same result log path and receives its artifact
//! through the same environment variable name, so runs must never overlap.
//! The first failing pair ends the whole sequence.

use std::path::Path;

use tracing::{error, info, warn};
use xut_io::output::RunOutput;

use crate::{
    nunit::{TestInvocation, TestRunner},
    prelude::*,
    report::{AggregateOutcome, Stage},
    resolve::ExecutionPair,
    result_log::{extract_failure_message, read_result_log},
};

/// Settings shared by every run of a sequence.
#[derive(Debug, Clone, Copy)]
pub struct TestPlan<'a> {
    /// Environment variable carrying the artifact path to the tests.
    pub artifact_env: &'a str,
    pub test_filter: Option<&'a str>,
    /// Shared result log destination, overwritten by each run.
    pub result_log_path: &'a Path,
}

/// Outcome of a single pair.
#[derive(Debug)]
pub struct RunResult {
    pub pair: ExecutionPair,
    /// Set when the runner reported failure.
    pub exit_error: Option<Error>,
    /// Result log read after the run, empty when it could not be read.
    pub result_log_text: String,
    /// Last failure message of the result log, only looked up for failed runs.
    pub failure_message: Option<String>,
}

/// Run the tests of `pair` and read back the result log.
///
/// The result log is read whatever the exit status; a read failure is only a
/// warning.
pub async fn run_pair<R: TestRunner>(
    runner: &R,
    pair: &ExecutionPair,
    plan: &TestPlan<'_>,
    output: &mut RunOutput,
) -> RunResult {
    info!(
        "Testing ({}) against ({})",
        pair.test_project_name, pair.referenced_project_name
    );
    info!("test dll: {}", pair.test_assembly_path.display());
    info!("artifact: {}", pair.application_artifact_path.display());

    let invocation = TestInvocation {
        test_assembly: &pair.test_assembly_path,
        artifact_env: plan.artifact_env,
        artifact_path: &pair.application_artifact_path,
        test_filter: plan.test_filter,
        result_log_path: plan.result_log_path,
    };
    info!("Running Xamarin UITest");
    info!("$ {}", runner.printable_command(&invocation));

    let exit_error = runner.run(&invocation, output).await.err();

    let result_log_text = match read_result_log(plan.result_log_path) {
        Ok(text) => text,
        Err(err) => {
            warn!("Failed to read test result, error: {err}");
            String::new()
        }
    };

    let failure_message = exit_error
        .as_ref()
        .map(|_| extract_failure_message(&result_log_text))
        .filter(|message| !message.is_empty());

    RunResult {
        pair: pair.clone(),
        exit_error,
        result_log_text,
        failure_message,
    }
}

/// Run every pair in order, stopping at the first failure.
///
/// The result log slot of `outcome` is overwritten after each run, failed or
/// not, so it always holds the text of the latest run when this returns.
pub async fn run_all<R: TestRunner>(
    runner: &R,
    pairs: &[ExecutionPair],
    plan: &TestPlan<'_>,
    outcome: &mut AggregateOutcome,
    output: &mut RunOutput,
) -> Result<()> {
    let pair_count = pairs.len();
    if pair_count == 0 {
        warn!("No test project could be matched with a built application, nothing to run");
    }

    for (idx, pair) in pairs.iter().enumerate() {
        outcome.enter(Stage::Executing(idx));
        info!("Pair {}/{pair_count}", idx + 1);

        let result = run_pair(runner, pair, plan, output).await;
        outcome.set_result_log(result.result_log_text);

        if let Some(err) = result.exit_error {
            if let Some(message) = &result.failure_message {
                error!("{message}");
            }
            return Err(Error::TestFailed {
                test_project: result.pair.test_project_name,
                project: result.pair.referenced_project_name,
                reason: err.to_string(),
                message: result.failure_message,
            });
        }
        info!(
            "{} against {} passed",
            result.pair.test_project_name, result.pair.referenced_project_name
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, path::PathBuf};

    use pretty_assertions::assert_eq;

    use super::*;

    /// Writes a canned result log per call and fails the calls listed in `failing`.
    struct ScriptedRunner {
        logs: Vec<Option<&'static str>>,
        failing: Vec<usize>,
        calls: RefCell<Vec<(PathBuf, String, PathBuf)>>,
    }

    impl TestRunner for ScriptedRunner {
        fn printable_command(&self, invocation: &TestInvocation<'_>) -> String {
            format!("nunit3-console {}", invocation.test_assembly.display())
        }

        async fn run(&self, invocation: &TestInvocation<'_>, _: &mut RunOutput) -> Result<()> {
            let call = self.calls.borrow().len();
            self.calls.borrow_mut().push((
                invocation.test_assembly.to_path_buf(),
                invocation.artifact_env.to_string(),
                invocation.artifact_path.to_path_buf(),
            ));
            match self.logs.get(call).copied().flatten() {
                Some(log) => std::fs::write(invocation.result_log_path, log)?,
                None => {
                    let _ = std::fs::remove_file(invocation.result_log_path);
                }
            }
            if self.failing.contains(&call) {
                return Err(Error::RunnerFailed(String::from("exit status: 1")));
            }
            Ok(())
        }
    }

    fn pair(test: &str, project: &str) -> ExecutionPair {
        ExecutionPair {
            test_project_name: test.to_string(),
            referenced_project_name: project.to_string(),
            test_assembly_path: PathBuf::from(format!("/w/{test}.dll")),
            application_artifact_path: PathBuf::from(format!("/w/{project}-Signed.apk")),
        }
    }

    #[tokio::test]
    async fn runs_pairs_in_order_with_their_artifacts() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let log_path = dir.path().join("TestResult.xml");
        let runner = ScriptedRunner {
            logs: vec![Some("first"), Some("second")],
            failing: vec![],
            calls: RefCell::new(Vec::new()),
        };
        let plan = TestPlan {
            artifact_env: "ANDROID_APK_PATH",
            test_filter: None,
            result_log_path: &log_path,
        };
        let mut outcome = AggregateOutcome::new();

        run_all(
            &runner,
            &[pair("App.UITests", "App.Droid"), pair("App.UITests", "Lite.Droid")],
            &plan,
            &mut outcome,
            &mut RunOutput::new(),
        )
        .await?;

        assert_eq!(
            runner.calls.into_inner(),
            vec![
                (
                    PathBuf::from("/w/App.UITests.dll"),
                    String::from("ANDROID_APK_PATH"),
                    PathBuf::from("/w/App.Droid-Signed.apk")
                ),
                (
                    PathBuf::from("/w/App.UITests.dll"),
                    String::from("ANDROID_APK_PATH"),
                    PathBuf::from("/w/Lite.Droid-Signed.apk")
                ),
            ]
        );
        assert_eq!(outcome.last_result_log(), "second");
        assert_eq!(outcome.stage(), Stage::Executing(1));
        Ok(())
    }

    #[tokio::test]
    async fn stops_at_first_failure_with_its_message() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let log_path = dir.path().join("TestResult.xml");
        let runner = ScriptedRunner {
            logs: vec![
                Some("<failure>\n<message>Element not found</message>\n"),
                Some("never written"),
            ],
            failing: vec![0],
            calls: RefCell::new(Vec::new()),
        };
        let plan = TestPlan {
            artifact_env: "ANDROID_APK_PATH",
            test_filter: Some("App.UITests.Tests.ValidCard"),
            result_log_path: &log_path,
        };
        let mut outcome = AggregateOutcome::new();

        let result = run_all(
            &runner,
            &[pair("App.UITests", "App.Droid"), pair("App.UITests", "Lite.Droid")],
            &plan,
            &mut outcome,
            &mut RunOutput::new(),
        )
        .await;

        match result {
            Err(Error::TestFailed {
                test_project,
                project,
                message,
                ..
            }) => {
                assert_eq!(test_project, "App.UITests");
                assert_eq!(project, "App.Droid");
                assert_eq!(message.as_deref(), Some("<message>Element not found</message>"));
            }
            other => panic!("expected test failure, got {other:?}"),
        }
        assert_eq!(runner.calls.borrow().len(), 1);
        assert_eq!(
            outcome.last_result_log(),
            "<failure>\n<message>Element not found</message>\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_log_does_not_mask_runner_status() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let log_path = dir.path().join("TestResult.xml");
        let runner = ScriptedRunner {
            logs: vec![None],
            failing: vec![],
            calls: RefCell::new(Vec::new()),
        };
        let plan = TestPlan {
            artifact_env: "ANDROID_APK_PATH",
            test_filter: None,
            result_log_path: &log_path,
        };

        let result = run_pair(
            &runner,
            &pair("App.UITests", "App.Droid"),
            &plan,
            &mut RunOutput::new(),
        )
        .await;
        assert!(result.exit_error.is_none());
        assert_eq!(result.result_log_text, "");
        assert_eq!(result.failure_message, None);
        Ok(())
    }
}
