mod common;

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use xut_build::{OutputType, Sdk};
use xut_core::{
    error::{Error, FailureKind},
    report::{AggregateOutcome, FULL_RESULTS_TEXT_KEY, RESULT_KEY, Stage, Status, finalize},
    step::run_step,
};
use xut_io::output::RunOutput;

use common::{FakeBuilder, RecordingExporter, ScriptedRun, ScriptedRunner, step_config};

const PASSED_LOG: &str = r#"<test-run result="Passed" total="1" passed="1" failed="0">
  <test-case name="ValidCard" result="Passed" />
</test-run>
"#;

const TIMEOUT_LOG: &str = r#"<test-run result="Failed" total="1" passed="0" failed="1">
  <test-case name="ValidCard" result="Failed">
    <failure>
      <message>Timeout waiting for element</message>
    </failure>
  </test-case>
</test-run>
"#;

struct StepRun {
    result: xut_core::prelude::Result<()>,
    outcome: AggregateOutcome,
    exporter: RecordingExporter,
}

async fn run(builder: &mut FakeBuilder, runner: &ScriptedRunner) -> StepRun {
    let deploy_dir = tempfile::tempdir().expect("tempdir");
    let config = step_config(deploy_dir.path());
    let exporter = RecordingExporter::default();
    let mut outcome = AggregateOutcome::new();
    let mut output = RunOutput::new();

    let result = run_step(&config, Sdk::Android, builder, runner, &mut outcome, &mut output).await;
    let result = finalize(&exporter, &mut outcome, result).await;
    StepRun {
        result,
        outcome,
        exporter,
    }
}

fn single_app_builder() -> FakeBuilder {
    FakeBuilder::default()
        .with_project(
            "App.Droid",
            &[
                ("/w/App.Droid/bin/Release/App.Droid.dll", OutputType::Library),
                ("/w/App.Droid/bin/Release/com.app-Signed.apk", OutputType::Apk),
            ],
        )
        .with_test_project("App.UITests", &["App.Droid"])
}

#[tokio::test]
async fn passing_run_exports_success_and_last_log() {
    let mut builder = single_app_builder();
    let runner = ScriptedRunner::new(vec![ScriptedRun {
        log: PASSED_LOG,
        fails: false,
    }]);

    let step = run(&mut builder, &runner).await;

    assert!(step.result.is_ok());
    assert_eq!(step.outcome.status(), Status::Succeeded);
    assert_eq!(step.outcome.stage(), Stage::Succeeded);
    assert_eq!(
        runner.artifacts.borrow().as_slice(),
        &[PathBuf::from("/w/App.Droid/bin/Release/com.app-Signed.apk")]
    );
    assert_eq!(
        step.exporter.exports(),
        vec![
            (String::from(RESULT_KEY), String::from("succeeded")),
            (String::from(FULL_RESULTS_TEXT_KEY), String::from(PASSED_LOG)),
        ]
    );
}

#[tokio::test]
async fn passing_run_with_empty_log_exports_status_only() {
    let mut builder = single_app_builder();
    let runner = ScriptedRunner::new(vec![ScriptedRun {
        log: "",
        fails: false,
    }]);

    let step = run(&mut builder, &runner).await;

    assert!(step.result.is_ok());
    assert_eq!(
        step.exporter.exports(),
        vec![(String::from(RESULT_KEY), String::from("succeeded"))]
    );
}

#[tokio::test]
async fn failing_run_exports_failure_with_log_text() {
    let mut builder = single_app_builder();
    let runner = ScriptedRunner::new(vec![ScriptedRun {
        log: TIMEOUT_LOG,
        fails: true,
    }]);

    let step = run(&mut builder, &runner).await;

    match &step.result {
        Err(err @ Error::TestFailed { message, .. }) => {
            assert_eq!(err.kind(), FailureKind::Execution);
            assert_eq!(
                message.as_deref(),
                Some("<message>Timeout waiting for element</message>")
            );
        }
        other => panic!("expected test failure, got {other:?}"),
    }
    assert_eq!(step.outcome.status(), Status::Failed);
    assert_eq!(step.exporter.value(RESULT_KEY).as_deref(), Some("failed"));
    assert!(
        step.exporter
            .value(FULL_RESULTS_TEXT_KEY)
            .expect("result text exported")
            .contains("Timeout waiting for element")
    );
}

#[tokio::test]
async fn second_pair_failure_fails_the_step() {
    let mut builder = single_app_builder()
        .with_project(
            "Lite.Droid",
            &[("/w/Lite.Droid/bin/Release/com.lite-Signed.apk", OutputType::Apk)],
        )
        .with_test_project("App.UITests", &["App.Droid", "Lite.Droid"]);
    let runner = ScriptedRunner::new(vec![
        ScriptedRun {
            log: PASSED_LOG,
            fails: false,
        },
        ScriptedRun {
            log: TIMEOUT_LOG,
            fails: true,
        },
    ]);

    let step = run(&mut builder, &runner).await;

    match &step.result {
        Err(Error::TestFailed { project, .. }) => assert_eq!(project, "Lite.Droid"),
        other => panic!("expected test failure, got {other:?}"),
    }
    assert_eq!(runner.calls(), 2);
    assert_eq!(
        step.exporter.exports(),
        vec![
            (String::from(RESULT_KEY), String::from("failed")),
            (String::from(FULL_RESULTS_TEXT_KEY), String::from(TIMEOUT_LOG)),
        ]
    );
}

#[tokio::test]
async fn missing_package_fails_before_any_test_run() {
    let mut builder = FakeBuilder::default()
        .with_project(
            "App.Droid",
            &[("/w/App.Droid/bin/Release/App.Droid.dll", OutputType::Library)],
        )
        .with_test_project("App.UITests", &["App.Droid"]);
    let runner = ScriptedRunner::new(Vec::new());

    let step = run(&mut builder, &runner).await;

    match &step.result {
        Err(err @ Error::NoArtifact { project, output_type }) => {
            assert_eq!(err.kind(), FailureKind::Resolution);
            assert_eq!(project, "App.Droid");
            assert_eq!(*output_type, OutputType::Apk);
        }
        other => panic!("expected missing artifact, got {other:?}"),
    }
    assert_eq!(runner.calls(), 0);
    assert_eq!(
        step.exporter.exports(),
        vec![(String::from(RESULT_KEY), String::from("failed"))]
    );
}

#[tokio::test]
async fn build_failure_stops_the_step() {
    let mut builder = single_app_builder();
    builder.fail_build = true;
    let runner = ScriptedRunner::new(Vec::new());

    let step = run(&mut builder, &runner).await;

    assert!(builder.built);
    assert!(matches!(
        &step.result,
        Err(err) if err.kind() == FailureKind::Collaborator
    ));
    assert_eq!(runner.calls(), 0);
    assert_eq!(step.exporter.value(RESULT_KEY).as_deref(), Some("failed"));
}

#[tokio::test]
async fn unreferenced_and_unbuilt_projects_are_skipped() {
    let mut builder = single_app_builder()
        .with_test_project("Orphan.UITests", &[])
        .with_test_project("App.UITests", &["Helpers", "App.Droid"]);
    let runner = ScriptedRunner::new(vec![ScriptedRun {
        log: PASSED_LOG,
        fails: false,
    }]);

    let step = run(&mut builder, &runner).await;

    assert!(step.result.is_ok());
    assert_eq!(runner.calls(), 1);
    assert_eq!(step.exporter.value(RESULT_KEY).as_deref(), Some("succeeded"));
}
