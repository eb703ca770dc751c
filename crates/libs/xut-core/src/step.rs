//! The build-and-test step.
//!
//! `Validating -> Building -> ResolvingArtifacts -> Executing(pair) -> Succeeded | Failed`.
//! Validation happens before [`run_step`] is called, while the outcome is still
//! in its initial stage. There is no retry: every error ends the step.

use tracing::{info, warn};
use xut_build::{Sdk, SolutionBuilder};
use xut_config::StepConfig;
use xut_io::output::RunOutput;

use crate::{
    nunit::TestRunner,
    prelude::*,
    report::{AggregateOutcome, Stage},
    resolve::resolve_pairs,
    run::{TestPlan, run_all},
};

/// Build the solution for `sdk`, match test projects with artifacts and run every pair.
///
/// `outcome` records the stage reached and the last result log; exporting it
/// is left to the caller through [`finalize`](crate::report::finalize).
pub async fn run_step<B, R>(
    config: &StepConfig,
    sdk: Sdk,
    builder: &mut B,
    runner: &R,
    outcome: &mut AggregateOutcome,
    output: &mut RunOutput,
) -> Result<()>
where
    B: SolutionBuilder,
    R: TestRunner,
{
    outcome.enter(Stage::Building);
    info!(
        "Building all {sdk} Xamarin UITest and Referred Projects in solution: {}",
        config.solution.display()
    );
    let warnings = builder
        .build(&config.configuration, &config.platform, &[sdk], output)
        .await?;
    for warning in warnings {
        warn!("{warning}");
    }

    let project_outputs = builder.collect_outputs(&config.configuration, &config.platform)?;
    let (test_outputs, warnings) =
        builder.collect_test_project_outputs(&config.configuration, &config.platform)?;
    for warning in warnings {
        warn!("{warning}");
    }

    outcome.enter(Stage::ResolvingArtifacts);
    let resolution = resolve_pairs(&project_outputs, &test_outputs, sdk.artifact_type())?;
    for warning in &resolution.warnings {
        warn!("{warning}");
    }

    let result_log_path = config.result_log_path();
    let plan = TestPlan {
        artifact_env: sdk.artifact_env(),
        test_filter: config.test_to_run.as_deref(),
        result_log_path: &result_log_path,
    };
    run_all(runner, &resolution.pairs, &plan, outcome, output).await
}
