//! xut: Xamarin UITest step.
//!
//! Builds a Xamarin solution, matches every UITest project with the Android
//! application projects it refers to, runs the NUnit console once per match
//! and exports the outcome to the calling pipeline:
//!
//! - `BITRISE_XAMARIN_TEST_RESULT`: `succeeded` or `failed`
//! - `BITRISE_XAMARIN_TEST_FULL_RESULTS_TEXT`: result log of the last test run
//!
//! The process exits with 0 when every test run passed and 1 otherwise.

mod cli;
mod commands;
mod error;
mod logs;
mod prelude;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{
    handle_config, handle_inspect, handle_parse_log, handle_run, load_user_config,
};
use crate::prelude::*;

/// Main entry point for xut.
///
/// # Examples
///
/// ```bash
/// # Full step, inputs from the pipeline environment
/// xut run
///
/// # Show what would be tested
/// xut inspect --solution App.sln --configuration Release --platform "Any CPU"
///
/// # Last failure of a result log
/// xut parse-log TestResult.xml
/// ```
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xut=info,xut_core=info,xut_build=info,xut_io=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let inputs = cli.inputs.into();

    match cli.command {
        Commands::Run { envman } => handle_run(config_path, inputs, envman).await,
        Commands::Config => handle_config(load_user_config(config_path, inputs)?),
        Commands::Inspect { json } => handle_inspect(load_user_config(config_path, inputs)?, json),
        Commands::ParseLog { path } => handle_parse_log(&path),
    }
}
