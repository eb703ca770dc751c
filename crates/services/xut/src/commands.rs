//! Command handlers for xut.
//!
//! - `run`: the whole step, results exported to the pipeline
//! - `config`: configuration validation and display
//! - `inspect`: solution analysis without building
//! - `parse-log`: failure message lookup in a result log

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::info;
use xut_build::{
    Sdk,
    msbuild::{DEFAULT_BUILD_TOOL, MsBuildSolution},
};
use xut_config::{StepConfig, StepUserConfig, error::Error as ConfigError};
use xut_core::{
    export::EnvmanExporter,
    nunit::NunitConsole,
    report::{AggregateOutcome, finalize},
    result_log::extract_failure_message_from_reader,
    step::run_step,
};
use xut_io::output::RunOutput;

use crate::{logs::dump_step_logs, prelude::*};

/// Environment variable naming the device the tests run on.
const DEVICE_SERIAL_ENV: &str = "ANDROID_SERIAL";

/// Merge the optional configuration file with flags and environment.
pub fn load_user_config(
    config_path: Option<&Path>,
    inputs: StepUserConfig,
) -> xut_config::prelude::Result<StepUserConfig> {
    let base = match config_path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            StepUserConfig::from_file(path)?
        }
        None => StepUserConfig::default(),
    };
    Ok(base.merge(inputs))
}

/// Handles the run command.
///
/// The outcome is exported on every path, including unreadable or invalid
/// input. Detailed errors are logged when exporting; the returned error only
/// marks the step as failed.
pub async fn handle_run(
    config_path: Option<&Path>,
    inputs: StepUserConfig,
    envman: String,
) -> Result<()> {
    let exporter = EnvmanExporter::new(envman);
    let mut outcome = AggregateOutcome::new();
    let mut output = RunOutput::new();

    let config = load_user_config(config_path, inputs).and_then(StepConfig::from_user_config);
    let (result, deploy_dir) = match config {
        Ok(config) => {
            config.print();
            let result = execute(&config, &mut outcome, &mut output).await;
            (result, Some(config.deploy_dir))
        }
        Err(err) => (Err(err.into()), None),
    };

    let result = finalize(&exporter, &mut outcome, result).await;
    dump_step_logs(&output, deploy_dir.as_deref());
    result.map_err(|_| Error::StepFailed)
}

async fn execute(
    config: &StepConfig,
    outcome: &mut AggregateOutcome,
    output: &mut RunOutput,
) -> xut_core::prelude::Result<()> {
    let console = NunitConsole::locate(config.nunit_console.as_deref())?;
    info!("NUnit console: {}", console.display());
    let runner = NunitConsole::new(console).with_env(DEVICE_SERIAL_ENV, &config.emulator_serial);

    let mut solution = MsBuildSolution::open(&config.solution, config.build_tool.clone())?;
    run_step(config, Sdk::Android, &mut solution, &runner, outcome, output).await
}

/// Handles the config command to display the validated configuration.
pub fn handle_config(user: StepUserConfig) -> Result<()> {
    let config = StepConfig::from_user_config(user)?;

    println!("Configuration parsed successfully");
    println!("Solution: {}", config.solution.display());
    println!("Configuration: {}", config.configuration);
    println!("Platform: {}", config.platform);
    println!("Test to run: {}", config.test_to_run.as_deref().unwrap_or("<all>"));
    println!("Emulator serial: {}", config.emulator_serial);
    println!("Deploy dir: {}", config.deploy_dir.display());
    println!("Result log: {}", config.result_log_path().display());
    if let Some(console) = &config.nunit_console {
        println!("NUnit console: {}", console.display());
    }
    println!(
        "Build tool: {}",
        config.build_tool.as_deref().unwrap_or(DEFAULT_BUILD_TOOL)
    );

    Ok(())
}

#[derive(Debug, Serialize)]
struct ProjectReport {
    name: String,
    path: PathBuf,
    kind: &'static str,
    test_framework: Option<&'static str>,
    references: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PlannedRun {
    test_project: String,
    application_project: String,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    solution: PathBuf,
    projects: Vec<ProjectReport>,
    planned_runs: Vec<PlannedRun>,
    build_commands: Vec<String>,
    warnings: Vec<String>,
}

fn inspect(
    solution: &MsBuildSolution,
    solution_path: &Path,
    user: &StepUserConfig,
) -> Result<InspectReport> {
    let projects = solution
        .projects()
        .iter()
        .map(|project| ProjectReport {
            name: project.name.clone(),
            path: project.path.clone(),
            kind: if project.is_uitest() {
                "uitest"
            } else if project.targets(Sdk::Android) {
                "android application"
            } else {
                "library"
            },
            test_framework: project.test_framework.map(|_| "Xamarin.UITest"),
            references: solution.referred_project_names(project),
        })
        .collect();

    let mut planned_runs = Vec::new();
    for test_project in solution.test_projects() {
        for name in solution.referred_project_names(test_project) {
            let is_app = solution
                .projects()
                .iter()
                .any(|project| project.name == name && project.targets(Sdk::Android));
            if is_app {
                planned_runs.push(PlannedRun {
                    test_project: test_project.name.clone(),
                    application_project: name,
                });
            }
        }
    }

    // Build commands need both build settings
    let mut build_commands = Vec::new();
    let mut warnings = Vec::new();
    if let (Some(configuration), Some(platform)) = (&user.configuration, &user.platform) {
        let tool = user.build_tool.as_deref().unwrap_or(DEFAULT_BUILD_TOOL);
        let (commands, build_warnings) =
            solution.build_commands(configuration, platform, &[Sdk::Android])?;
        build_commands = commands
            .into_iter()
            .map(|command| format!("{tool} {}", command.args.join(" ")))
            .collect();
        warnings = build_warnings;
    }

    Ok(InspectReport {
        solution: solution_path.to_path_buf(),
        projects,
        planned_runs,
        build_commands,
        warnings,
    })
}

/// Handles the inspect command: analyze the solution without building it.
pub fn handle_inspect(user: StepUserConfig, json: bool) -> Result<()> {
    let solution_path = user
        .solution
        .as_deref()
        .filter(|solution| !solution.trim().is_empty())
        .map(PathBuf::from)
        .ok_or(ConfigError::MissingInput("solution"))?;
    if !solution_path.exists() {
        return Err(ConfigError::SolutionNotFound(solution_path).into());
    }

    let solution = MsBuildSolution::open(&solution_path, user.build_tool.clone())?;
    let report = inspect(&solution, &solution_path, &user)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Solution: {}", report.solution.display());
    println!("Number of projects: {}", report.projects.len());
    for (idx, project) in report.projects.iter().enumerate() {
        println!("\nProject {}: {}", idx + 1, project.name);
        println!("  Path: {}", project.path.display());
        println!("  Kind: {}", project.kind);
        if let Some(framework) = project.test_framework {
            println!("  Test framework: {framework}");
        }
        println!("  References: {:?}", project.references);
    }

    println!("\nPlanned test runs: {}", report.planned_runs.len());
    for run in &report.planned_runs {
        println!("  {} against {}", run.test_project, run.application_project);
    }

    if !report.build_commands.is_empty() {
        println!("\nBuild commands:");
        for command in &report.build_commands {
            println!("  $ {command}");
        }
    }
    for warning in &report.warnings {
        println!("Warning: {warning}");
    }

    Ok(())
}

/// Handles the parse-log command: print the last failure message, if any.
///
/// The log does not need to be valid UTF-8.
pub fn handle_parse_log(path: &Path) -> Result<()> {
    let file = File::open(path)?;
    let message = extract_failure_message_from_reader(BufReader::new(file));
    if !message.is_empty() {
        println!("{message}");
    }
    Ok(())
}
