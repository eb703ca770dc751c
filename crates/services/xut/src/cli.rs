//! Command-line interface for xut.
//!
//! Every step input can be given as a flag or through the environment
//! variable the calling pipeline sets for it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use xut_config::StepUserConfig;
use xut_core::export::DEFAULT_ENVMAN;

/// Command-line interface for xut.
#[derive(Parser)]
#[command(name = "xut")]
#[command(about = "xut - Build a Xamarin solution and run its UITests against every referred app")]
pub struct Cli {
    /// Path to a TOML file with step inputs. Flags and environment take precedence
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Step inputs.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Path to the solution file
    #[arg(long, env = "xamarin_project", global = true)]
    pub solution: Option<String>,

    /// Build configuration, e.g. Release
    #[arg(long, env = "xamarin_configuration", global = true)]
    pub configuration: Option<String>,

    /// Build platform, e.g. "Any CPU"
    #[arg(long, env = "xamarin_platform", global = true)]
    pub platform: Option<String>,

    /// Only run the tests matching this NUnit test name
    #[arg(long, env = "test_to_run", global = true)]
    pub test_to_run: Option<String>,

    /// Serial of the device the tests run on
    #[arg(long, env = "emulator_serial", global = true)]
    pub emulator_serial: Option<String>,

    /// Directory receiving the result log and the captured logs
    #[arg(long, env = "BITRISE_DEPLOY_DIR", global = true)]
    pub deploy_dir: Option<String>,

    /// NUnit 3 console to use instead of the one found on PATH
    #[arg(long, env = "NUNIT_CONSOLE_PATH", global = true)]
    pub nunit_console: Option<String>,

    /// Build tool to use instead of msbuild
    #[arg(long, env = "MSBUILD_PATH", global = true)]
    pub build_tool: Option<String>,
}

impl From<InputArgs> for StepUserConfig {
    fn from(args: InputArgs) -> Self {
        Self {
            solution: args.solution,
            configuration: args.configuration,
            platform: args.platform,
            test_to_run: args.test_to_run,
            emulator_serial: args.emulator_serial,
            deploy_dir: args.deploy_dir,
            nunit_console: args.nunit_console,
            build_tool: args.build_tool,
        }
    }
}

/// Available commands for xut.
#[derive(Subcommand)]
pub enum Commands {
    /// Build the solution, run every UITest project and export the results
    Run {
        /// Command used to export results to the pipeline
        #[arg(long, env = "XUT_ENVMAN", default_value = DEFAULT_ENVMAN)]
        envman: String,
    },

    /// Validate and display the effective configuration
    Config,

    /// Analyze the solution and show which tests would run against which apps
    Inspect {
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the last failure message of a test result log
    ParseLog {
        /// Path to the result log
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_fill_user_config() {
        let cli = Cli::parse_from([
            "xut",
            "run",
            "--solution",
            "App.sln",
            "--platform",
            "Any CPU",
            "--envman",
            "/usr/local/bin/envman",
        ]);
        match &cli.command {
            Commands::Run { envman } => assert_eq!(envman, "/usr/local/bin/envman"),
            _ => panic!("expected run command"),
        }
        let user: StepUserConfig = cli.inputs.into();
        assert_eq!(user.solution.as_deref(), Some("App.sln"));
        assert_eq!(user.platform.as_deref(), Some("Any CPU"));
    }

    #[test]
    fn parse_log_takes_a_path() {
        let cli = Cli::parse_from(["xut", "parse-log", "TestResult.xml"]);
        match cli.command {
            Commands::ParseLog { path } => assert_eq!(path, PathBuf::from("TestResult.xml")),
            _ => panic!("expected parse-log command"),
        }
    }
}
