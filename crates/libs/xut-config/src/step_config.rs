//! Step input configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::prelude::*;

/// File name of the test runner's result log inside the deploy directory.
pub const RESULT_LOG_FILE_NAME: &str = "TestResult.xml";

/// User-provided inputs. Every field is optional so that layers can be merged.
///
/// Usually loaded from a TOML file or assembled from environment variables
/// and command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepUserConfig {
    /// Path to the solution file.
    pub solution: Option<String>,
    /// Build configuration name, e.g. `Release`.
    pub configuration: Option<String>,
    /// Build platform name, e.g. `Any CPU`.
    pub platform: Option<String>,
    /// Optional test-name filter handed to the test runner.
    pub test_to_run: Option<String>,
    /// Target device or emulator identifier. Opaque to this step.
    pub emulator_serial: Option<String>,
    /// Directory that receives the result log and the captured process output.
    pub deploy_dir: Option<String>,
    /// Explicit path to the NUnit console runner.
    pub nunit_console: Option<String>,
    /// Explicit build tool command, `msbuild` when unset.
    pub build_tool: Option<String>,
}

/// Validated step configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Existing solution file.
    pub solution: PathBuf,
    /// Build configuration name.
    pub configuration: String,
    /// Build platform name.
    pub platform: String,
    /// Test-name filter, `None` runs every test.
    pub test_to_run: Option<String>,
    /// Target device or emulator identifier.
    pub emulator_serial: String,
    /// Deploy directory.
    pub deploy_dir: PathBuf,
    /// Explicit NUnit console path.
    pub nunit_console: Option<PathBuf>,
    /// Explicit build tool command.
    pub build_tool: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl StepUserConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(file_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(file_path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML string.
    pub fn from_toml(value: &str) -> Result<Self> {
        Ok(toml::from_str(value)?)
    }

    /// Layer `overrides` on top of `self`.
    ///
    /// A field of `overrides` wins when it is set to a non-empty value.
    pub fn merge(self, overrides: StepUserConfig) -> Self {
        fn pick(base: Option<String>, over: Option<String>) -> Option<String> {
            non_empty(over).or(base)
        }
        Self {
            solution: pick(self.solution, overrides.solution),
            configuration: pick(self.configuration, overrides.configuration),
            platform: pick(self.platform, overrides.platform),
            test_to_run: pick(self.test_to_run, overrides.test_to_run),
            emulator_serial: pick(self.emulator_serial, overrides.emulator_serial),
            deploy_dir: pick(self.deploy_dir, overrides.deploy_dir),
            nunit_console: pick(self.nunit_console, overrides.nunit_console),
            build_tool: pick(self.build_tool, overrides.build_tool),
        }
    }
}

impl StepConfig {
    /// Validate user inputs.
    ///
    /// Checks run in a fixed order: solution (set and existing), configuration,
    /// platform, emulator serial. Empty values count as missing.
    pub fn from_user_config(config: StepUserConfig) -> Result<Self> {
        let solution = non_empty(config.solution).ok_or(Error::MissingInput("solution"))?;
        let solution = PathBuf::from(solution);
        if !solution.try_exists()? {
            return Err(Error::SolutionNotFound(solution));
        }

        let configuration =
            non_empty(config.configuration).ok_or(Error::MissingInput("configuration"))?;
        let platform = non_empty(config.platform).ok_or(Error::MissingInput("platform"))?;
        let emulator_serial =
            non_empty(config.emulator_serial).ok_or(Error::MissingInput("emulator serial"))?;

        Ok(Self {
            solution,
            configuration,
            platform,
            test_to_run: non_empty(config.test_to_run),
            emulator_serial,
            deploy_dir: non_empty(config.deploy_dir)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            nunit_console: non_empty(config.nunit_console).map(PathBuf::from),
            build_tool: non_empty(config.build_tool),
        })
    }

    /// Shared result log destination, overwritten by every test run.
    pub fn result_log_path(&self) -> PathBuf {
        self.deploy_dir.join(RESULT_LOG_FILE_NAME)
    }

    /// Log the effective configuration.
    pub fn print(&self) {
        info!("Build Configs:");
        info!("- Solution: {}", self.solution.display());
        info!("- Configuration: {}", self.configuration);
        info!("- Platform: {}", self.platform);

        info!("UITest Configs:");
        info!("- TestToRun: {}", self.test_to_run.as_deref().unwrap_or(""));
        info!("- EmulatorSerial: {}", self.emulator_serial);

        info!("Other Configs:");
        info!("- DeployDir: {}", self.deploy_dir.display());
        if let Some(console) = &self.nunit_console {
            info!("- NunitConsole: {}", console.display());
        }
        if let Some(tool) = &self.build_tool {
            info!("- BuildTool: {tool}");
        }
    }
}
