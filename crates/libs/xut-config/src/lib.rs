//! Configuration management for the xut test step.
//!
//! Inputs arrive from three layers: an optional TOML file, the environment
//! and the command line. Each layer is a [`StepUserConfig`]; layers are merged
//! and then validated into a [`StepConfig`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use xut_config::{StepConfig, StepUserConfig};
//! use std::path::Path;
//!
//! let file = StepUserConfig::from_file(Path::new("xut.toml")).unwrap();
//! let cli = StepUserConfig {
//!     configuration: Some(String::from("Release")),
//!     ..Default::default()
//! };
//! let config = StepConfig::from_user_config(file.merge(cli)).unwrap();
//! println!("{}", config.result_log_path().display());
//! ```

pub mod error;
pub mod prelude;
pub mod step_config;

pub use step_config::{RESULT_LOG_FILE_NAME, StepConfig, StepUserConfig};
