//! Build output model.

use std::{collections::BTreeMap, fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Kind of file a project build produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputType {
    /// Managed assembly (`.dll`).
    Library,
    /// Installable Android package.
    Apk,
    /// Installable iOS package.
    Ipa,
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputType::Library => "library",
            OutputType::Apk => "apk",
            OutputType::Ipa => "ipa",
        };
        f.write_str(name)
    }
}

/// Target SDK a build can be filtered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Sdk {
    Android,
}

impl Sdk {
    /// Artifact type a test run installs on the device.
    pub fn artifact_type(self) -> OutputType {
        match self {
            Sdk::Android => OutputType::Apk,
        }
    }

    /// Environment variable through which the UI-test assembly learns the artifact path.
    pub fn artifact_env(self) -> &'static str {
        match self {
            Sdk::Android => "ANDROID_APK_PATH",
        }
    }
}

impl fmt::Display for Sdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sdk::Android => f.write_str("Android"),
        }
    }
}

/// A single build artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub path: PathBuf,
    pub output_type: OutputType,
}

/// Every artifact one project produced, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOutput {
    pub project_name: String,
    pub outputs: Vec<Output>,
}

/// A UI-test project's assembly and the projects it declares references on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestProjectOutput {
    pub test_project_name: String,
    pub test_assembly_path: PathBuf,
    /// Referenced project names, in declaration order, without duplicates.
    pub referred_project_names: Vec<String>,
}

/// Project outputs keyed by project name.
pub type ProjectOutputMap = BTreeMap<String, ProjectOutput>;

/// Test project outputs keyed by test project name.
pub type TestProjectOutputMap = BTreeMap<String, TestProjectOutput>;
