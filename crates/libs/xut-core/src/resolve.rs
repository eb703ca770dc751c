//! Artifact resolution.
//!
//! Joins the referred project names of every UI-test project against the
//! build outputs to decide which application artifact each test run installs.

use std::path::PathBuf;

use tracing::debug;
use xut_build::{OutputType, ProjectOutputMap, TestProjectOutputMap};

use crate::prelude::*;

/// One (test project, referred project) combination to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPair {
    pub test_project_name: String,
    pub referenced_project_name: String,
    pub test_assembly_path: PathBuf,
    pub application_artifact_path: PathBuf,
}

/// Pairs to run, with the warnings produced while resolving them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub pairs: Vec<ExecutionPair>,
    pub warnings: Vec<String>,
}

/// Resolve every test project to the artifacts of type `artifact_type` it must exercise.
///
/// - A test project referring to no project is skipped with a warning.
/// - A referred project missing from `project_outputs` is skipped silently.
/// - A referred project without an artifact of `artifact_type` fails the whole
///   resolution; no partial pair list is returned.
///
/// When a project has several matching artifacts the last one is used. The
/// order of the returned pairs follows the iteration order of the inputs.
pub fn resolve_pairs(
    project_outputs: &ProjectOutputMap,
    test_outputs: &TestProjectOutputMap,
    artifact_type: OutputType,
) -> Result<Resolution> {
    let mut resolution = Resolution::default();

    for (test_project_name, test_output) in test_outputs {
        if test_output.referred_project_names.is_empty() {
            resolution.warnings.push(format!(
                "Test project ({test_project_name}) does not refer to any project, skipping..."
            ));
            continue;
        }

        for project_name in &test_output.referred_project_names {
            let Some(project_output) = project_outputs.get(project_name) else {
                debug!("{test_project_name} refers to {project_name} which has no build output");
                continue;
            };

            let artifact = project_output
                .outputs
                .iter()
                .filter(|output| output.output_type == artifact_type)
                .last()
                .ok_or_else(|| Error::NoArtifact {
                    project: project_name.clone(),
                    output_type: artifact_type,
                })?;

            resolution.pairs.push(ExecutionPair {
                test_project_name: test_project_name.clone(),
                referenced_project_name: project_name.clone(),
                test_assembly_path: test_output.test_assembly_path.clone(),
                application_artifact_path: artifact.path.clone(),
            });
        }
    }

    Ok(resolution)
}
