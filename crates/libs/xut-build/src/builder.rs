//! Build collaborator interface.

use xut_io::output::RunOutput;

use crate::{
    output::{ProjectOutputMap, Sdk, TestProjectOutputMap},
    prelude::*,
};

/// A multi-project build system.
///
/// The step only ever calls these three operations, in this order: build,
/// then collect the outputs of every project, then collect the outputs of the
/// UI-test projects.
#[allow(async_fn_in_trait)]
pub trait SolutionBuilder {
    /// Build every UI-test project and the projects they refer to.
    ///
    /// Only referred projects targeting one of `sdks` are built. Process output
    /// is captured into `output`. Returns non-fatal warnings.
    async fn build(
        &mut self,
        configuration: &str,
        platform: &str,
        sdks: &[Sdk],
        output: &mut RunOutput,
    ) -> Result<Vec<String>>;

    /// Artifacts of every built application project.
    fn collect_outputs(&self, configuration: &str, platform: &str) -> Result<ProjectOutputMap>;

    /// Test assemblies of every UI-test project, with their referred project names.
    ///
    /// Returns non-fatal warnings alongside the map.
    fn collect_test_project_outputs(
        &self,
        configuration: &str,
        platform: &str,
    ) -> Result<(TestProjectOutputMap, Vec<String>)>;
}
