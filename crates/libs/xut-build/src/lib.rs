//! Build collaborator for the xut test step.
//!
//! Exposes the data the step needs from a multi-project build (which project
//! produced which artifacts, which UI-test project refers to which projects)
//! behind the [`SolutionBuilder`](builder::SolutionBuilder) trait, and a
//! concrete [`MsBuildSolution`](msbuild::MsBuildSolution) that analyzes a
//! `.sln` with its `.csproj` files and drives `msbuild`.

pub mod builder;
pub mod error;
pub mod msbuild;
pub mod output;
pub mod prelude;
pub mod project;
pub mod solution;

pub use builder::SolutionBuilder;
pub use output::{
    Output, OutputType, ProjectOutput, ProjectOutputMap, Sdk, TestProjectOutput,
    TestProjectOutputMap,
};
