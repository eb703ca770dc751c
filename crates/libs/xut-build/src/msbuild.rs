//! `msbuild` driven solution builder.
//!
//! Builds every UI-test project and the application projects it refers to,
//! one command at a time. Build commands are executed sequentially, as each
//! one is expected to use every available core. The first failing command
//! ends the build.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use tracing::{info, warn};
use xut_io::{error::Error as IoError, output::RunOutput, runner::Runner};

use crate::{
    builder::SolutionBuilder,
    output::{
        Output, OutputType, ProjectOutput, ProjectOutputMap, Sdk, TestProjectOutput,
        TestProjectOutputMap,
    },
    prelude::*,
    project::Project,
    solution::parse_solution,
};

/// Default build tool command.
pub const DEFAULT_BUILD_TOOL: &str = "msbuild";

/// One build tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    pub project_name: String,
    pub is_test_project: bool,
    pub args: Vec<String>,
}

/// A solution analyzed from disk, built with `msbuild`.
#[derive(Debug)]
pub struct MsBuildSolution {
    solution_path: PathBuf,
    projects: Vec<Project>,
    build_tool: String,
    /// Command lines already run in this session.
    performed: HashSet<String>,
}

impl MsBuildSolution {
    /// Read and analyze the solution and every project it lists.
    pub fn open(solution_path: &Path, build_tool: Option<String>) -> Result<Self> {
        let content = fs::read_to_string(solution_path)?;
        let mut projects = Vec::new();
        for entry in parse_solution(solution_path, &content)? {
            match fs::read_to_string(&entry.path) {
                Ok(content) => projects.push(Project::parse(&entry, &content)),
                Err(err) => warn!(
                    "Failed to read project {} at {} - {err}",
                    entry.name,
                    entry.path.display()
                ),
            }
        }

        Ok(Self {
            solution_path: solution_path.to_path_buf(),
            projects,
            build_tool: build_tool.unwrap_or_else(|| DEFAULT_BUILD_TOOL.to_string()),
            performed: HashSet::new(),
        })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// UI-test projects in solution order.
    pub fn test_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|project| project.is_uitest())
    }

    /// Names of the projects `project` refers to.
    ///
    /// References are matched to solution projects by path. A reference outside
    /// the solution keeps its file stem as name.
    pub fn referred_project_names(&self, project: &Project) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for reference in &project.reference_paths {
            let name = match self.projects.iter().find(|p| &p.path == reference) {
                Some(referred) => referred.name.clone(),
                None => match reference.file_stem() {
                    Some(stem) => stem.to_string_lossy().into_owned(),
                    None => continue,
                },
            };
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    fn project_by_name(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.name == name)
    }

    fn command_for(
        &self,
        project: &Project,
        configuration: &str,
        platform: &str,
        target: Option<&str>,
    ) -> BuildCommand {
        let platform: String = platform.chars().filter(|c| !c.is_whitespace()).collect();
        let mut args = vec![
            project.path.to_string_lossy().into_owned(),
            format!("/p:Configuration={configuration}"),
            format!("/p:Platform={platform}"),
        ];
        if let Some(target) = target {
            args.push(format!("/t:{target}"));
        }
        BuildCommand {
            project_name: project.name.clone(),
            is_test_project: project.is_uitest(),
            args,
        }
    }

    /// Commands that build every UI-test project and its referred projects for `sdks`.
    ///
    /// Referred projects come before the test project that needs them.
    pub fn build_commands(
        &self,
        configuration: &str,
        platform: &str,
        sdks: &[Sdk],
    ) -> Result<(Vec<BuildCommand>, Vec<String>)> {
        let mut commands = Vec::new();
        let mut warnings = Vec::new();

        let test_projects: Vec<&Project> = self.test_projects().collect();
        if test_projects.is_empty() {
            return Err(Error::NoTestProjects(self.solution_path.clone()));
        }

        for test_project in test_projects {
            let mut referred_count = 0;
            for name in self.referred_project_names(test_project) {
                let Some(referred) = self.project_by_name(&name) else {
                    warnings.push(format!(
                        "Project ({name}) referred by ({}) is not part of the solution",
                        test_project.name
                    ));
                    continue;
                };
                let Some(sdk) = sdks.iter().copied().find(|sdk| referred.targets(*sdk)) else {
                    continue;
                };
                let target = match sdk {
                    Sdk::Android => "SignAndroidPackage",
                };
                commands.push(self.command_for(referred, configuration, platform, Some(target)));
                referred_count += 1;
            }
            if referred_count == 0 {
                warnings.push(format!(
                    "Test project ({}) does not refer to any application project for the selected SDKs",
                    test_project.name
                ));
            }
            commands.push(self.command_for(test_project, configuration, platform, None));
        }

        Ok((commands, warnings))
    }

    fn collect_project_outputs(
        project: &Project,
        configuration: &str,
        platform: &str,
    ) -> Result<Vec<Output>> {
        let assembly = format!("{}.dll", project.assembly_name);
        let mut outputs = Vec::new();

        for dir in project.output_dirs(configuration, platform) {
            if !dir.is_dir() {
                continue;
            }
            let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
                .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                .filter(|path| path.is_file())
                .collect();
            // Signed packages sort last so they win when a single artifact is picked
            files.sort_by_key(|path| {
                let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
                let signed = name.as_deref().is_some_and(|n| n.ends_with("-Signed.apk"));
                (signed, name)
            });

            for path in files {
                let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                    continue;
                };
                let lower = name.to_ascii_lowercase();
                let output_type = if lower.ends_with(".apk") {
                    OutputType::Apk
                } else if lower.ends_with(".ipa") {
                    OutputType::Ipa
                } else if name == assembly {
                    OutputType::Library
                } else {
                    continue;
                };
                outputs.push(Output { path, output_type });
            }
        }
        Ok(outputs)
    }
}

impl SolutionBuilder for MsBuildSolution {
    async fn build(
        &mut self,
        configuration: &str,
        platform: &str,
        sdks: &[Sdk],
        output: &mut RunOutput,
    ) -> Result<Vec<String>> {
        let (commands, warnings) = self.build_commands(configuration, platform, sdks)?;
        let command_count = commands.len();

        for (idx, command) in commands.into_iter().enumerate() {
            let runner = Runner::new(self.build_tool.clone(), command.args.clone());
            let printable = runner.get_full_command();
            let kind = if command.is_test_project {
                "test project"
            } else {
                "project"
            };
            info!(
                "Building {kind} {}/{command_count}: {}",
                idx + 1,
                command.project_name
            );
            info!("$ {printable}");

            if !self.performed.insert(printable) {
                warn!("build command already performed, skipping...");
                continue;
            }

            let label = format!("build {}", command.project_name);
            let status = match output.capture(&label, runner).await {
                Ok(status) => status,
                Err(IoError::ProcessCreationFailed(err)) => return Err(Error::ToolNotFound(err)),
                Err(err) => return Err(err.into()),
            };
            if !status.success() {
                return Err(Error::BuildFailed {
                    project: command.project_name,
                    status,
                });
            }
        }

        Ok(warnings)
    }

    fn collect_outputs(&self, configuration: &str, platform: &str) -> Result<ProjectOutputMap> {
        let mut map = ProjectOutputMap::new();
        // Shared libraries never carry an installable artifact. Applications
        // stay in the map even without outputs so a missing package is reported.
        for project in self.projects.iter().filter(|project| project.is_application()) {
            let outputs = Self::collect_project_outputs(project, configuration, platform)?;
            if outputs.is_empty() {
                warn!("No output found for application project ({})", project.name);
            }
            map.insert(
                project.name.clone(),
                ProjectOutput {
                    project_name: project.name.clone(),
                    outputs,
                },
            );
        }
        Ok(map)
    }

    fn collect_test_project_outputs(
        &self,
        configuration: &str,
        platform: &str,
    ) -> Result<(TestProjectOutputMap, Vec<String>)> {
        let mut map = TestProjectOutputMap::new();
        let mut warnings = Vec::new();

        for project in self.test_projects() {
            let outputs = Self::collect_project_outputs(project, configuration, platform)?;
            let Some(assembly) = outputs
                .into_iter()
                .filter(|output| output.output_type == OutputType::Library)
                .last()
            else {
                warnings.push(format!(
                    "No test assembly found for test project ({}), skipping...",
                    project.name
                ));
                continue;
            };
            map.insert(
                project.name.clone(),
                TestProjectOutput {
                    test_project_name: project.name.clone(),
                    test_assembly_path: assembly.path,
                    referred_project_names: self.referred_project_names(project),
                },
            );
        }

        Ok((map, warnings))
    }
}
