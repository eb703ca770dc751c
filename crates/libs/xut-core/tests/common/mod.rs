#![allow(dead_code)]

use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    sync::Mutex,
};

use xut_build::{
    Output, OutputType, ProjectOutput, ProjectOutputMap, Sdk, SolutionBuilder,
    TestProjectOutput, TestProjectOutputMap,
};
use xut_config::StepConfig;
use xut_core::{
    error::Error,
    export::Exporter,
    nunit::{TestInvocation, TestRunner},
    prelude::Result,
};
use xut_io::output::RunOutput;

/// Builder serving canned outputs.
#[derive(Default)]
pub struct FakeBuilder {
    pub projects: ProjectOutputMap,
    pub tests: TestProjectOutputMap,
    pub fail_build: bool,
    pub built: bool,
}

impl FakeBuilder {
    pub fn with_project(mut self, name: &str, outputs: &[(&str, OutputType)]) -> Self {
        self.projects.insert(
            name.to_string(),
            ProjectOutput {
                project_name: name.to_string(),
                outputs: outputs
                    .iter()
                    .map(|(path, output_type)| Output {
                        path: PathBuf::from(path),
                        output_type: *output_type,
                    })
                    .collect(),
            },
        );
        self
    }

    pub fn with_test_project(mut self, name: &str, referred: &[&str]) -> Self {
        self.tests.insert(
            name.to_string(),
            TestProjectOutput {
                test_project_name: name.to_string(),
                test_assembly_path: PathBuf::from(format!("/w/{name}/bin/Release/{name}.dll")),
                referred_project_names: referred.iter().map(|r| r.to_string()).collect(),
            },
        );
        self
    }
}

impl SolutionBuilder for FakeBuilder {
    async fn build(
        &mut self,
        _configuration: &str,
        _platform: &str,
        sdks: &[Sdk],
        output: &mut RunOutput,
    ) -> xut_build::prelude::Result<Vec<String>> {
        assert_eq!(sdks, &[Sdk::Android]);
        self.built = true;
        output.push_line("build", String::from("Build started."));
        if self.fail_build {
            return Err(xut_build::error::Error::ToolNotFound(String::from("msbuild")));
        }
        Ok(vec![String::from("fake builder warning")])
    }

    fn collect_outputs(
        &self,
        _configuration: &str,
        _platform: &str,
    ) -> xut_build::prelude::Result<ProjectOutputMap> {
        Ok(self.projects.clone())
    }

    fn collect_test_project_outputs(
        &self,
        _configuration: &str,
        _platform: &str,
    ) -> xut_build::prelude::Result<(TestProjectOutputMap, Vec<String>)> {
        Ok((self.tests.clone(), Vec::new()))
    }
}

/// One scripted test run: the result log it leaves behind and whether it fails.
pub struct ScriptedRun {
    pub log: &'static str,
    pub fails: bool,
}

/// Test runner replaying [`ScriptedRun`]s and recording the artifact of each call.
pub struct ScriptedRunner {
    pub runs: Vec<ScriptedRun>,
    pub artifacts: RefCell<Vec<PathBuf>>,
}

impl ScriptedRunner {
    pub fn new(runs: Vec<ScriptedRun>) -> Self {
        Self {
            runs,
            artifacts: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.artifacts.borrow().len()
    }
}

impl TestRunner for ScriptedRunner {
    fn printable_command(&self, invocation: &TestInvocation<'_>) -> String {
        format!(
            "nunit3-console {} --result={}",
            invocation.test_assembly.display(),
            invocation.result_log_path.display()
        )
    }

    async fn run(&self, invocation: &TestInvocation<'_>, _: &mut RunOutput) -> Result<()> {
        assert_eq!(invocation.artifact_env, "ANDROID_APK_PATH");
        let call = self.calls();
        self.artifacts
            .borrow_mut()
            .push(invocation.artifact_path.to_path_buf());
        let run = &self.runs[call];
        std::fs::write(invocation.result_log_path, run.log)?;
        if run.fails {
            return Err(Error::RunnerFailed(String::from("exit status: 1")));
        }
        Ok(())
    }
}

/// Exporter keeping every export in memory.
#[derive(Default)]
pub struct RecordingExporter {
    exports: Mutex<Vec<(String, String)>>,
}

impl RecordingExporter {
    pub fn exports(&self) -> Vec<(String, String)> {
        self.exports.lock().expect("exports lock").clone()
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.exports()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl Exporter for RecordingExporter {
    async fn export(&self, key: &str, value: &str) -> Result<()> {
        self.exports
            .lock()
            .expect("exports lock")
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

pub fn step_config(deploy_dir: &Path) -> StepConfig {
    solution_step_config(Path::new("/w/App.sln"), deploy_dir)
}

pub fn solution_step_config(solution: &Path, deploy_dir: &Path) -> StepConfig {
    StepConfig {
        solution: solution.to_path_buf(),
        configuration: String::from("Release"),
        platform: String::from("Any CPU"),
        test_to_run: None,
        emulator_serial: String::from("emulator-5554"),
        deploy_dir: deploy_dir.to_path_buf(),
        nunit_console: None,
        build_tool: None,
    }
}
