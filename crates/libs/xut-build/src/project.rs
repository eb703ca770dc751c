//! Project (`.csproj`) analysis.
//!
//! Project files are scanned as text, not parsed as XML documents. Only the
//! handful of properties the step needs are looked up.

use std::path::{Path, PathBuf};

use crate::{
    output::Sdk,
    solution::{SolutionProject, join_windows_path},
};

/// Test framework a project is written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFramework {
    XamarinUITest,
}

/// An `<OutputPath>` declared in a `<PropertyGroup>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPath {
    /// Right-hand side of the group condition, e.g. `Release|AnyCPU`.
    /// `None` for an unconditional group.
    pub condition: Option<String>,
    /// Path as written, relative to the project directory.
    pub path: String,
}

/// What a project file declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    pub assembly_name: String,
    /// `<OutputType>`, e.g. `Library` or `Exe`.
    pub output_type: Option<String>,
    pub android_application: bool,
    pub test_framework: Option<TestFramework>,
    /// Absolute, normalized paths of `<ProjectReference>` includes.
    pub reference_paths: Vec<PathBuf>,
    /// Output paths in declaration order.
    pub output_paths: Vec<OutputPath>,
}

/// Inner text of the first `<tag>...</tag>` element.
fn tag_value<'a>(content: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = content.find(&open)? + open.len();
    let end = content[start..].find(&close)? + start;
    Some(content[start..end].trim())
}

/// Values of `attribute` on every `<element ...>` start tag.
fn attribute_values<'a>(content: &'a str, element: &str, attribute: &str) -> Vec<&'a str> {
    let open = format!("<{element} ");
    let needle = format!("{attribute}=\"");
    let mut values = Vec::new();
    let mut rest = content;

    while let Some(pos) = rest.find(&open) {
        let tag = &rest[pos + open.len()..];
        let tag_end = tag.find('>').unwrap_or(tag.len());
        let tag = &tag[..tag_end];
        if let Some(attr_pos) = tag.find(&needle) {
            let value = &tag[attr_pos + needle.len()..];
            if let Some(value_end) = value.find('"') {
                values.push(&value[..value_end]);
            }
        }
        rest = &rest[pos + open.len() + tag_end..];
    }
    values
}

/// Condition and body of every `<PropertyGroup>` element.
fn property_groups(content: &str) -> Vec<(Option<&str>, &str)> {
    const OPEN: &str = "<PropertyGroup";
    const CLOSE: &str = "</PropertyGroup>";
    const CONDITION: &str = "Condition=\"";
    let mut groups = Vec::new();
    let mut rest = content;

    while let Some(pos) = rest.find(OPEN) {
        let after = &rest[pos + OPEN.len()..];
        if !after.starts_with([' ', '>', '\t', '\r', '\n']) {
            rest = after;
            continue;
        }
        let Some(tag_end) = after.find('>') else {
            break;
        };
        let tag = &after[..tag_end];
        let condition = tag.find(CONDITION).and_then(|start| {
            let value = &tag[start + CONDITION.len()..];
            value.find('"').map(|end| &value[..end])
        });
        let body = &after[tag_end + 1..];
        let body_end = body.find(CLOSE).unwrap_or(body.len());
        groups.push((condition, &body[..body_end]));
        rest = &body[body_end..];
    }
    groups
}

/// `Release|AnyCPU` out of `'$(Configuration)|$(Platform)' == 'Release|AnyCPU'`.
fn condition_value(condition: &str) -> &str {
    let value = condition
        .split_once("==")
        .map_or(condition, |(_, value)| value);
    value.trim().trim_matches('\'').trim()
}

fn without_spaces(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

fn output_paths(content: &str) -> Vec<OutputPath> {
    property_groups(content)
        .into_iter()
        .filter_map(|(condition, body)| {
            let path = tag_value(body, "OutputPath").filter(|path| !path.is_empty())?;
            Some(OutputPath {
                condition: condition.map(|c| condition_value(c).to_string()),
                path: path.to_string(),
            })
        })
        .collect()
}

fn references_uitest(content: &str) -> bool {
    ["Reference", "PackageReference"].iter().any(|element| {
        attribute_values(content, element, "Include")
            .iter()
            .any(|include| {
                include
                    .split(',')
                    .next()
                    .is_some_and(|name| name.trim() == "Xamarin.UITest")
            })
    })
}

impl Project {
    /// Analyze the content of the project file of `entry`.
    pub fn parse(entry: &SolutionProject, content: &str) -> Self {
        let project_dir = entry.path.parent().unwrap_or_else(|| Path::new("."));
        let mut reference_paths: Vec<PathBuf> = Vec::new();
        for include in attribute_values(content, "ProjectReference", "Include") {
            let path = join_windows_path(project_dir, include);
            if !reference_paths.contains(&path) {
                reference_paths.push(path);
            }
        }

        Self {
            name: entry.name.clone(),
            path: entry.path.clone(),
            assembly_name: tag_value(content, "AssemblyName")
                .filter(|name| !name.is_empty() && !name.contains("$("))
                .unwrap_or(entry.name.as_str())
                .to_string(),
            output_type: tag_value(content, "OutputType").map(str::to_string),
            android_application: tag_value(content, "AndroidApplication")
                .is_some_and(|value| value.eq_ignore_ascii_case("true")),
            test_framework: references_uitest(content).then_some(TestFramework::XamarinUITest),
            reference_paths,
            output_paths: output_paths(content),
        }
    }

    /// Directory holding the project file.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn is_uitest(&self) -> bool {
        self.test_framework == Some(TestFramework::XamarinUITest)
    }

    /// Whether the project is an application for `sdk`.
    pub fn targets(&self, sdk: Sdk) -> bool {
        match sdk {
            Sdk::Android => self.android_application,
        }
    }

    /// Whether the project is an application for any supported SDK.
    pub fn is_application(&self) -> bool {
        self.android_application
    }

    /// `<OutputPath>` that applies to `configuration` and `platform`.
    ///
    /// A group conditioned on the build settings wins over an unconditional
    /// one. `$(Configuration)` and `$(Platform)` are expanded.
    pub fn declared_output_dir(&self, configuration: &str, platform: &str) -> Option<PathBuf> {
        let platform = without_spaces(platform);
        let matches = |condition: &str| {
            let mut parts = condition.split('|');
            let config_matches = parts
                .next()
                .is_some_and(|c| c.trim().eq_ignore_ascii_case(configuration));
            let platform_matches = parts
                .next()
                .is_none_or(|p| without_spaces(p).eq_ignore_ascii_case(&platform));
            config_matches && platform_matches
        };

        let declared = self
            .output_paths
            .iter()
            .find(|output| output.condition.as_deref().is_some_and(matches))
            .or_else(|| {
                self.output_paths
                    .iter()
                    .find(|output| output.condition.is_none())
            })?;
        let path = declared
            .path
            .replace("$(Configuration)", configuration)
            .replace("$(Platform)", &platform);
        Some(join_windows_path(self.dir(), &path))
    }

    /// Directories the build writes this project's artifacts to, most specific last.
    ///
    /// A declared `<OutputPath>` is used as is; otherwise the msbuild defaults
    /// `bin/<configuration>` and `bin/<platform>/<configuration>` are searched.
    pub fn output_dirs(&self, configuration: &str, platform: &str) -> Vec<PathBuf> {
        if let Some(dir) = self.declared_output_dir(configuration, platform) {
            return vec![dir];
        }
        let bin = self.dir().join("bin");
        let platform = without_spaces(platform);
        let mut dirs = vec![bin.join(configuration)];
        if !platform.is_empty() && !platform.eq_ignore_ascii_case("AnyCPU") {
            dirs.push(bin.join(platform).join(configuration));
        }
        dirs
    }
}
