//! Solution (`.sln`) file parsing.

use std::path::{Component, Path, PathBuf};

use crate::prelude::*;

/// A project entry of a solution file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionProject {
    pub name: String,
    /// Absolute, normalized path of the project file.
    pub path: PathBuf,
    pub guid: String,
}

/// Lexically normalize `path`, resolving `.` and `..` without touching the disk.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Join a Windows-style relative path onto `base`.
pub fn join_windows_path(base: &Path, relative: &str) -> PathBuf {
    normalize_path(&base.join(relative.replace('\\', "/")))
}

/// Parse the `Project(...) = "Name", "path", "{GUID}"` lines of a solution.
///
/// Only `.csproj` entries are returned; solution folders and other project
/// kinds are skipped.
pub fn parse_solution(solution_path: &Path, content: &str) -> Result<Vec<SolutionProject>> {
    let solution_dir = solution_path.parent().unwrap_or_else(|| Path::new("."));
    let mut projects = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if !line.starts_with("Project(") {
            continue;
        }
        let Some((_, values)) = line.split_once('=') else {
            return Err(Error::SolutionParse {
                path: solution_path.to_path_buf(),
                reason: format!("line {}: missing '='", idx + 1),
            });
        };
        let values: Vec<&str> = values
            .split(',')
            .map(|value| value.trim().trim_matches('"'))
            .collect();
        let [name, relative_path, guid] = values.as_slice() else {
            return Err(Error::SolutionParse {
                path: solution_path.to_path_buf(),
                reason: format!("line {}: expected name, path and guid", idx + 1),
            });
        };
        if !relative_path.to_ascii_lowercase().ends_with(".csproj") {
            continue;
        }
        projects.push(SolutionProject {
            name: name.to_string(),
            path: join_windows_path(solution_dir, relative_path),
            guid: guid.to_string(),
        });
    }

    Ok(projects)
}
