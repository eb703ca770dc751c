//! Executable lookup on `PATH`.

use std::{
    env,
    path::{Path, PathBuf},
};

/// Find the first of `names` that exists as a file in one of the `PATH` directories.
///
/// Names are tried in order for each directory, so earlier names win within
/// the same directory and earlier directories win over later ones.
pub fn find_in_path(names: &[&str]) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    find_in_dirs(env::split_paths(&path), names)
}

/// Same as [`find_in_path`] but over an explicit list of directories.
pub fn find_in_dirs<I, P>(dirs: I, names: &[&str]) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    dirs.into_iter().find_map(|dir| {
        names
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|candidate| candidate.is_file())
    })
}
