//! Low-level async process management utilities.

use std::{
    ffi::OsStr,
    io,
    process::{ExitStatus, Stdio},
};

use tokio::process::{Child, Command};

/// Spawn a new async process with piped stdout and stderr.
///
/// `envs` are added to the child's environment only; the current process
/// environment is never modified. When `pipe_stdin` is set the child's stdin is
/// piped so the caller can feed it, otherwise stdin is closed.
///
/// # Examples
///
/// ```rust
/// use xut_io::process::spawn_process;
///
/// #[tokio::main]
/// async fn main() {
///     let envs = vec![(String::from("NAME"), String::from("value"))];
///     let mut child = spawn_process("echo", &[String::from("Hello")], &envs, false).unwrap();
///     let output = child.stdout.take().unwrap();
/// }
/// ```
pub fn spawn_process(
    cmd: &str,
    args: &[String],
    envs: &[(String, String)],
    pipe_stdin: bool,
) -> Result<Child, io::Error> {
    Command::new(OsStr::new(cmd))
        .args(args)
        .envs(envs.iter().map(|(key, value)| (key, value)))
        .stdin(if pipe_stdin {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
}

/// Asynchronously capture the exit status of a child process.
///
/// Waits for the child process to complete. There is no timeout: a child that
/// never exits blocks the caller.
///
/// # Examples
///
/// ```rust
/// use xut_io::process::{spawn_process, capture_exit_status};
///
/// #[tokio::main]
/// async fn main() {
///     let mut child = spawn_process("echo", &[String::from("done")], &[], false).unwrap();
///     let exit_status = capture_exit_status(&mut child).await.unwrap();
///     assert!(exit_status.success());
/// }
/// ```
pub async fn capture_exit_status(child: &mut Child) -> Result<ExitStatus, io::Error> {
    child.wait().await
}
