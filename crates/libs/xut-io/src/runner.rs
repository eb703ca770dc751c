//! High-level process runner with event handling.

use std::process::ExitStatus;

use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader},
    sync::mpsc::Sender,
    task::JoinHandle,
};
use tracing::warn;

use crate::process::{capture_exit_status, spawn_process};

/// Events emitted during process execution.
#[derive(Debug, PartialEq)]
pub enum RunEvent {
    /// Process creation failed with error message.
    ProcessCreationFailed(String),
    /// Process was successfully created.
    ProcessCreated,
    /// Process ended (true = success, false = failure).
    ProcessEnd(bool),
    /// New output line from the process, without its line terminator.
    ProcessNewOutputLine(String),
}

/// High-level process runner with event-driven output handling.
#[derive(Debug, Clone)]
pub struct Runner {
    /// Command to execute.
    command: String,
    /// Command line arguments.
    args: Vec<String>,
    /// Environment variables set on the child only.
    envs: Vec<(String, String)>,
    /// Data written to the child's stdin before it is closed.
    stdin: Option<String>,
}

impl Runner {
    /// Create a new runner with command and arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xut_io::runner::Runner;
    ///
    /// let runner = Runner::new("ls", vec!["-la", "/tmp"]);
    /// ```
    pub fn new(command: impl Into<String>, args: Vec<impl Into<String>>) -> Self {
        Self {
            command: command.into(),
            args: args.into_iter().map(|a| a.into()).collect(),
            envs: Vec::new(),
            stdin: None,
        }
    }

    /// Create a new runner with just a command (no arguments).
    pub fn new_without_args(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            envs: Vec::new(),
            stdin: None,
        }
    }

    /// Add an environment variable to the child process.
    ///
    /// A later value for the same key replaces the earlier one.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.envs.retain(|(k, _)| *k != key);
        self.envs.push((key, value.into()));
        self
    }

    /// Feed `input` to the child's stdin, then close it.
    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Get the full command string with arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xut_io::runner::Runner;
    ///
    /// let runner = Runner::new("ls", vec!["-la"]);
    /// assert_eq!(runner.get_full_command(), "ls -la");
    /// ```
    pub fn get_full_command(&self) -> String {
        if self.args.is_empty() {
            return self.command.clone();
        }
        format!("{} {}", &self.command, &self.args.join(" "))
    }

    /// Environment variables that will be set on the child.
    pub fn envs(&self) -> &[(String, String)] {
        &self.envs
    }

    fn launch_stream_reader<T>(tx: Sender<RunEvent>, stream: T) -> JoinHandle<()>
    where
        T: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stream).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if tx.send(RunEvent::ProcessNewOutputLine(line)).await.is_err() {
                    break;
                }
            }
        })
    }

    /// Run the process with event monitoring.
    ///
    /// Starts the process and sends events via the provided channel. Reads
    /// stdout and stderr line by line until the process finishes. Returns
    /// `None` when the process could not be created or its exit status could
    /// not be collected.
    pub async fn run(&self, tx: Sender<RunEvent>) -> Option<ExitStatus> {
        let mut process =
            match spawn_process(&self.command, &self.args, &self.envs, self.stdin.is_some()) {
                Ok(process) => process,
                Err(err) => {
                    let _ = tx
                        .send(RunEvent::ProcessCreationFailed(format!(
                            "{}: {err}",
                            self.command
                        )))
                        .await;
                    return None;
                }
            };

        let _ = tx.send(RunEvent::ProcessCreated).await;

        // Take stdout and stderr and launch a stream reader for each
        let stdout_task = process
            .stdout
            .take()
            .map(|stdout| Runner::launch_stream_reader(tx.clone(), stdout));
        let stderr_task = process
            .stderr
            .take()
            .map(|stderr| Runner::launch_stream_reader(tx.clone(), stderr));

        if let (Some(input), Some(mut stdin)) = (self.stdin.as_ref(), process.stdin.take()) {
            if let Err(err) = stdin.write_all(input.as_bytes()).await {
                warn!("Failed to write stdin of {} - {err}", self.command);
            }
            // Dropping stdin closes the pipe so the child sees EOF
        }

        let exit_status = capture_exit_status(&mut process).await.ok();

        for task in [stdout_task, stderr_task].into_iter().flatten() {
            let _ = task.await;
        }

        let success = exit_status.is_some_and(|status| status.success());
        let _ = tx.send(RunEvent::ProcessEnd(success)).await;
        exit_status
    }

    /// Run the process on a tokio task.
    ///
    /// The returned handle resolves to the exit status once the process and
    /// its output readers are done. The channel closes when the task ends.
    pub fn spawn(self, tx: Sender<RunEvent>) -> JoinHandle<Option<ExitStatus>> {
        tokio::spawn(async move { self.run(tx).await })
    }
}
