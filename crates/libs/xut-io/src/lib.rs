//! Process execution and I/O management for the xut test step.
//!
//! Provides utilities for spawning external tools (build tool, test runner,
//! pipeline exporter), streaming their output and collecting their exit status.
//!
//! # Usage
//!
//! ```rust,no_run
//! use xut_io::runner::{RunEvent, Runner};
//! use tokio::sync::mpsc::channel;
//!
//! # async fn example() {
//! let runner = Runner::new("echo", vec!["Hello, World!"]).with_env("GREETING", "1");
//! let (tx, mut rx) = channel(10);
//! let handle = runner.spawn(tx);
//!
//! while let Some(event) = rx.recv().await {
//!     match event {
//!         RunEvent::ProcessNewOutputLine(line) => println!("Output: {}", line),
//!         RunEvent::ProcessEnd(success) => println!("Process ended: {}", success),
//!         _ => {}
//!     }
//! }
//! let exit_status = handle.await;
//! # }
//! ```

pub mod error;
pub mod lookup;
pub mod output;
pub mod process;
pub mod runner;
