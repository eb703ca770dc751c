//! Result log interpretation.
//!
//! The test runner's result log is scanned as line-oriented text. A line that
//! is exactly `<failure>` arms a one-line lookback; when the very next line
//! starts with `<message>` it becomes the current failure message. Later
//! messages replace earlier ones, so the last failure in the document wins.
//! Lines are compared after trimming surrounding whitespace.

use std::{
    fs,
    io::BufRead,
    path::Path,
};

use crate::prelude::*;

/// Line that opens a failure block.
pub const FAILURE_MARKER: &str = "<failure>";
/// Prefix of the line carrying a failure message.
pub const MESSAGE_MARKER: &str = "<message>";

/// Streaming failure message scanner. Keeps O(1) state besides the last message.
#[derive(Debug, Default)]
pub struct FailureScanner {
    armed: bool,
    last_message: Option<String>,
}

impl FailureScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process the next line of the log.
    pub fn feed(&mut self, line: &str) {
        let line = line.trim();
        if line == FAILURE_MARKER {
            self.armed = true;
            return;
        }
        if self.armed && line.starts_with(MESSAGE_MARKER) {
            self.last_message = Some(line.to_string());
        }
        self.armed = false;
    }

    /// Last failure message seen, or an empty string.
    pub fn finish(self) -> String {
        self.last_message.unwrap_or_default()
    }
}

/// Last failure message of a result log, or an empty string when there is none.
pub fn extract_failure_message(content: &str) -> String {
    let mut scanner = FailureScanner::new();
    for line in content.lines() {
        scanner.feed(line);
    }
    scanner.finish()
}

/// Same as [`extract_failure_message`] over a reader.
///
/// Invalid UTF-8 is replaced rather than rejected. A read error ends the scan
/// and whatever was found so far is returned.
pub fn extract_failure_message_from_reader<R: BufRead>(mut reader: R) -> String {
    let mut scanner = FailureScanner::new();
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(_) => scanner.feed(&String::from_utf8_lossy(&buffer)),
        }
    }
    scanner.finish()
}

/// Read the whole result log at `path`.
pub fn read_result_log(path: &Path) -> Result<String> {
    if !path.try_exists()? {
        return Err(Error::ResultLogMissing(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}
