use std::{
    fs::File,
    io::{Write, stdout},
    path::{Path, PathBuf},
};

use strip_ansi_escapes::strip;
use tracing::{info, warn};
use xut_io::output::RunOutput;

use crate::prelude::*;

/// File receiving the captured logs inside the deploy directory.
pub const LOG_FILE_NAME: &str = "xut_logs.txt";

/// Print the captured logs and keep an ANSI-free copy in `deploy_dir`.
///
/// Failures are only reported as warnings.
pub fn dump_step_logs(output: &RunOutput, deploy_dir: Option<&Path>) {
    if output.is_empty() {
        return;
    }
    if let Err(err) = dump_logs(output, stdout()) {
        warn!("Failed to print captured logs: {err}");
    }
    let Some(deploy_dir) = deploy_dir else {
        return;
    };
    match dump_to_file(output, deploy_dir) {
        Ok(path) => info!("Logs written to: {}", path.display()),
        Err(err) => warn!("Failed to write captured logs to {}: {err}", deploy_dir.display()),
    }
}

fn strip_ansi_codes(input: &str) -> String {
    String::from_utf8_lossy(&strip(input.as_bytes())).to_string()
}

pub fn dump_to_file(output: &RunOutput, deploy_dir: &Path) -> Result<PathBuf> {
    let path = deploy_dir.join(LOG_FILE_NAME);
    let mut file = File::create(&path)?;
    dump_logs_internal(output, &mut file, true)?;
    Ok(path)
}

pub fn dump_logs<W: Write>(output: &RunOutput, writer: W) -> Result<()> {
    dump_logs_internal(output, writer, false)
}

fn dump_logs_internal<W: Write>(output: &RunOutput, mut writer: W, strip_ansi: bool) -> Result<()> {
    for (label, lines) in &output.logs {
        writeln!(writer, "========================")?;
        writeln!(writer, "Log outputs for {label}")?;
        writeln!(writer, "========================")?;

        if strip_ansi {
            for line in lines {
                writeln!(writer, "{}", strip_ansi_codes(line))?;
            }
        } else {
            for line in lines {
                writeln!(writer, "{line}")?;
            }
        }

        writeln!(writer)?;
    }

    Ok(())
}
