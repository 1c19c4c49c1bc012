use crate::error::{AutobumpError, Result};
use crate::ui;
use std::path::Path;
use std::process::Command;

/// Runs the configured helper commands (release-metadata generator,
/// permissions fixer) as opaque shell commands.
///
/// Contract: command line run through `sh -c` in the repository root,
/// judged by exit code only; stdout/stderr are surfaced on failure.
pub struct ExternalCommand;

impl ExternalCommand {
    /// Execute a helper command, failing on a non-zero exit code.
    pub fn run(command_line: &str, cwd: &Path) -> Result<()> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .current_dir(cwd)
            .output()
            .map_err(|e| {
                AutobumpError::external(format!("Failed to run '{}': {}", command_line, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(AutobumpError::external(format!(
                "'{}' exited with code {}\nStdout: {}\nStderr: {}",
                command_line,
                output.status.code().unwrap_or(-1),
                stdout,
                stderr
            )));
        }

        Ok(())
    }

    /// Try to execute a helper command, logging errors but not failing.
    ///
    /// Used for the regenerable artifacts (release metadata, permissions):
    /// a broken helper script must not abort every commit.
    pub fn run_permissive(label: &str, command_line: &str, cwd: &Path) {
        match Self::run(command_line, cwd) {
            Ok(()) => {
                ui::display_success(&format!("{}: {}", label, command_line));
            }
            Err(e) => {
                ui::display_warning(&format!("{} skipped: {}", label, e));
            }
        }
    }
}
