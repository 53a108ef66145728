//! Spawning the git executable
//!
//! Operations that have no engine equivalent (applying patch text, adding
//! submodules) shell out to git. Every such call blocks until the process
//! exits.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Result, TidelineError};

/// Creates a Command with platform-specific settings to hide console windows.
///
/// On Windows, this sets the CREATE_NO_WINDOW flag to prevent CMD popups.
/// On other platforms, it returns a standard Command.
pub fn create_command(program: &str) -> Command {
    let mut cmd = Command::new(program);

    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        // CREATE_NO_WINDOW = 0x08000000
        cmd.creation_flags(0x08000000);
    }

    // Prevent git credential popup dialogs
    cmd.env("GIT_TERMINAL_PROMPT", "0");

    cmd
}

/// Run git in `repo_path`, optionally feeding `stdin`, and return trimmed stdout
pub fn run_git(
    executable: &str,
    repo_path: &Path,
    args: &[&str],
    stdin: Option<&str>,
) -> Result<String> {
    tracing::debug!("Running {} {}", executable, args.join(" "));

    let mut child = create_command(executable)
        .current_dir(repo_path)
        .args(args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| TidelineError::OperationFailed(format!("Failed to run git: {}", e)))?;

    // Dropping the pipe closes stdin; the child is reaped before any write error surfaces
    let write_error = match (stdin, child.stdin.take()) {
        (Some(input), Some(mut pipe)) => pipe.write_all(input.as_bytes()).err(),
        _ => None,
    };

    let output = child.wait_with_output()?;
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if output.status.success() {
        match write_error {
            Some(e) => Err(e.into()),
            None => Ok(stdout),
        }
    } else {
        let message = if stderr.is_empty() { stdout } else { stderr };
        tracing::warn!("git {} failed: {}", args.join(" "), message);
        Err(TidelineError::OperationFailed(message))
    }
}
