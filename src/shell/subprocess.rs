//! Captured subprocess execution.
//!
//! One command string in, captured stdout/stderr out. A failing child is
//! not an error: its complaint arrives through `stderr` and the resolution
//! loop keeps going. Only working-directory state lives outside this
//! boundary, because a chdir inside the subprocess would not persist.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

/// Captured output of one command execution.
#[derive(Clone, Debug, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Both streams concatenated, the form recorded into history.
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        text.push_str(&self.stderr);
        text
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("powershell");
    cmd.args(["-Command", command]);
    cmd
}

/// Non-Windows fallback so the tool stays usable for development and tests.
#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
    let mut cmd = Command::new(shell);
    cmd.arg("-c").arg(command);
    cmd
}

/// Run a command in the target shell and capture its output.
pub async fn run_command(command: &str) -> CommandOutput {
    debug!(command, "executing");

    let mut cmd = shell_command(command);
    cmd.stdin(Stdio::null());
    cmd.kill_on_drop(true);

    match cmd.output().await {
        Ok(output) => CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        Err(e) => CommandOutput {
            stdout: String::new(),
            stderr: format!("{e}\n"),
        },
    }
}
