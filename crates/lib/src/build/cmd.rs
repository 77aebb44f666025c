//! External build command execution.
//!
//! The UI build is an opaque shell command (`npm run build` by default). It
//! runs in the frontend directory with the caller's environment, since
//! package managers need the user's PATH. Only its exit status matters;
//! output is forwarded to the log.

use std::path::Path;

use tokio::process::Command;
use tracing::{debug, info, warn};

use super::BuildError;

/// Run `cmd` through the platform shell inside `cwd`.
///
/// # Errors
///
/// Returns [`BuildError::Spawn`] if the shell cannot be started (for example
/// when `cwd` does not exist) and [`BuildError::CmdFailed`] on a non-zero exit.
pub async fn run_build_command(cmd: &str, cwd: &Path) -> Result<(), BuildError> {
  info!(cmd = %cmd, cwd = %cwd.display(), "running build command");

  let (shell_cmd, shell_args) = get_shell();

  let output = Command::new(shell_cmd)
    .args(shell_args)
    .arg(cmd)
    .current_dir(cwd)
    .kill_on_drop(true)
    .output()
    .await
    .map_err(|source| BuildError::Spawn {
      cmd: cmd.to_string(),
      source,
    })?;

  let stdout = String::from_utf8_lossy(&output.stdout);
  let stderr = String::from_utf8_lossy(&output.stderr);

  for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
    debug!(target: "swcache::build::output", "{}", line);
  }
  for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
    warn!(target: "swcache::build::output", "{}", line);
  }

  if !output.status.success() {
    return Err(BuildError::CmdFailed {
      cmd: cmd.to_string(),
      code: output.status.code(),
    });
  }

  info!(cmd = %cmd, "build command finished");
  Ok(())
}

/// Shell binary and the flag that passes it a command string.
#[cfg(unix)]
fn get_shell() -> (&'static str, &'static [&'static str]) {
  ("/bin/sh", &["-c"])
}

#[cfg(windows)]
fn get_shell() -> (&'static str, &'static [&'static str]) {
  ("cmd.exe", &["/C"])
}
