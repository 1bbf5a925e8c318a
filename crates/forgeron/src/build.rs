//! Build invocation against a request workspace.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

/// Result of one build invocation.
#[derive(Debug)]
pub struct BuildOutcome {
    /// Process exit code; `None` when the build did not exit on its own
    /// (killed by a signal or by the configured timeout).
    pub exit_code: Option<i32>,
    /// Captured standard error, byte-for-byte.
    pub stderr: Vec<u8>,
}

impl BuildOutcome {
    /// Exit code 0 means success; anything else is a build failure.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run `make -f <build_file>` with `workspace` as the working directory.
///
/// The build file path is already absolute, so the invocation is
/// independent of the workspace it runs in. Stdout is discarded; stderr is
/// captured for the failure response. With a timeout configured, an
/// overrunning build is killed and reported as a failure; without one the
/// invocation may run arbitrarily long.
pub async fn run_build(
    build_file: &Path,
    workspace: &Path,
    timeout: Option<Duration>,
) -> std::io::Result<BuildOutcome> {
    let mut command = Command::new("make");
    command
        .arg("-f")
        .arg(build_file)
        .current_dir(workspace)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!(workspace = %workspace.display(), "spawning build");

    let running = command.output();
    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, running).await {
            Ok(output) => output?,
            Err(_) => {
                tracing::warn!(
                    workspace = %workspace.display(),
                    timeout_secs = limit.as_secs(),
                    "build exceeded timeout, killed"
                );
                return Ok(BuildOutcome {
                    exit_code: None,
                    stderr: format!("build exceeded timeout of {}s\n", limit.as_secs())
                        .into_bytes(),
                });
            }
        },
        None => running.await?,
    };

    Ok(BuildOutcome {
        exit_code: output.status.code(),
        stderr: output.stderr,
    })
}
