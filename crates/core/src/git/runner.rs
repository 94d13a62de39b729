//! Narrow command-runner seam over external process invocation.
//!
//! The rest of the crate never spawns processes directly; everything goes
//! through [`CommandRunner`] so the git client can be exercised in tests with
//! a scripted runner.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::errors::GitError;

/// Captured result of one external command invocation.
///
/// A nonzero exit code is data, not an error: callers observe it and decide
/// whether the failure gates anything.
#[derive(Debug, Clone)]
pub struct CmdOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout and stderr joined for echoing to the user, trimmed.
    pub fn combined(&self) -> String {
        let mut out = String::new();
        if !self.stdout.trim().is_empty() {
            out.push_str(self.stdout.trim());
        }
        if !self.stderr.trim().is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(self.stderr.trim());
        }
        out
    }
}

/// Capability to run an external command and capture its output.
pub trait CommandRunner {
    /// Run `program` with `args` in `cwd`, capturing stdout and stderr.
    ///
    /// Only failures to run the command at all (binary missing, spawn
    /// failure) are errors; a nonzero exit comes back as a [`CmdOutput`].
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> impl Future<Output = Result<CmdOutput, GitError>> + Send;
}

/// [`CommandRunner`] backed by real processes via `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<CmdOutput, GitError> {
        debug!(cmd = ?format!("{} {}", program, args.join(" ")), cwd = %cwd.display(), "running command");

        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GitError::BinaryNotFound(program.to_string())
                } else {
                    GitError::IoError(e)
                }
            })?;

        Ok(CmdOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}
