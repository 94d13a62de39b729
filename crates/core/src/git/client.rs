//! Thin client over the `git` CLI.
//!
//! Every operation is a single external invocation with its output captured.
//! Nonzero exits are reported back as [`CmdOutput`] values so the caller can
//! echo them and decide whether to continue; only a missing binary or spawn
//! failure is an error.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use super::runner::{CmdOutput, CommandRunner, SystemRunner};
use crate::errors::GitError;

/// Result of a `git commit` attempt.
#[derive(Debug, Clone)]
pub enum CommitOutcome {
    /// A new commit was created.
    Committed(CmdOutput),
    /// The working tree had nothing staged worth committing.
    NothingToCommit(CmdOutput),
    /// The commit command failed for some other reason.
    Failed(CmdOutput),
}

/// Client for a Git working tree, wrapping the external `git` binary.
#[derive(Debug, Clone)]
pub struct GitClient<R: CommandRunner = SystemRunner> {
    repo_path: PathBuf,
    runner: R,
}

impl GitClient<SystemRunner> {
    /// Create a client for the working tree at `repo_path`.
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self::with_runner(repo_path, SystemRunner)
    }
}

impl<R: CommandRunner> GitClient<R> {
    /// Create a client with a custom command runner.
    pub fn with_runner(repo_path: impl Into<PathBuf>, runner: R) -> Self {
        let client = Self {
            repo_path: repo_path.into(),
            runner,
        };
        debug!(repo = %client.repo_path.display(), "created GitClient");
        client
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Apply a patch with a three-way merge, leaving conflict markers in the
    /// working tree where the merge could not be completed automatically.
    #[instrument(skip(self), fields(repo = %self.repo_path.display()))]
    pub async fn apply_3way(&self, patch: &Path) -> Result<CmdOutput, GitError> {
        let patch_str = patch.to_string_lossy();
        self.run_git(&["apply", "--3way", &patch_str]).await
    }

    /// Apply a patch, writing `.rej` files for hunks that do not apply.
    #[instrument(skip(self), fields(repo = %self.repo_path.display()))]
    pub async fn apply_reject(&self, patch: &Path) -> Result<CmdOutput, GitError> {
        let patch_str = patch.to_string_lossy();
        self.run_git(&["apply", "--reject", &patch_str]).await
    }

    /// Stage a single path.
    #[instrument(skip(self), fields(repo = %self.repo_path.display()))]
    pub async fn add(&self, pathspec: &str) -> Result<CmdOutput, GitError> {
        self.run_git(&["add", pathspec]).await
    }

    /// Stage every change in the working tree.
    #[instrument(skip(self), fields(repo = %self.repo_path.display()))]
    pub async fn add_all(&self) -> Result<CmdOutput, GitError> {
        self.run_git(&["add", "."]).await
    }

    /// Commit staged changes with the given message.
    #[instrument(skip(self, message), fields(repo = %self.repo_path.display()))]
    pub async fn commit(&self, message: &str) -> Result<CommitOutcome, GitError> {
        let output = self.run_git(&["commit", "-m", message]).await?;

        if output.success() {
            info!("commit created");
            return Ok(CommitOutcome::Committed(output));
        }
        if output.combined().to_lowercase().contains("nothing to commit") {
            info!("nothing to commit");
            return Ok(CommitOutcome::NothingToCommit(output));
        }
        warn!(exit_code = output.exit_code, "commit failed");
        Ok(CommitOutcome::Failed(output))
    }

    /// Push to the currently configured remote and branch.
    #[instrument(skip(self), fields(repo = %self.repo_path.display()))]
    pub async fn push(&self) -> Result<CmdOutput, GitError> {
        self.run_git(&["push"]).await
    }

    async fn run_git(&self, args: &[&str]) -> Result<CmdOutput, GitError> {
        self.runner.run("git", args, &self.repo_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Runner that replays canned outputs and records the invocations it saw.
    struct ScriptedRunner {
        outputs: Mutex<Vec<CmdOutput>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedRunner {
        fn new(outputs: Vec<CmdOutput>) -> Self {
            Self {
                outputs: Mutex::new(outputs),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandRunner for &ScriptedRunner {
        async fn run(
            &self,
            _program: &str,
            args: &[&str],
            _cwd: &Path,
        ) -> Result<CmdOutput, GitError> {
            self.calls
                .lock()
                .unwrap()
                .push(args.iter().map(|s| s.to_string()).collect());
            Ok(self.outputs.lock().unwrap().remove(0))
        }
    }

    fn out(exit_code: i32, stdout: &str, stderr: &str) -> CmdOutput {
        CmdOutput {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    #[tokio::test]
    async fn test_commit_outcome_committed() {
        let runner = ScriptedRunner::new(vec![out(0, "[main abc123] msg\n", "")]);
        let client = GitClient::with_runner("/repo", &runner);
        let outcome = client.commit("msg").await.unwrap();
        assert!(matches!(outcome, CommitOutcome::Committed(_)));
        assert_eq!(runner.calls(), vec![vec!["commit", "-m", "msg"]]);
    }

    #[tokio::test]
    async fn test_commit_outcome_nothing_to_commit() {
        let runner = ScriptedRunner::new(vec![out(
            1,
            "On branch main\nnothing to commit, working tree clean\n",
            "",
        )]);
        let client = GitClient::with_runner("/repo", &runner);
        let outcome = client.commit("msg").await.unwrap();
        assert!(matches!(outcome, CommitOutcome::NothingToCommit(_)));
    }

    #[tokio::test]
    async fn test_commit_outcome_failed() {
        let runner =
            ScriptedRunner::new(vec![out(128, "", "fatal: empty ident name not allowed\n")]);
        let client = GitClient::with_runner("/repo", &runner);
        let outcome = client.commit("msg").await.unwrap();
        assert!(matches!(outcome, CommitOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_apply_3way_arguments() {
        let runner = ScriptedRunner::new(vec![out(0, "", "")]);
        let client = GitClient::with_runner("/repo", &runner);
        client
            .apply_3way(Path::new("/patches/code.patch"))
            .await
            .unwrap();
        assert_eq!(
            runner.calls(),
            vec![vec!["apply", "--3way", "/patches/code.patch"]]
        );
    }

    #[tokio::test]
    async fn test_nonzero_apply_is_not_an_error() {
        let runner = ScriptedRunner::new(vec![out(1, "", "error: patch failed\n")]);
        let client = GitClient::with_runner("/repo", &runner);
        let output = client.apply_3way(Path::new("p.patch")).await.unwrap();
        assert!(!output.success());
        assert!(output.combined().contains("patch failed"));
    }
}
