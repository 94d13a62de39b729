//! Patch apply engine.
//!
//! Orchestrates one run: apply the patch with a three-way merge, resolve any
//! conflict regions in favour of the patch, stage, commit, and push. External
//! command failures are echoed and the run continues best-effort; only I/O
//! errors abort.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ApplyConfig;
use crate::conflict::ConflictResolver;
use crate::errors::CoreError;
use crate::git::runner::{CmdOutput, CommandRunner, SystemRunner};
use crate::git::{CommitOutcome, GitClient};
use crate::patch::PatchIndex;

/// Summary of one apply run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyReport {
    /// File paths the patch declares as modification targets, in order.
    pub targets: Vec<String>,
    /// Targets that contained conflict markers and were rewritten.
    pub resolved: Vec<String>,
    /// Whether `git apply --3way` succeeded without falling back.
    pub applied_cleanly: bool,
    /// Whether a commit was created.
    pub committed: bool,
    /// Whether the push succeeded.
    pub pushed: bool,
    /// The commit message used (or that would have been used on a dry run).
    pub commit_message: String,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

/// Drives a full patch-apply run against one repository.
pub struct ApplyEngine<R: CommandRunner = SystemRunner> {
    config: ApplyConfig,
    git: GitClient<R>,
}

impl ApplyEngine<SystemRunner> {
    /// Create an engine for the repository named by `config`.
    pub fn new(config: ApplyConfig) -> Self {
        let git = GitClient::new(&config.repo_path);
        Self { config, git }
    }
}

impl<R: CommandRunner> ApplyEngine<R> {
    /// Create an engine with a custom git client (used by tests).
    pub fn with_client(config: ApplyConfig, git: GitClient<R>) -> Self {
        Self { config, git }
    }

    /// Run the full pipeline and return a report.
    pub async fn run(&self) -> Result<ApplyReport, CoreError> {
        self.config.validate()?;

        let mut report = ApplyReport {
            targets: Vec::new(),
            resolved: Vec::new(),
            applied_cleanly: false,
            committed: false,
            pushed: false,
            commit_message: self.config.commit_message(),
            dry_run: self.config.dry_run,
        };

        report.targets = PatchIndex::targets_from_file(&self.config.patch_path)?;
        report.applied_cleanly = self.apply_patch(&report.targets).await?;
        report.resolved = self.resolve_targets(&report.targets).await?;

        if self.config.dry_run {
            info!("dry run: skipping commit and push");
            return Ok(report);
        }

        let outcome = self.commit_all(&report.commit_message).await?;
        match outcome {
            CommitOutcome::Committed(_) => report.committed = true,
            CommitOutcome::NothingToCommit(_) => {
                info!("nothing new to commit, skipping push");
                return Ok(report);
            }
            CommitOutcome::Failed(output) => {
                warn!(output = %output.combined(), "commit failed, continuing");
            }
        }

        if self.config.push {
            report.pushed = self.push().await?;
        } else {
            info!("push disabled, stopping after commit");
        }

        Ok(report)
    }

    /// Apply the patch with `--3way`, falling back to `--reject` on failure.
    ///
    /// Returns whether the three-way apply succeeded. Neither outcome halts
    /// the run: the resolver still walks the declared targets afterwards.
    /// The `--reject` fallback runs only when the failed 3-way apply left no
    /// conflict markers in any target.
    async fn apply_patch(&self, targets: &[String]) -> Result<bool, CoreError> {
        if self.config.dry_run {
            info!("dry run: skipping patch application");
            return Ok(false);
        }

        info!(patch = %self.config.patch_path.display(), "applying patch with 3-way merge");
        let output = self.git.apply_3way(&self.config.patch_path).await?;
        echo("git apply --3way", &output);
        if output.success() {
            return Ok(true);
        }

        if self.any_target_conflicted(targets)? {
            info!("3-way apply left conflict markers, handing over to the resolver");
            return Ok(false);
        }

        warn!("3-way apply failed, attempting --reject fallback");
        let fallback = self.git.apply_reject(&self.config.patch_path).await?;
        echo("git apply --reject", &fallback);
        Ok(false)
    }

    fn any_target_conflicted(&self, targets: &[String]) -> Result<bool, CoreError> {
        for target in targets {
            let abs_path = self.config.repo_path.join(target);
            if abs_path.exists() && ConflictResolver::has_markers(&abs_path)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Rewrite and stage every declared target that contains conflict markers.
    async fn resolve_targets(&self, targets: &[String]) -> Result<Vec<String>, CoreError> {
        let mut resolved = Vec::new();

        for target in targets {
            let abs_path = self.config.repo_path.join(target);
            if !abs_path.exists() {
                continue;
            }
            if !ConflictResolver::has_markers(&abs_path)? {
                continue;
            }

            if self.config.dry_run {
                info!(path = %target, "dry run: would resolve conflicts");
                resolved.push(target.clone());
                continue;
            }

            ConflictResolver::resolve_file(&abs_path)?;
            info!(path = %target, "kept incoming side of conflicts");
            let output = self.git.add(target).await?;
            echo("git add", &output);
            resolved.push(target.clone());
        }

        Ok(resolved)
    }

    /// Stage everything and commit.
    async fn commit_all(&self, message: &str) -> Result<CommitOutcome, CoreError> {
        info!("staging changes");
        let output = self.git.add_all().await?;
        echo("git add .", &output);

        info!(message, "committing");
        Ok(self.git.commit(message).await?)
    }

    /// Push to the configured remote; a rejected push is reported, not fatal.
    async fn push(&self) -> Result<bool, CoreError> {
        info!("pushing to remote");
        let output = self.git.push().await?;
        echo("git push", &output);
        if !output.success() {
            warn!(exit_code = output.exit_code, "push failed");
        }
        Ok(output.success())
    }
}

/// Surface an external command's output to the user.
fn echo(label: &str, output: &CmdOutput) {
    let combined = output.combined();
    if combined.is_empty() {
        return;
    }
    if output.success() {
        info!(%label, "{}", combined);
    } else {
        warn!(%label, exit_code = output.exit_code, "{}", combined);
    }
}
