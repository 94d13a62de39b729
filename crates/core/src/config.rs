//! Run configuration for the apply engine.
//!
//! Everything the engine needs is carried explicitly in [`ApplyConfig`];
//! nothing is inherited from the process working directory or other ambient
//! state. The CLI builds one of these from its arguments.

use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;

/// Configuration for a single patch-apply run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyConfig {
    /// Path to the unified-diff patch file.
    pub patch_path: PathBuf,

    /// Path to the Git repository working tree the patch applies to.
    pub repo_path: PathBuf,

    /// Commit message override. When `None`, a timestamped message
    /// referencing the patch file name is generated.
    pub message: Option<String>,

    /// Whether to push after committing.
    pub push: bool,

    /// When set, report what would happen without touching the working tree
    /// or the repository.
    pub dry_run: bool,
}

impl ApplyConfig {
    /// Create a configuration with the default behaviour: commit and push.
    pub fn new(patch_path: impl Into<PathBuf>, repo_path: impl Into<PathBuf>) -> Self {
        Self {
            patch_path: patch_path.into(),
            repo_path: repo_path.into(),
            message: None,
            push: true,
            dry_run: false,
        }
    }

    /// Check that the patch file and repository paths exist and look valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.patch_path.is_file() {
            return Err(ConfigError::PatchNotFound(self.patch_path.clone()));
        }
        if !self.repo_path.is_dir() {
            return Err(ConfigError::RepoNotFound(self.repo_path.clone()));
        }
        if !self.repo_path.join(".git").exists() {
            return Err(ConfigError::NotAGitRepository(self.repo_path.clone()));
        }
        debug!(
            patch = %self.patch_path.display(),
            repo = %self.repo_path.display(),
            "configuration validated"
        );
        Ok(())
    }

    /// The commit message for this run.
    ///
    /// Uses the override when given, otherwise a timestamped message naming
    /// the patch file.
    pub fn commit_message(&self) -> String {
        match &self.message {
            Some(msg) => msg.clone(),
            None => format!(
                "Auto-patch: {} ({})",
                patch_file_name(&self.patch_path),
                Local::now().format("%Y-%m-%d %H:%M:%S")
            ),
        }
    }
}

fn patch_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
