//! Error types for the autopatch core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O failure reading the patch document itself.
    #[error("failed to read patch file '{path}': {source}")]
    PatchRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Git errors
// ---------------------------------------------------------------------------

/// Errors from git CLI invocations.
///
/// A git command exiting nonzero is *not* represented here: the captured
/// output is returned to the caller, which decides whether the failure is
/// fatal. Only failures to run the command at all surface as errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// The `git` binary was not found on `$PATH`.
    #[error("git binary not found: {0}")]
    BinaryNotFound(String),

    /// Spawning or waiting on the command failed at the OS level.
    #[error("git I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Conflict resolution errors
// ---------------------------------------------------------------------------

/// Errors from reading or rewriting a conflicted working file.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Reading or writing the working file failed.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from validating the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The patch file does not exist or is not a regular file.
    #[error("patch file not found: {0}")]
    PatchNotFound(PathBuf),

    /// The repository directory does not exist.
    #[error("repository path not found: {0}")]
    RepoNotFound(PathBuf),

    /// The repository directory exists but has no `.git`.
    #[error("not a git repository: {0}")]
    NotAGitRepository(PathBuf),
}
