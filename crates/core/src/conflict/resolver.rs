//! In-place resolution of conflict marker regions.
//!
//! The resolver walks a file's lines with a three-state machine and discards
//! the "ours" side of every conflict region, keeping only the incoming
//! ("theirs") lines and dropping the marker lines themselves.

use std::path::Path;

use tracing::{debug, info};

use crate::errors::ResolveError;

/// Start of a conflict region (ours side follows).
const CONFLICT_START: &str = "<<<<<<<";
/// Separator between the ours and theirs sides.
const CONFLICT_SEPARATOR: &str = "=======";
/// End of a conflict region.
const CONFLICT_END: &str = ">>>>>>>";

/// Scanner state while walking a line sequence.
///
/// Making the states explicit keeps the truncated-region behaviour a
/// deliberate transition: a start marker with no separator leaves the scan in
/// `SkipOurs` until end-of-file, dropping the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Not inside any conflict region; lines are copied verbatim.
    Outside,
    /// Between the start marker and the separator; lines are discarded.
    SkipOurs,
    /// Between the separator and the end marker; lines are copied verbatim.
    KeepTheirs,
}

/// Stateless conflict resolution over working files.
pub struct ConflictResolver;

impl ConflictResolver {
    /// Whether the file contains at least one conflict start marker.
    ///
    /// Decoding is best-effort (invalid bytes replaced, never fatal); only
    /// I/O failures are errors.
    pub fn has_markers(path: &Path) -> Result<bool, ResolveError> {
        let content = read_lossy(path)?;
        let found = content
            .lines()
            .any(|line| line.starts_with(CONFLICT_START));
        debug!(path = %path.display(), found, "scanned for conflict markers");
        Ok(found)
    }

    /// Resolve every conflict region in a line sequence, keeping the theirs
    /// side.
    ///
    /// Lines are expected to carry their original endings so that joining the
    /// result reproduces the input byte-for-byte outside resolved regions. A
    /// sequence without markers passes through unchanged, which makes the
    /// whole operation idempotent.
    pub fn resolve_lines<'a, I>(lines: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut kept = Vec::new();
        let mut state = ScanState::Outside;

        for line in lines {
            state = match state {
                ScanState::Outside => {
                    if line.starts_with(CONFLICT_START) {
                        ScanState::SkipOurs
                    } else {
                        kept.push(line);
                        ScanState::Outside
                    }
                }
                ScanState::SkipOurs => {
                    if line.starts_with(CONFLICT_SEPARATOR) {
                        ScanState::KeepTheirs
                    } else {
                        ScanState::SkipOurs
                    }
                }
                ScanState::KeepTheirs => {
                    if line.starts_with(CONFLICT_END) {
                        ScanState::Outside
                    } else {
                        kept.push(line);
                        ScanState::KeepTheirs
                    }
                }
            };
        }

        kept
    }

    /// Rewrite `path` in place with all conflict regions resolved.
    ///
    /// Either the full rewrite succeeds or an I/O error propagates; there is
    /// no partial-failure mode.
    pub fn resolve_file(path: &Path) -> Result<(), ResolveError> {
        let content = read_lossy(path)?;
        let resolved: String = Self::resolve_lines(content.split_inclusive('\n')).concat();

        let dropped = content.len() - resolved.len();
        std::fs::write(path, &resolved).map_err(|e| ResolveError::io(path, e))?;
        info!(path = %path.display(), dropped_bytes = dropped, "resolved conflict regions");
        Ok(())
    }
}

fn read_lossy(path: &Path) -> Result<String, ResolveError> {
    let bytes = std::fs::read(path).map_err(|e| ResolveError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
