//! Patch file index.
//!
//! Extracts the set of file paths a unified-diff patch document declares as
//! modification targets, from its `+++ b/<path>` destination headers.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex_lite::Regex;
use tracing::debug;

use crate::errors::CoreError;

/// The destination-side header of a unified diff, anchored to the line start.
fn target_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+\+\+ b/(.+)$").expect("target pattern is valid"))
}

/// Stateless extractor of patch modification targets.
pub struct PatchIndex;

impl PatchIndex {
    /// Return every path named by a `+++ b/<path>` line, in document order.
    ///
    /// Duplicates are preserved (a patch may touch a file in multiple hunks);
    /// a document with no such lines yields an empty vector. This is pure
    /// pattern extraction, not validation, so malformed input is never an
    /// error.
    pub fn targets(document: &str) -> Vec<String> {
        let targets: Vec<String> = document
            .lines()
            .filter_map(|line| target_pattern().captures(line))
            .map(|caps| caps[1].to_string())
            .collect();
        debug!(count = targets.len(), "extracted patch targets");
        targets
    }

    /// Read a patch file and return its modification targets.
    ///
    /// Decoding is best-effort: invalid UTF-8 is replaced, never fatal. I/O
    /// errors propagate.
    pub fn targets_from_file(path: &Path) -> Result<Vec<String>, CoreError> {
        let bytes = std::fs::read(path).map_err(|source| CoreError::PatchRead {
            path: PathBuf::from(path),
            source,
        })?;
        Ok(Self::targets(&String::from_utf8_lossy(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_in_document_order() {
        let patch = "\
diff --git a/src/main.go b/src/main.go
--- a/src/main.go
+++ b/src/main.go
@@ -1 +1 @@
-old
+new
diff --git a/README.md b/README.md
--- a/README.md
+++ b/README.md
@@ -1 +1 @@
-old
+new
";
        assert_eq!(
            PatchIndex::targets(patch),
            vec!["src/main.go".to_string(), "README.md".to_string()]
        );
    }

    #[test]
    fn test_empty_document_yields_no_targets() {
        assert!(PatchIndex::targets("").is_empty());
    }

    #[test]
    fn test_malformed_document_yields_no_targets() {
        let not_a_patch = "just some text\nwith lines\n";
        assert!(PatchIndex::targets(not_a_patch).is_empty());
    }

    #[test]
    fn test_header_must_start_the_line() {
        let patch = "  +++ b/indented.txt\nfoo +++ b/inline.txt\n";
        assert!(PatchIndex::targets(patch).is_empty());
    }

    #[test]
    fn test_duplicate_targets_preserved() {
        let patch = "+++ b/same.txt\n+++ b/same.txt\n";
        assert_eq!(
            PatchIndex::targets(patch),
            vec!["same.txt".to_string(), "same.txt".to_string()]
        );
    }

    #[test]
    fn test_dev_null_destination_is_not_a_target() {
        // Deleted files diff against /dev/null, not b/<path>.
        let patch = "--- a/gone.txt\n+++ /dev/null\n";
        assert!(PatchIndex::targets(patch).is_empty());
    }

    #[test]
    fn test_targets_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code.patch");
        std::fs::write(&path, "+++ b/a.txt\n+++ b/b/c.txt\n").unwrap();
        let targets = PatchIndex::targets_from_file(&path).unwrap();
        assert_eq!(targets, vec!["a.txt".to_string(), "b/c.txt".to_string()]);
    }

    #[test]
    fn test_targets_from_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PatchIndex::targets_from_file(&dir.path().join("missing.patch"));
        assert!(result.is_err());
    }
}
