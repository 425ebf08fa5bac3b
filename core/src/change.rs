//! Change sets derived from a single commit's file status list.
//!
//! A [`ChangeSet`] holds the rockspec paths to upsert and to delete, each
//! mapped to the commit that produced the change. The two maps are kept
//! disjoint: recording a status for a path removes it from the other map,
//! so the last status seen for a path wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::DateTime;
use regex::Regex;

use crate::error::ExtractionError;
use crate::path::RockspecPath;

/// Per-path status reported by `git show --name-status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
}

impl ChangeStatus {
    /// Parses a single-letter status code (`A`, `M`, `D`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "A" => Some(Self::Added),
            "M" => Some(Self::Modified),
            "D" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// Rockspec changes introduced by one commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    /// Added or modified paths, keyed by path.
    pub to_upsert: BTreeMap<String, String>,
    /// Deleted paths, keyed by path.
    pub to_delete: BTreeMap<String, String>,
    pub commit_sha: String,
    /// Committer timestamp, ISO 8601 as printed by git (`%cI`).
    pub committed_at: String,
}

impl ChangeSet {
    /// Creates an empty change set for the given commit.
    pub fn new(commit_sha: impl Into<String>, committed_at: impl Into<String>) -> Self {
        Self {
            to_upsert: BTreeMap::new(),
            to_delete: BTreeMap::new(),
            commit_sha: commit_sha.into(),
            committed_at: committed_at.into(),
        }
    }

    /// Records `status` for `path`, overriding any earlier status.
    ///
    /// Returns `false` without recording anything when `path` is not a
    /// rockspec path.
    pub fn record(&mut self, status: ChangeStatus, path: &str) -> bool {
        if RockspecPath::parse(path).is_none() {
            return false;
        }

        match status {
            ChangeStatus::Added | ChangeStatus::Modified => {
                self.to_upsert.insert(path.to_string(), self.commit_sha.clone());
                self.to_delete.remove(path);
            }
            ChangeStatus::Deleted => {
                self.to_delete.insert(path.to_string(), self.commit_sha.clone());
                self.to_upsert.remove(path);
            }
        }
        true
    }

    /// Returns `true` when neither map has entries.
    pub fn is_empty(&self) -> bool {
        self.to_upsert.is_empty() && self.to_delete.is_empty()
    }

    /// Total number of paths touched.
    pub fn len(&self) -> usize {
        self.to_upsert.len() + self.to_delete.len()
    }

    /// Builds a change set from `git show` output.
    ///
    /// The output must start with the two header lines `commit: <sha>` and
    /// `date: <timestamp>`, followed by `<status>\t<path>` lines. Blank
    /// lines are ignored, as are status lines that are malformed, carry an
    /// unknown status, or name a non-rockspec path.
    ///
    /// Returns `Ok(None)` when no rockspec path was touched.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionError`] when a header line is missing or
    /// malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use rockup_sync_core::ChangeSet;
    ///
    /// let output = "commit: abc123\ndate: 2025-01-02T03:04:05+00:00\n\n\
    ///               M\trockspecs/github.com/foo/bar/pkg-1.0-1.rockspec\n\
    ///               A\tREADME.md\n";
    /// let changes = ChangeSet::from_show_output(output).unwrap().unwrap();
    /// assert_eq!(changes.commit_sha, "abc123");
    /// assert_eq!(changes.to_upsert.len(), 1);
    /// ```
    pub fn from_show_output(output: &str) -> Result<Option<Self>, ExtractionError> {
        static COMMIT_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^commit:\s+(.+)").expect("static regex must compile"));
        static DATE_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^date:\s+(.+)").expect("static regex must compile"));
        static TABS_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\t+").expect("static regex must compile"));

        let lines: Vec<&str> = output.lines().filter(|line| !line.is_empty()).collect();
        let [commit_line, date_line, entries @ ..] = lines.as_slice() else {
            return Err(ExtractionError::UnexpectedOutput);
        };

        let commit_sha = COMMIT_RE
            .captures(commit_line)
            .map(|caps| caps[1].trim().to_string())
            .ok_or_else(|| ExtractionError::MissingCommitHeader(commit_line.to_string()))?;
        let committed_at = DATE_RE
            .captures(date_line)
            .map(|caps| caps[1].trim().to_string())
            .ok_or_else(|| ExtractionError::MissingDateHeader(date_line.to_string()))?;
        DateTime::parse_from_rfc3339(&committed_at)
            .map_err(|_| ExtractionError::InvalidTimestamp(committed_at.clone()))?;

        let mut changes = Self::new(commit_sha, committed_at);
        for entry in entries {
            let mut fields = TABS_RE.split(entry);
            let (Some(code), Some(path)) = (fields.next(), fields.next()) else {
                continue;
            };
            if code.is_empty() || path.is_empty() {
                continue;
            }
            if let Some(status) = ChangeStatus::from_code(code) {
                changes.record(status, path);
            }
        }

        Ok((!changes.is_empty()).then_some(changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "0123456789abcdef0123456789abcdef01234567";
    const DATE: &str = "2025-03-04T05:06:07+09:00";
    const PKG: &str = "rockspecs/github.com/foo/bar/pkg-1.0.0-1.rockspec";

    fn show(entries: &[&str]) -> String {
        let mut out = format!("commit: {SHA}\ndate: {DATE}\n\n");
        for entry in entries {
            out.push_str(entry);
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ChangeStatus::from_code("A"), Some(ChangeStatus::Added));
        assert_eq!(ChangeStatus::from_code("M"), Some(ChangeStatus::Modified));
        assert_eq!(ChangeStatus::from_code("D"), Some(ChangeStatus::Deleted));
        assert_eq!(ChangeStatus::from_code("R100"), None);
        assert_eq!(ChangeStatus::from_code(""), None);
    }

    #[test]
    fn test_record_rejects_non_rockspec_paths() {
        let mut changes = ChangeSet::new(SHA, DATE);
        assert!(!changes.record(ChangeStatus::Added, "README.md"));
        assert!(!changes.record(ChangeStatus::Deleted, "rockspecs/a/b/c.rockspec"));
        assert!(changes.is_empty());
    }

    #[test]
    fn test_modify_then_delete_collapses_to_delete() {
        let mut changes = ChangeSet::new(SHA, DATE);
        changes.record(ChangeStatus::Modified, PKG);
        changes.record(ChangeStatus::Deleted, PKG);
        assert!(changes.to_upsert.is_empty());
        assert_eq!(changes.to_delete.get(PKG).map(String::as_str), Some(SHA));
    }

    #[test]
    fn test_delete_then_add_collapses_to_upsert() {
        let mut changes = ChangeSet::new(SHA, DATE);
        changes.record(ChangeStatus::Deleted, PKG);
        changes.record(ChangeStatus::Added, PKG);
        assert!(changes.to_delete.is_empty());
        assert_eq!(changes.to_upsert.get(PKG).map(String::as_str), Some(SHA));
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn test_from_show_output_classifies_entries() {
        let removed = "rockspecs/github.com/foo/bar/pkg-0.9.0-1.rockspec";
        let added = "rockspecs/github.com/foo/bar/pkg-1.1.0-1.rockspec";
        let output = show(&[
            &format!("M\t{PKG}"),
            &format!("A\t{added}"),
            &format!("D\t{removed}"),
            "M\tREADME.md",
        ]);
        let changes = ChangeSet::from_show_output(&output).unwrap().unwrap();
        assert_eq!(changes.commit_sha, SHA);
        assert_eq!(changes.committed_at, DATE);
        let upserts: Vec<&str> = changes.to_upsert.keys().map(String::as_str).collect();
        assert_eq!(upserts, vec![PKG, added]);
        let deletes: Vec<&str> = changes.to_delete.keys().map(String::as_str).collect();
        assert_eq!(deletes, vec![removed]);
        assert!(changes.to_upsert.values().all(|sha| sha == SHA));
    }

    #[test]
    fn test_from_show_output_last_status_wins() {
        let output = show(&[&format!("M\t{PKG}"), &format!("D\t{PKG}")]);
        let changes = ChangeSet::from_show_output(&output).unwrap().unwrap();
        assert!(changes.to_upsert.is_empty());
        assert_eq!(changes.to_delete.len(), 1);
    }

    #[test]
    fn test_from_show_output_handles_crlf_and_tab_runs() {
        let output = format!("commit: {SHA}\r\ndate: {DATE}\r\n\r\nA\t\t{PKG}\r\n");
        let changes = ChangeSet::from_show_output(&output).unwrap().unwrap();
        assert!(changes.to_upsert.contains_key(PKG));
    }

    #[test]
    fn test_from_show_output_without_rockspecs_is_none() {
        let output = show(&["M\tREADME.md", "A\tindex.html"]);
        assert_eq!(ChangeSet::from_show_output(&output).unwrap(), None);
        assert_eq!(ChangeSet::from_show_output(&show(&[])).unwrap(), None);
    }

    #[test]
    fn test_from_show_output_ignores_malformed_entries() {
        let output = show(&[PKG, "X\trockspecs/a/b/c/d-1.0-1.rockspec", "\t"]);
        assert_eq!(ChangeSet::from_show_output(&output).unwrap(), None);
    }

    #[test]
    fn test_from_show_output_requires_headers() {
        assert_eq!(
            ChangeSet::from_show_output("").unwrap_err(),
            ExtractionError::UnexpectedOutput
        );
        assert_eq!(
            ChangeSet::from_show_output(&format!("commit: {SHA}\n")).unwrap_err(),
            ExtractionError::UnexpectedOutput
        );
        assert!(matches!(
            ChangeSet::from_show_output(&format!("sha {SHA}\ndate: {DATE}\n")).unwrap_err(),
            ExtractionError::MissingCommitHeader(_)
        ));
        assert!(matches!(
            ChangeSet::from_show_output(&format!("commit: {SHA}\nwhen: {DATE}\n")).unwrap_err(),
            ExtractionError::MissingDateHeader(_)
        ));
        assert!(matches!(
            ChangeSet::from_show_output(&format!("commit: {SHA}\ndate: yesterday\n")).unwrap_err(),
            ExtractionError::InvalidTimestamp(_)
        ));
    }
}
