//! Rockspec path classification and filename convention.
//!
//! Rockspecs live at `rockspecs/<host>/<owner>/<repo>/<name>-<version>-<revision>.rockspec`.
//! [`RockspecPath::parse`] is a total function: malformed input yields
//! `None`, never an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, ValidationError};

/// Directory prefix every rockspec path starts with.
pub const ROCKSPEC_PREFIX: &str = "rockspecs/";
/// File extension every rockspec path ends with.
pub const ROCKSPEC_SUFFIX: &str = ".rockspec";

/// A repository-relative rockspec path split into its index key fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RockspecPath {
    /// The path exactly as given.
    pub path: String,
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub filename: String,
}

/// Natural key of one row in the `rockspecs` table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RockspecKey {
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub filename: String,
}

impl RockspecPath {
    /// Classifies `path`, returning `None` unless it is a well-formed rockspec path.
    ///
    /// # Examples
    ///
    /// ```
    /// use rockup_sync_core::RockspecPath;
    ///
    /// let parsed = RockspecPath::parse("rockspecs/github.com/foo/bar/pkg-1.0.0-1.rockspec").unwrap();
    /// assert_eq!(parsed.host, "github.com");
    /// assert_eq!(parsed.filename, "pkg-1.0.0-1.rockspec");
    ///
    /// assert!(RockspecPath::parse("rockspecs/a/b/c.rockspec").is_none());
    /// assert!(RockspecPath::parse("").is_none());
    /// ```
    pub fn parse(path: &str) -> Option<Self> {
        if !path.starts_with(ROCKSPEC_PREFIX) || !path.ends_with(ROCKSPEC_SUFFIX) {
            return None;
        }

        // Runs of `/` count as one separator; exactly five segments are accepted.
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let [_, host, owner, repo, filename] = segments.as_slice() else {
            return None;
        };

        Some(Self {
            path: path.to_string(),
            host: host.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            filename: filename.to_string(),
        })
    }

    /// Like [`parse`](Self::parse), but rejects malformed paths with an error.
    pub fn require(path: &str) -> Result<Self> {
        Self::parse(path).ok_or_else(|| ValidationError::InvalidRockspecPath(path.to_string()))
    }

    /// Returns the `(host, owner, repo, filename)` key.
    pub fn key(&self) -> RockspecKey {
        RockspecKey {
            host: self.host.clone(),
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            filename: self.filename.clone(),
        }
    }
}

/// Package name and version derived from a rockspec filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RockspecName {
    pub name: String,
    /// Version including the revision suffix, e.g. `1.0.0-1`.
    pub version: String,
}

impl RockspecName {
    /// Splits `<name>-<version>-<revision>.rockspec` into name and version.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRockspecFilename`] for filenames
    /// that do not follow the convention.
    pub fn from_filename(filename: &str) -> Result<Self> {
        static FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^(.+)-([^-]+-\d+)\.rockspec$").expect("static regex must compile")
        });

        let caps = FILENAME_RE
            .captures(filename)
            .ok_or_else(|| ValidationError::InvalidRockspecFilename(filename.to_string()))?;
        Ok(Self {
            name: caps[1].to_string(),
            version: caps[2].to_string(),
        })
    }
}
