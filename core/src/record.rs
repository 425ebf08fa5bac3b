//! Index rows and the data needed to write them.

use crate::error::Result;
use crate::path::{RockspecKey, RockspecName, RockspecPath};

/// One row of the `rockspecs` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RockspecRecord {
    pub id: i64,
    pub key: RockspecKey,
    pub name: String,
    /// Version including the revision suffix.
    pub version: String,
    pub commit_sha: Option<String>,
    pub file_size: Option<i64>,
    pub content: Option<Vec<u8>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Everything needed to upsert one rockspec into the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RockspecUpsert {
    pub key: RockspecKey,
    pub name: String,
    pub version: String,
    pub commit_sha: String,
    pub content: Vec<u8>,
    /// Used as `created_at` on first insert and as `updated_at` always.
    pub committed_at: String,
}

impl RockspecUpsert {
    /// Builds an upsert for `path`, deriving name and version from its filename.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRockspecFilename`](crate::ValidationError::InvalidRockspecFilename)
    /// when the filename does not follow the naming convention.
    pub fn new(
        path: &RockspecPath,
        content: Vec<u8>,
        commit_sha: impl Into<String>,
        committed_at: impl Into<String>,
    ) -> Result<Self> {
        let RockspecName { name, version } = RockspecName::from_filename(&path.filename)?;
        Ok(Self {
            key: path.key(),
            name,
            version,
            commit_sha: commit_sha.into(),
            content,
            committed_at: committed_at.into(),
        })
    }

    /// Byte length of the content.
    pub fn file_size(&self) -> i64 {
        self.content.len() as i64
    }
}
