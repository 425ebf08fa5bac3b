//! The `rocks.db` rockspec index.
//!
//! [`RockspecIndex`] wraps a [`SqlExecutor`] with the index's writes
//! (upsert and delete by natural key) and a few read helpers. Each write
//! is its own transaction; nothing spans several rockspecs.

use std::path::{Path, PathBuf};

use rockup_sync_core::{RockspecKey, RockspecRecord, RockspecUpsert};
use rusqlite::OptionalExtension;
use rusqlite::types::Value;
use tracing::info;

use crate::error::Result;
use crate::executor::{NamedParams, SqlExecutor, named_params};
use crate::schema::{COUNT_SQL, CREATE_TABLE_SQL, DELETE_SQL, SELECT_BY_KEY_SQL, UPSERT_SQL};

/// Read/write access to the rockspec index file.
#[derive(Debug, Clone)]
pub struct RockspecIndex {
    executor: SqlExecutor,
}

impl RockspecIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            executor: SqlExecutor::new(path),
        }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        self.executor.path()
    }

    /// Creates the database file and table if the file does not exist yet.
    ///
    /// Returns `true` when the file was created by this call. An existing
    /// file is left untouched.
    pub fn ensure_created(&self) -> Result<bool> {
        if self.path().exists() {
            return Ok(false);
        }

        info!(db = %self.path().display(), "Creating rocks.db database...");
        let mut conn = self.executor.connect()?;
        let tx = conn.transaction()?;
        tx.execute_batch(CREATE_TABLE_SQL)?;
        tx.commit()?;
        info!("Successfully created rocks.db database");
        Ok(true)
    }

    /// Inserts `upsert`, or updates the row with the same natural key.
    ///
    /// On conflict only `commit_sha`, `file_size`, `content`, and
    /// `updated_at` change; `created_at` keeps its first value.
    pub fn upsert(&self, upsert: &RockspecUpsert) -> Result<()> {
        let mut params = key_params(&upsert.key);
        params.extend(named_params([
            ("name", Value::from(upsert.name.clone())),
            ("version", Value::from(upsert.version.clone())),
            ("commitSha", Value::from(upsert.commit_sha.clone())),
            ("fileSize", Value::from(upsert.file_size())),
            ("content", Value::from(upsert.content.clone())),
            ("createdAt", Value::from(upsert.committed_at.clone())),
            ("updatedAt", Value::from(upsert.committed_at.clone())),
        ]));
        self.executor.execute(UPSERT_SQL, &params)?;
        Ok(())
    }

    /// Deletes the row with `key`. Returns the number of rows removed,
    /// which is zero when no such row exists.
    pub fn delete(&self, key: &RockspecKey) -> Result<usize> {
        self.executor.execute(DELETE_SQL, &key_params(key))
    }

    /// Loads the row with `key`, if present.
    pub fn get(&self, key: &RockspecKey) -> Result<Option<RockspecRecord>> {
        let params = key_params(key);
        let positional = rockup_sync_core::to_positional(SELECT_BY_KEY_SQL.trim(), &params)?;
        let conn = self.executor.connect()?;
        let record = conn
            .query_row(
                &positional.sql,
                rusqlite::params_from_iter(positional.params),
                |row| {
                    Ok(RockspecRecord {
                        id: row.get(0)?,
                        key: RockspecKey {
                            host: row.get(1)?,
                            owner: row.get(2)?,
                            repo: row.get(3)?,
                            filename: row.get(4)?,
                        },
                        name: row.get(5)?,
                        version: row.get(6)?,
                        commit_sha: row.get(7)?,
                        file_size: row.get(8)?,
                        content: row.get(9)?,
                        created_at: row.get(10)?,
                        updated_at: row.get(11)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Number of rows in the index.
    pub fn count(&self) -> Result<usize> {
        let conn = self.executor.connect()?;
        let count: i64 = conn.query_row(COUNT_SQL, [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn key_params(key: &RockspecKey) -> NamedParams {
    named_params([
        ("host", Value::from(key.host.clone())),
        ("owner", Value::from(key.owner.clone())),
        ("repo", Value::from(key.repo.clone())),
        ("filename", Value::from(key.filename.clone())),
    ])
}
