//! Single-statement transactional execution against the index file.
//!
//! Every call to [`SqlExecutor::execute`] opens its own connection, runs
//! one statement inside its own transaction, and closes the connection
//! before returning. There is no pooling and no transaction spanning
//! several calls: each call is atomic on its own.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rockup_sync_core::to_positional;
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use tracing::{debug, warn};

use crate::error::Result;

/// Named statement arguments, keyed by placeholder name without the `$`.
pub type NamedParams = HashMap<String, Value>;

/// Builds [`NamedParams`] from `(name, value)` pairs.
///
/// # Examples
///
/// ```
/// use rockup_sync_sqlite::named_params;
/// use rusqlite::types::Value;
///
/// let params = named_params([("host", Value::from("github.com".to_string())), ("size", Value::from(3i64))]);
/// assert_eq!(params.len(), 2);
/// ```
pub fn named_params<const N: usize>(pairs: [(&str, Value); N]) -> NamedParams {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Executes `$name`-style SQL against one database file.
#[derive(Debug, Clone)]
pub struct SqlExecutor {
    path: PathBuf,
}

impl SqlExecutor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a fresh connection to the database file.
    pub fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    /// Runs one statement atomically and returns the number of changed rows.
    ///
    /// The statement's `$name` placeholders are bound from `params`. If the
    /// statement fails, the transaction is rolled back (a failing rollback
    /// is logged and otherwise ignored) and the original error is returned.
    /// The connection is closed on every path out of this function.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Validation`](crate::StorageError::Validation)
    /// for bad placeholders or missing parameters (no connection is opened),
    /// and [`StorageError::Database`](crate::StorageError::Database) for
    /// SQLite failures.
    pub fn execute(&self, sql: &str, params: &NamedParams) -> Result<usize> {
        let positional = to_positional(sql.trim(), params)?;
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        let result = tx.execute(&positional.sql, params_from_iter(positional.params));
        let changed = match result {
            Ok(changed) => changed,
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(error = %rollback_err, "rollback failed");
                }
                return Err(err.into());
            }
        };
        tx.commit()?;

        debug!(db = %self.path.display(), changed, "statement committed");
        Ok(changed)
    }
}
