//! SQLite storage for the `rocks.db` rockspec index.
//!
//! # Architecture
//!
//! - **`schema`** - the `rockspecs` table and the statements run against it
//! - **`executor`** - [`SqlExecutor`], one connection and one transaction
//!   per statement, with `$name` placeholders translated to positional ones
//! - **`index`** - [`RockspecIndex`], upsert/delete by natural key plus
//!   read helpers
//!
//! # Quick start
//!
//! ```no_run
//! use rockup_sync_core::{RockspecPath, RockspecUpsert};
//! use rockup_sync_sqlite::RockspecIndex;
//!
//! let index = RockspecIndex::new("rocks.db");
//! index.ensure_created().unwrap();
//!
//! let path = RockspecPath::require("rockspecs/github.com/foo/bar/pkg-1.0-1.rockspec").unwrap();
//! let upsert = RockspecUpsert::new(&path, b"package = 'pkg'".to_vec(), "abc123", "2025-01-01T00:00:00+00:00").unwrap();
//! index.upsert(&upsert).unwrap();
//! assert_eq!(index.count().unwrap(), 1);
//! ```

mod error;
mod executor;
mod index;
mod schema;

pub use error::{Result, StorageError};
pub use executor::{NamedParams, SqlExecutor, named_params};
pub use index::RockspecIndex;
pub use schema::TABLE_NAME;
