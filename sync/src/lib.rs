//! Mirror rockspec changes from the `HEAD` commit into `rocks.db`.
//!
//! # Architecture
//!
//! - **`config`** - [`SyncConfig`], YAML-loadable paths, tool names, and
//!   publish settings
//! - **`reconcile`** - [`Reconciler`], deletions then upserts, one
//!   transaction per rockspec
//! - **`manifest`** - [`ManifestBuilder`], `luarocks-admin make_manifest`
//!   plus per-Lua-version zip archives
//! - **`publish`** - [`Publisher`], `git add`/`commit`/`push` of the
//!   regenerated artifacts
//! - **`driver`** - [`Syncer`], the dry-run and commit flows
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//! use rockup_sync::{RunMode, SyncConfig, SyncOutcome, Syncer};
//!
//! let config = SyncConfig::default();
//! let runner = config.tools.runner();
//! let syncer = Syncer::new(&runner, &config, Path::new("."));
//! match syncer.run(RunMode::DryRun, &mut std::io::stdout()).unwrap() {
//!     SyncOutcome::NoChanges => println!("nothing to do"),
//!     SyncOutcome::DryRun(changes) => println!("{} pending changes", changes.len()),
//!     SyncOutcome::Applied(report) => println!("{report:?}"),
//! }
//! ```

mod config;
mod driver;
mod error;
mod manifest;
mod publish;
mod reconcile;

pub use config::{PublishConfig, SyncConfig, ToolsConfig};
pub use driver::{RunMode, SyncOutcome, Syncer};
pub use error::{Context, Result, SyncError};
pub use manifest::ManifestBuilder;
pub use publish::{PublishOutcome, Publisher};
pub use reconcile::{ApplyReport, Reconciler};
