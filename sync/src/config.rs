//! Run configuration.
//!
//! Every field has a default, so a partial file (or none at all) is valid.
//!
//! # Example YAML
//!
//! ```yaml
//! database: rocks.db
//! lua_versions: ["5.1", "5.2", "5.3", "5.4"]
//! publish:
//!   paths: [rocks.db, index.html, "manifest*"]
//!   commit_message: "chore(rockup): sync rocks.db"
//!   remote: origin
//!   refspec: HEAD
//! tools:
//!   git: git
//!   luarocks: luarocks
//!   luarocks_admin: luarocks-admin
//!   zip: zip
//!   timeout_secs: 600
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rockup_sync_tools::ProcessRunner;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// What gets staged, committed, and pushed after a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Git pathspecs passed to `git add`.
    pub paths: Vec<String>,
    pub commit_message: String,
    pub remote: String,
    pub refspec: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            paths: vec!["rocks.db".into(), "index.html".into(), "manifest*".into()],
            commit_message: "chore(rockup): sync rocks.db".into(),
            remote: "origin".into(),
            refspec: "HEAD".into(),
        }
    }
}

/// External program names and the per-command timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub git: String,
    pub luarocks: String,
    pub luarocks_admin: String,
    pub zip: String,
    /// Seconds before a running command is killed; 0 waits forever.
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: "git".into(),
            luarocks: "luarocks".into(),
            luarocks_admin: "luarocks-admin".into(),
            zip: "zip".into(),
            timeout_secs: 600,
        }
    }
}

impl ToolsConfig {
    /// A process runner honoring [`timeout_secs`](Self::timeout_secs).
    pub fn runner(&self) -> ProcessRunner {
        match self.timeout_secs {
            0 => ProcessRunner::new(),
            secs => ProcessRunner::with_timeout(Duration::from_secs(secs)),
        }
    }
}

/// Top-level sync configuration.
///
/// # Examples
///
/// ```
/// use rockup_sync::SyncConfig;
///
/// let config: SyncConfig = serde_yaml::from_str("lua_versions: [\"5.4\"]").unwrap();
/// assert_eq!(config.lua_versions, vec!["5.4"]);
/// assert_eq!(config.publish.remote, "origin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Index file, resolved against the working tree when relative.
    pub database: PathBuf,
    /// Lua versions whose `manifest-<version>` files are archived.
    pub lua_versions: Vec<String>,
    pub publish: PublishConfig,
    pub tools: ToolsConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("rocks.db"),
            lua_versions: ["5.1", "5.2", "5.3", "5.4"].map(String::from).to_vec(),
            publish: PublishConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ConfigIo`] if the file cannot be opened, or
    /// [`SyncError::Config`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| SyncError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|source| SyncError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Location of the index file for a working tree rooted at `workdir`.
    pub fn database_path(&self, workdir: &Path) -> PathBuf {
        workdir.join(&self.database)
    }
}
