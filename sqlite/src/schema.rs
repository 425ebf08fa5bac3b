//! SQL for the `rockspecs` table.
//!
//! One row per `(host, owner, repo, filename)`. `created_at` and
//! `updated_at` hold the committer timestamp text of the commit that
//! inserted or last touched the row.

/// Name of the index table.
pub const TABLE_NAME: &str = "rockspecs";

/// Creates the `rockspecs` table.
pub(crate) const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS rockspecs (
    id INTEGER PRIMARY KEY,
    host TEXT NOT NULL,
    owner TEXT NOT NULL,
    repo TEXT NOT NULL,
    filename TEXT NOT NULL,
    name TEXT NOT NULL,
    version TEXT NOT NULL,
    commit_sha TEXT,
    file_size INTEGER,
    content BLOB,
    created_at TEXT,
    updated_at TEXT,
    UNIQUE(host, owner, repo, filename)
);
"#;

/// Inserts a row, or refreshes content and metadata of an existing one.
///
/// `created_at` is only written on first insert.
pub(crate) const UPSERT_SQL: &str = r#"
INSERT INTO rockspecs (
    host, owner, repo, filename, name, version, commit_sha, file_size, content,
    created_at, updated_at
) VALUES (
    $host, $owner, $repo, $filename, $name, $version, $commitSha, $fileSize, $content,
    $createdAt, $updatedAt
)
ON CONFLICT(host, owner, repo, filename)
DO UPDATE SET
    commit_sha = excluded.commit_sha,
    file_size = excluded.file_size,
    content = excluded.content,
    updated_at = excluded.updated_at
"#;

pub(crate) const DELETE_SQL: &str = r#"
DELETE FROM rockspecs
WHERE host = $host AND owner = $owner AND repo = $repo AND filename = $filename
"#;

pub(crate) const SELECT_BY_KEY_SQL: &str = r#"
SELECT id, host, owner, repo, filename, name, version, commit_sha, file_size, content,
       created_at, updated_at
FROM rockspecs
WHERE host = $host AND owner = $owner AND repo = $repo AND filename = $filename
"#;

pub(crate) const COUNT_SQL: &str = "SELECT COUNT(*) FROM rockspecs";
