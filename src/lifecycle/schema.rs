//! SQLite schema migration as an underlying initializer
//!
//! Migrations are one-way. A data file written by a newer plugin build has a
//! `user_version` beyond the migrations known here and is refused rather than
//! opened.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use thiserror::Error;
use tracing::info;

use crate::lifecycle::error::BoxError;
use crate::lifecycle::initializer::UnderlyingInitializer;
use crate::migrations::{self, Migrations};

/// Plugin data schema
/// Each version contains a list of SQL statements to execute
const MIGRATIONS: &Migrations = &[
    // v1: plugin settings
    &[r#"
    CREATE TABLE IF NOT EXISTS plugin_settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#],
    // v2: cache entries for the in-memory backend fallback
    &[
        r#"
        CREATE TABLE IF NOT EXISTS cache_entries (
            name TEXT NOT NULL,
            key TEXT NOT NULL,
            value BLOB NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (name, key)
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_cache_entries_updated_at ON cache_entries(updated_at)",
    ],
];

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to acquire database lock")]
    LockPoisoned,

    #[error("Schema version {found} is newer than the latest known version {supported}")]
    NewerSchema { found: i32, supported: i32 },
}

/// Migrated plugin database
#[derive(Debug)]
pub struct PluginDatabase {
    conn: Mutex<Connection>,
    schema_version: i32,
}

impl PluginDatabase {
    pub fn schema_version(&self) -> i32 {
        self.schema_version
    }

    pub fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, SchemaError> {
        self.conn.lock().map_err(|_| SchemaError::LockPoisoned)
    }
}

pub struct SchemaMigrator {
    db_path: PathBuf,
}

impl SchemaMigrator {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn latest_version() -> i32 {
        migrations::latest_version(MIGRATIONS)
    }

    fn migrate(path: &Path) -> Result<PluginDatabase, SchemaError> {
        info!("Migrating plugin database at {:?}", path);

        let mut conn = Connection::open(path)?;

        // Refuse before anything is written to a file owned by a newer build
        let found = migrations::schema_version(&conn)?;
        let target_version = Self::latest_version();
        if found > target_version {
            return Err(SchemaError::NewerSchema {
                found,
                supported: target_version,
            });
        }

        conn.pragma_update(None, "journal_mode", "WAL")?;
        let current_version = migrations::apply(&mut conn, MIGRATIONS, "data")?;

        info!(
            "Plugin database at schema v{} (was v{})",
            target_version, current_version
        );

        Ok(PluginDatabase {
            conn: Mutex::new(conn),
            schema_version: target_version,
        })
    }
}

impl UnderlyingInitializer for SchemaMigrator {
    type Handle = Arc<PluginDatabase>;

    fn initialise(&self) -> Result<Self::Handle, BoxError> {
        Ok(Arc::new(Self::migrate(&self.db_path)?))
    }
}
