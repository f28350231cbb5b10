use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::DateTime;
#[cfg(test)]
use mockall::automock;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::migrations::{self, Migrations};
use crate::upgrade::error::HistoryError;
use crate::upgrade::types::UpgradeHistoryDetail;
use crate::version::model::HostVersion;

/// Durable backing for the upgrade history
///
/// Implementations must keep records in insertion order.
#[cfg_attr(test, automock)]
pub trait PersistentHistoryStore: Send + Sync {
    /// All records in insertion order
    fn load(&self) -> Result<Vec<UpgradeHistoryDetail>, HistoryError>;

    /// Append one record
    fn append(&self, record: &UpgradeHistoryDetail) -> Result<(), HistoryError>;
}

impl<T: PersistentHistoryStore + ?Sized> PersistentHistoryStore for Arc<T> {
    fn load(&self) -> Result<Vec<UpgradeHistoryDetail>, HistoryError> {
        (**self).load()
    }

    fn append(&self, record: &UpgradeHistoryDetail) -> Result<(), HistoryError> {
        (**self).append(record)
    }
}

/// Schema migrations
/// Each version contains a list of SQL statements to execute
const MIGRATIONS: &Migrations = &[
    // v1: run records, indexed for run-order queries
    &[
        r#"
        CREATE TABLE IF NOT EXISTS upgrade_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ran_on INTEGER NOT NULL,
            ran_on_display TEXT NOT NULL,
            build_number TEXT NOT NULL,
            plugin_version TEXT NOT NULL,
            change_set TEXT NOT NULL,
            time_taken TEXT NOT NULL,
            is_start_record INTEGER NOT NULL DEFAULT 0
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_upgrade_history_ran_on ON upgrade_history(ran_on)",
    ],
];

pub struct SqliteHistoryStore {
    conn: Mutex<Connection>,
}

impl SqliteHistoryStore {
    pub fn open(db_path: &Path) -> Result<Self, HistoryError> {
        info!("Opening upgrade history database at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    /// Non-durable store, mostly useful in tests
    pub fn open_in_memory() -> Result<Self, HistoryError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, HistoryError> {
        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;

        Ok(store)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, HistoryError> {
        self.conn.lock().map_err(|_| HistoryError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), HistoryError> {
        debug!("Creating upgrade history schema");

        let mut conn = self.lock_conn()?;
        migrations::apply(&mut conn, MIGRATIONS, "history")?;

        debug!("Upgrade history schema ready");
        Ok(())
    }
}

impl PersistentHistoryStore for SqliteHistoryStore {
    fn load(&self) -> Result<Vec<UpgradeHistoryDetail>, HistoryError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, ran_on, ran_on_display, build_number, plugin_version,
                   change_set, time_taken, is_start_record
            FROM upgrade_history
            ORDER BY id
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(RawRecord {
                    id: row.get(0)?,
                    ran_on: row.get(1)?,
                    ran_on_display: row.get(2)?,
                    build_number: row.get(3)?,
                    plugin_version: row.get(4)?,
                    change_set: row.get(5)?,
                    time_taken: row.get(6)?,
                    is_start_record: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(RawRecord::into_detail).collect()
    }

    fn append(&self, record: &UpgradeHistoryDetail) -> Result<(), HistoryError> {
        debug!(
            "Recording upgrade run on {} (plugin {})",
            record.build_number, record.plugin_version
        );

        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO upgrade_history (
                ran_on, ran_on_display, build_number, plugin_version,
                change_set, time_taken, is_start_record
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            (
                record.ran_on.timestamp_millis(),
                &record.ran_on_display,
                record.build_number.to_string(),
                &record.plugin_version,
                &record.change_set,
                &record.time_taken,
                record.is_start_record,
            ),
        )?;

        Ok(())
    }
}

/// Row as stored, before validation
struct RawRecord {
    id: i64,
    ran_on: i64,
    ran_on_display: String,
    build_number: String,
    plugin_version: String,
    change_set: String,
    time_taken: String,
    is_start_record: bool,
}

impl RawRecord {
    fn into_detail(self) -> Result<UpgradeHistoryDetail, HistoryError> {
        let id = self.id;
        let corrupt = |reason: String| HistoryError::CorruptRecord { id, reason };

        let ran_on = DateTime::from_timestamp_millis(self.ran_on)
            .ok_or_else(|| corrupt(format!("timestamp {} out of range", self.ran_on)))?;
        let build_number =
            HostVersion::parse(&self.build_number).map_err(|e| corrupt(e.to_string()))?;

        Ok(UpgradeHistoryDetail {
            ran_on,
            ran_on_display: self.ran_on_display,
            build_number,
            plugin_version: self.plugin_version,
            change_set: self.change_set,
            time_taken: self.time_taken,
            is_start_record: self.is_start_record,
        })
    }
}
