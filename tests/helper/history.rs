//! In-memory history store

use std::sync::Mutex;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use plugin_upgrade_guard::upgrade::{
    HistoryError, PersistentHistoryStore, RunMetadata, UpgradeHistoryDetail,
};

#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<Vec<UpgradeHistoryDetail>>,
}

impl MemoryHistoryStore {
    pub fn with_records(records: Vec<UpgradeHistoryDetail>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl PersistentHistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<Vec<UpgradeHistoryDetail>, HistoryError> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn append(&self, record: &UpgradeHistoryDetail) -> Result<(), HistoryError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Record for `version` at `secs` past the epoch
pub fn record_at(secs: i64, version: &str, is_start_record: bool) -> UpgradeHistoryDetail {
    UpgradeHistoryDetail::new(
        Utc.timestamp_opt(secs, 0).unwrap(),
        version.parse().unwrap(),
        &RunMetadata {
            plugin_version: "1.0.0".to_string(),
            change_set: format!("cs-{secs}"),
        },
        Duration::from_millis(5),
        is_start_record,
    )
}
