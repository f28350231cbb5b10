//! Ordered view over the persisted upgrade history
//!
//! Run order is ascending `ran_on`. When two records share a timestamp the
//! start record sorts first, since it is the baseline rather than a real
//! upgrade. Remaining ties keep insertion order.

use std::cmp::Ordering;

use tracing::debug;

use crate::upgrade::error::HistoryError;
use crate::upgrade::store::PersistentHistoryStore;
use crate::upgrade::types::{PluginRunInfo, UpgradeHistoryDetail};
use crate::version::model::HostVersion;

pub struct UpgradeHistoryStore<P: PersistentHistoryStore> {
    backing: P,
}

impl<P: PersistentHistoryStore> UpgradeHistoryStore<P> {
    pub fn new(backing: P) -> Self {
        Self { backing }
    }

    /// Add a record to the end of the history
    pub fn append(&self, record: UpgradeHistoryDetail) -> Result<(), HistoryError> {
        self.backing.append(&record)
    }

    /// All records in run order
    pub fn records(&self) -> Result<Vec<UpgradeHistoryDetail>, HistoryError> {
        let mut records = self.backing.load()?;
        sort_run_order(&mut records);
        Ok(records)
    }

    /// Most recent record, if any
    pub fn latest(&self) -> Result<Option<UpgradeHistoryDetail>, HistoryError> {
        Ok(self.records()?.pop())
    }

    /// The record run immediately before `record`
    ///
    /// `None` when `record` is the first run or is not in the history.
    pub fn previous_before(
        &self,
        record: &UpgradeHistoryDetail,
    ) -> Result<Option<UpgradeHistoryDetail>, HistoryError> {
        let mut records = self.records()?;
        let Some(index) = records.iter().position(|r| r == record) else {
            return Ok(None);
        };

        if index == 0 {
            return Ok(None);
        }
        Ok(Some(records.swap_remove(index - 1)))
    }

    /// Pair the current host version with the one recorded by the last run
    pub fn run_info(&self, current_version: HostVersion) -> Result<PluginRunInfo, HistoryError> {
        let previous_version = self.latest()?.map(|r| r.build_number);
        debug!(
            "Run info: current {}, previous {:?}",
            current_version, previous_version
        );

        Ok(PluginRunInfo {
            current_version,
            previous_version,
        })
    }

    /// What the most recent run moved from and to, based on the last two records
    pub fn last_transition(&self) -> Result<Option<PluginRunInfo>, HistoryError> {
        let Some(latest) = self.latest()? else {
            return Ok(None);
        };
        let previous = self.previous_before(&latest)?;

        Ok(Some(PluginRunInfo {
            current_version: latest.build_number,
            previous_version: previous.map(|r| r.build_number),
        }))
    }
}

/// Stable sort into run order
pub fn sort_run_order(records: &mut [UpgradeHistoryDetail]) {
    records.sort_by(compare_run_order);
}

fn compare_run_order(a: &UpgradeHistoryDetail, b: &UpgradeHistoryDetail) -> Ordering {
    a.ran_on
        .cmp(&b.ran_on)
        // true sorts before false
        .then_with(|| b.is_start_record.cmp(&a.is_start_record))
}
