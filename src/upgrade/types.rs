//! Upgrade history records and derived run information

use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

use crate::version::model::HostVersion;

/// Format used for `ran_on_display`
pub const RAN_ON_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Plugin build details copied into every history record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunMetadata {
    pub plugin_version: String,
    pub change_set: String,
}

/// One completed upgrade run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeHistoryDetail {
    /// When the run finished, truncated to milliseconds
    pub ran_on: DateTime<Utc>,
    pub ran_on_display: String,
    /// Host version the run happened on
    pub build_number: HostVersion,
    pub plugin_version: String,
    pub change_set: String,
    pub time_taken: String,
    /// Baseline record written on a fresh install
    pub is_start_record: bool,
}

impl UpgradeHistoryDetail {
    pub fn new(
        ran_on: DateTime<Utc>,
        build_number: HostVersion,
        metadata: &RunMetadata,
        time_taken: Duration,
        is_start_record: bool,
    ) -> Self {
        // Stored as epoch millis; truncate so a reloaded record compares equal
        let ran_on = ran_on.trunc_subsecs(3);
        Self {
            ran_on,
            ran_on_display: ran_on.format(RAN_ON_DISPLAY_FORMAT).to_string(),
            build_number,
            plugin_version: metadata.plugin_version.clone(),
            change_set: metadata.change_set.clone(),
            time_taken: format_time_taken(time_taken),
            is_start_record,
        }
    }
}

/// Current host version against the one recorded by the previous run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginRunInfo {
    pub current_version: HostVersion,
    /// `None` when nothing has been recorded yet
    pub previous_version: Option<HostVersion>,
}

impl PluginRunInfo {
    pub fn first_run(current_version: HostVersion) -> Self {
        Self {
            current_version,
            previous_version: None,
        }
    }
}

fn format_time_taken(elapsed: Duration) -> String {
    format!("{} ms", elapsed.as_millis())
}
