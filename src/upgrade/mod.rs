//! Upgrade run history and downgrade detection
//!
//! # Modules
//!
//! - [`types`]: `UpgradeHistoryDetail`, `PluginRunInfo` and run metadata
//! - [`store`]: `PersistentHistoryStore` trait and the SQLite implementation
//! - [`history`]: run-ordered view used to find the latest and previous runs
//! - [`downgrade`]: compares the current host version with the last recorded one
//! - [`error`]: error types for history and downgrade checks

pub mod downgrade;
pub mod error;
pub mod history;
pub mod store;
pub mod types;

pub use error::{DowngradeDetectedError, HistoryError};
pub use history::UpgradeHistoryStore;
pub use store::{PersistentHistoryStore, SqliteHistoryStore};
pub use types::{PluginRunInfo, RunMetadata, UpgradeHistoryDetail};
