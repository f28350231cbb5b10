use thiserror::Error;

use crate::version::model::HostVersion;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to acquire history store lock")]
    LockPoisoned,

    #[error("Corrupt history record {id}: {reason}")]
    CorruptRecord { id: i64, reason: String },
}

/// The host was rolled back below the version recorded by the last run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Downgrade detected: host version {current} is older than previously recorded {previous}")]
pub struct DowngradeDetectedError {
    pub current: HostVersion,
    pub previous: HostVersion,
}
