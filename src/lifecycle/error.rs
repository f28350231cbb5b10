use thiserror::Error;

use crate::upgrade::error::{DowngradeDetectedError, HistoryError};

/// Opaque failure from an underlying initializer
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Downgrade(#[from] DowngradeDetectedError),

    #[error("Initialisation failed: {source}")]
    InitialisationFailed {
        #[source]
        source: BoxError,
    },

    #[error("Initialisation previously failed and will not be retried: {cause}")]
    PreviouslyFailed { cause: String },
}

impl LifecycleError {
    pub fn initialisation(source: impl Into<BoxError>) -> Self {
        Self::InitialisationFailed {
            source: source.into(),
        }
    }
}

impl From<HistoryError> for LifecycleError {
    fn from(e: HistoryError) -> Self {
        Self::initialisation(e)
    }
}

/// The handle was requested before a successful initialisation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Handle not available: lifecycle is {state}")]
pub struct IllegalStateError {
    pub state: &'static str,
}
