use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::lifecycle::error::BoxError;

/// Performs the one-shot fragile initialisation (e.g. a schema migration)
///
/// Called at most once per controller. A failure may leave external state
/// half-migrated, so callers never retry it.
#[cfg_attr(test, automock(type Handle = u32;))]
pub trait UnderlyingInitializer: Send + Sync {
    type Handle: Clone + Send + Sync + 'static;

    fn initialise(&self) -> Result<Self::Handle, BoxError>;
}

impl<T: UnderlyingInitializer + ?Sized> UnderlyingInitializer for Arc<T> {
    type Handle = T::Handle;

    fn initialise(&self) -> Result<Self::Handle, BoxError> {
        (**self).initialise()
    }
}
