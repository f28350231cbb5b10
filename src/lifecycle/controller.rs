//! Fail-once initialisation guard
//!
//! ```text
//!                  ┌───────────────┐
//!        ┌────────▶│  Initialized  │ (handle cached, initialise() is a no-op)
//!        │ ok      └───────────────┘
//! ┌──────┴────────┐
//! │ Uninitialized │
//! └──────┬────────┘
//!        │ downgrade / initializer error / history error / panic
//!        │         ┌───────────────┐
//!        └────────▶│    Failed     │ (sticky until the process restarts)
//!                  └───────────────┘
//! ```

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::lifecycle::error::{IllegalStateError, LifecycleError};
use crate::lifecycle::initializer::UnderlyingInitializer;
use crate::upgrade::downgrade;
use crate::upgrade::history::UpgradeHistoryStore;
use crate::upgrade::store::PersistentHistoryStore;
use crate::upgrade::types::{RunMetadata, UpgradeHistoryDetail};
use crate::version::model::HostVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState<H> {
    Uninitialized,
    Initialized(H),
    /// Display form of the error that sealed the lifecycle
    Failed(String),
}

impl<H> LifecycleState<H> {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Initialized(_) => "initialized",
            LifecycleState::Failed(_) => "failed",
        }
    }
}

pub struct LifecycleController<I: UnderlyingInitializer, P: PersistentHistoryStore> {
    current_version: HostVersion,
    metadata: RunMetadata,
    initializer: I,
    history: UpgradeHistoryStore<P>,
    state: Mutex<LifecycleState<I::Handle>>,
}

impl<I: UnderlyingInitializer, P: PersistentHistoryStore> LifecycleController<I, P> {
    pub fn new(
        current_version: HostVersion,
        metadata: RunMetadata,
        initializer: I,
        history: P,
    ) -> Self {
        Self {
            current_version,
            metadata,
            initializer,
            history: UpgradeHistoryStore::new(history),
            state: Mutex::new(LifecycleState::Uninitialized),
        }
    }

    pub fn current_version(&self) -> HostVersion {
        self.current_version
    }

    pub fn history(&self) -> &UpgradeHistoryStore<P> {
        &self.history
    }

    /// Run the underlying initialisation once
    ///
    /// Concurrent callers block on the state lock while the first caller
    /// initialises, then observe its outcome. After a failure every call
    /// returns [`LifecycleError::PreviouslyFailed`] without touching the
    /// initializer again.
    pub fn initialise(&self) -> Result<(), LifecycleError> {
        let mut state = self.lock_state();

        match &*state {
            LifecycleState::Initialized(_) => {
                debug!("Already initialised, skipping");
                return Ok(());
            }
            LifecycleState::Failed(cause) => {
                warn!("Refusing to re-run failed initialisation: {}", cause);
                return Err(LifecycleError::PreviouslyFailed {
                    cause: cause.clone(),
                });
            }
            LifecycleState::Uninitialized => {}
        }

        info!("Initialising on host version {}", self.current_version);

        match self.run_initialisation() {
            Ok(handle) => {
                *state = LifecycleState::Initialized(handle);
                info!("Initialisation complete");
                Ok(())
            }
            Err(e) => {
                error!("Initialisation failed, lifecycle sealed: {}", e);
                *state = LifecycleState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    fn run_initialisation(&self) -> Result<I::Handle, LifecycleError> {
        let started = Instant::now();

        let run_info = self.history.run_info(self.current_version)?;
        downgrade::check(&run_info)?;

        let handle = self
            .initializer
            .initialise()
            .map_err(|source| LifecycleError::InitialisationFailed { source })?;

        let record = UpgradeHistoryDetail::new(
            Utc::now(),
            self.current_version,
            &self.metadata,
            started.elapsed(),
            run_info.previous_version.is_none(),
        );
        self.history.append(record)?;

        Ok(handle)
    }

    pub fn is_initialised(&self) -> bool {
        matches!(*self.lock_state(), LifecycleState::Initialized(_))
    }

    /// The handle produced by the underlying initializer
    pub fn handle(&self) -> Result<I::Handle, IllegalStateError> {
        match &*self.lock_state() {
            LifecycleState::Initialized(handle) => Ok(handle.clone()),
            other => Err(IllegalStateError {
                state: other.name(),
            }),
        }
    }

    pub fn state_name(&self) -> &'static str {
        self.lock_state().name()
    }

    /// Acquire the state lock
    ///
    /// A poisoned lock means the initializer panicked part way through; the
    /// external side effects are unknown, so an unsettled state is sealed as
    /// failed.
    fn lock_state(&self) -> MutexGuard<'_, LifecycleState<I::Handle>> {
        self.state.lock().unwrap_or_else(|poisoned| {
            let mut guard = poisoned.into_inner();
            if matches!(*guard, LifecycleState::Uninitialized) {
                error!("Initialisation panicked, lifecycle sealed");
                *guard = LifecycleState::Failed("initialisation panicked".to_string());
            }
            self.state.clear_poison();
            guard
        })
    }
}
