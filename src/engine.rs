//! Composition root
//!
//! Wires version detection, backend selection and the lifecycle guard
//! together from explicit collaborators.

use tracing::info;

use crate::backend::selector::{self, BackendFactory, BackendKind};
use crate::config::EngineConfig;
use crate::lifecycle::controller::LifecycleController;
use crate::lifecycle::error::{IllegalStateError, LifecycleError};
use crate::lifecycle::initializer::UnderlyingInitializer;
use crate::upgrade::store::PersistentHistoryStore;
use crate::version::error::MalformedVersionError;
use crate::version::model::HostVersion;
use crate::version::source::VersionSource;

pub struct PluginEngine<I, P, B>
where
    I: UnderlyingInitializer,
    P: PersistentHistoryStore,
{
    host_version: HostVersion,
    backend_kind: BackendKind,
    backend: B,
    lifecycle: LifecycleController<I, P>,
}

impl<I, P, B> PluginEngine<I, P, B>
where
    I: UnderlyingInitializer,
    P: PersistentHistoryStore,
{
    /// Detect the host version, build the backend and prepare the lifecycle guard
    ///
    /// Does not initialise the persistence layer; call [`Self::initialise`].
    pub fn start<F>(
        config: &EngineConfig,
        source: &dyn VersionSource,
        initializer: I,
        history: P,
        factory: &F,
    ) -> Result<Self, MalformedVersionError>
    where
        F: BackendFactory<Backend = B>,
    {
        let host_version = HostVersion::detect(source)?;
        let backend_kind = selector::select(host_version, config.backend_threshold);
        info!(
            "Host version {} (threshold {}): using {} cache backend",
            host_version, config.backend_threshold, backend_kind
        );

        Ok(Self {
            host_version,
            backend_kind,
            backend: factory.create(backend_kind),
            lifecycle: LifecycleController::new(
                host_version,
                config.run_metadata(),
                initializer,
                history,
            ),
        })
    }

    pub fn host_version(&self) -> HostVersion {
        self.host_version
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend_kind
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn lifecycle(&self) -> &LifecycleController<I, P> {
        &self.lifecycle
    }

    pub fn initialise(&self) -> Result<(), LifecycleError> {
        self.lifecycle.initialise()
    }

    pub fn handle(&self) -> Result<I::Handle, IllegalStateError> {
        self.lifecycle.handle()
    }
}
