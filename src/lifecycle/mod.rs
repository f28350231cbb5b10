//! Guarded one-shot initialisation of the fragile persistence layer
//!
//! # Modules
//!
//! - [`controller`]: `LifecycleController`, the fail-once state machine
//! - [`initializer`]: `UnderlyingInitializer` collaborator trait
//! - [`schema`]: SQLite schema migrator implementing `UnderlyingInitializer`
//! - [`error`]: lifecycle error types

pub mod controller;
pub mod error;
pub mod initializer;
pub mod schema;

pub use controller::{LifecycleController, LifecycleState};
pub use error::{BoxError, IllegalStateError, LifecycleError};
pub use initializer::UnderlyingInitializer;
pub use schema::{PluginDatabase, SchemaMigrator};
