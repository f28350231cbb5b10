//! Host product version handling
//!
//! # Modules
//!
//! - [`model`]: `HostVersion`, the `(major, minor)` value type with parsing and ordering
//! - [`source`]: `VersionSource` collaborator trait and its stock implementations
//! - [`error`]: `MalformedVersionError`

pub mod error;
pub mod model;
pub mod source;

pub use error::MalformedVersionError;
pub use model::HostVersion;
pub use source::{BuildInfoVersionSource, StaticVersionSource, VersionSource};
