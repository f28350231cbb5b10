//! Upgrade and version lifecycle helpers for plugins hosted in a larger product
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐     ┌───────────────┐     ┌───────────────┐
//! │ VersionSource │────▶│  HostVersion  │────▶│    Backend    │
//! │ (host string) │     │ (major.minor) │     │   selector    │
//! └───────────────┘     └───────┬───────┘     └───────────────┘
//!                               │
//!                               ▼
//! ┌───────────────┐     ┌───────────────┐     ┌───────────────┐
//! │    History    │────▶│   Downgrade   │────▶│   Lifecycle   │
//! │    (SQLite)   │◀────│   detector    │     │  controller   │
//! └───────────────┘     └───────────────┘     └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`version`]: host version model and version sources
//! - [`upgrade`]: upgrade history records, storage and downgrade detection
//! - [`lifecycle`]: fail-once initialisation guard and the schema migrator
//! - [`backend`]: cache backend selection by host version
//! - [`engine`]: composition root wiring the pieces together
//! - [`config`]: configuration and data paths
//! - [`migrations`]: `user_version`-tracked SQLite schema steps
//! - [`logging`]: tracing subscriber setup

pub mod backend;
pub mod config;
pub mod engine;
pub mod lifecycle;
pub mod logging;
pub mod migrations;
pub mod upgrade;
pub mod version;
