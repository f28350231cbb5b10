//! Cache backend bridge
//!
//! Only decides which backend the host supports. Construction is left to a
//! [`BackendFactory`](selector::BackendFactory) supplied by the embedding plugin.

pub mod selector;

pub use selector::{BackendFactory, BackendKind, select};
