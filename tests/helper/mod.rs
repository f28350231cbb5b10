//! Shared test doubles

#![allow(dead_code)]

pub mod history;
pub mod initializer;

pub use history::{MemoryHistoryStore, record_at};
pub use initializer::CountingInitializer;
