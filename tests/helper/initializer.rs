//! Initializer test double that counts invocations

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use plugin_upgrade_guard::lifecycle::{BoxError, UnderlyingInitializer};

/// Sleeps for `delay`, then succeeds with the call number or fails with `error`
pub struct CountingInitializer {
    calls: AtomicUsize,
    delay: Duration,
    error: Option<String>,
}

impl CountingInitializer {
    pub fn succeeding(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
            error: None,
        }
    }

    pub fn failing(message: &str, delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay,
            error: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UnderlyingInitializer for CountingInitializer {
    type Handle = usize;

    fn initialise(&self) -> Result<usize, BoxError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        thread::sleep(self.delay);

        match &self.error {
            Some(message) => Err(message.clone().into()),
            None => Ok(call),
        }
    }
}
