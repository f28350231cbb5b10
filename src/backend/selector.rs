//! Cache backend selection by host version

use std::fmt;

use crate::version::model::HostVersion;

/// Interchangeable cache backend implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Delegates to the cache service provided by the host
    HostBacked,
    /// Plugin-local cache for hosts without that service
    InMemory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::HostBacked => "host-backed",
            BackendKind::InMemory => "in-memory",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `HostBacked` from `threshold` onwards, `InMemory` below it
pub fn select(current: HostVersion, threshold: HostVersion) -> BackendKind {
    if current >= threshold {
        BackendKind::HostBacked
    } else {
        BackendKind::InMemory
    }
}

/// Builds the backend instance for a selected kind
pub trait BackendFactory: Send + Sync {
    type Backend;

    fn create(&self, kind: BackendKind) -> Self::Backend;
}

impl<F, B> BackendFactory for F
where
    F: Fn(BackendKind) -> B + Send + Sync,
{
    type Backend = B;

    fn create(&self, kind: BackendKind) -> B {
        self(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BACKEND_THRESHOLD;
    use rstest::rstest;

    #[rstest]
    #[case("6.2", BackendKind::HostBacked)] // threshold itself
    #[case("6.1", BackendKind::InMemory)]
    #[case("7.0", BackendKind::HostBacked)]
    #[case("6.10", BackendKind::HostBacked)]
    #[case("5.9", BackendKind::InMemory)]
    fn select_compares_against_threshold(#[case] current: &str, #[case] expected: BackendKind) {
        let threshold = HostVersion::new(6, 2);
        assert_eq!(select(current.parse().unwrap(), threshold), expected);
    }

    #[test]
    fn default_threshold_is_six_two() {
        assert_eq!(DEFAULT_BACKEND_THRESHOLD, HostVersion::new(6, 2));
    }

    #[test]
    fn closures_act_as_factories() {
        let factory = |kind: BackendKind| format!("{kind} cache");
        assert_eq!(factory.create(BackendKind::InMemory), "in-memory cache");
    }
}
