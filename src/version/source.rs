//! Sources of the current host product version

#[cfg(test)]
use mockall::automock;

use tracing::debug;

use crate::version::model::HostVersion;

/// Supplies the current host version string
///
/// Implementations should return a `"<major>.<minor>"` string. Anything else
/// is rejected by [`HostVersion::detect`] with a `MalformedVersionError`.
#[cfg_attr(test, automock)]
pub trait VersionSource: Send + Sync {
    fn host_version(&self) -> String;
}

/// A version string known up front (command line, tests)
#[derive(Debug, Clone)]
pub struct StaticVersionSource {
    version: String,
}

impl StaticVersionSource {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

impl VersionSource for StaticVersionSource {
    fn host_version(&self) -> String {
        self.version.clone()
    }
}

/// Reports the `major.minor` part of a full build-info version like "6.2.1"
///
/// Versions that are not valid `major.minor.patch` are passed through
/// unchanged so the caller sees the original text in the parse error.
#[derive(Debug, Clone)]
pub struct BuildInfoVersionSource {
    build_version: String,
}

impl BuildInfoVersionSource {
    pub fn new(build_version: impl Into<String>) -> Self {
        Self {
            build_version: build_version.into(),
        }
    }
}

impl VersionSource for BuildInfoVersionSource {
    fn host_version(&self) -> String {
        match HostVersion::from_build_version(&self.build_version) {
            Ok(version) => version.to_string(),
            Err(e) => {
                debug!("Build version is not major.minor.patch: {}", e);
                self.build_version.clone()
            }
        }
    }
}
