//! Host product version model
//!
//! Host versions are compared on `major.minor` only. Patch levels, pre-release
//! tags and build metadata are not part of the model; build versions that
//! carry them are truncated by [`HostVersion::from_build_version`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::version::error::MalformedVersionError;
use crate::version::source::VersionSource;

/// `<major>.<minor>`, ASCII digits only
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.([0-9]+)$").expect("valid version pattern"));

/// Immutable `(major, minor)` version of the host product
///
/// Ordering is lexicographic on `(major, minor)`, which is what the derived
/// `Ord` gives for this field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostVersion {
    major: u32,
    minor: u32,
}

impl HostVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Parse a `"<major>.<minor>"` string
    ///
    /// Signs, whitespace, extra components and values that do not fit in a
    /// `u32` are rejected.
    pub fn parse(text: &str) -> Result<Self, MalformedVersionError> {
        let caps = VERSION_RE
            .captures(text)
            .ok_or_else(|| MalformedVersionError::new(text))?;

        let component = |i: usize| -> Result<u32, MalformedVersionError> {
            caps[i]
                .parse::<u32>()
                .map_err(|_| MalformedVersionError::new(text))
        };

        Ok(Self::new(component(1)?, component(2)?))
    }

    /// Parse a full `major.minor.patch` build version and keep `major.minor`
    ///
    /// Build-info providers usually report the full product version
    /// (e.g. "6.2.1"); only the first two components matter here.
    pub fn from_build_version(text: &str) -> Result<Self, MalformedVersionError> {
        let version =
            semver::Version::parse(text.trim()).map_err(|_| MalformedVersionError::new(text))?;

        let major = u32::try_from(version.major).map_err(|_| MalformedVersionError::new(text))?;
        let minor = u32::try_from(version.minor).map_err(|_| MalformedVersionError::new(text))?;

        Ok(Self::new(major, minor))
    }

    /// Read the current host version from a [`VersionSource`]
    pub fn detect(source: &dyn VersionSource) -> Result<Self, MalformedVersionError> {
        Self::parse(&source.host_version())
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for HostVersion {
    type Err = MalformedVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HostVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HostVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
