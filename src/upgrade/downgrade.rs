//! Downgrade detection

use crate::upgrade::error::DowngradeDetectedError;
use crate::upgrade::types::PluginRunInfo;

/// Fails when the current host version is older than the previously recorded one
///
/// Equal versions and a missing previous version both pass.
pub fn check(info: &PluginRunInfo) -> Result<(), DowngradeDetectedError> {
    match info.previous_version {
        Some(previous) if info.current_version < previous => Err(DowngradeDetectedError {
            current: info.current_version,
            previous,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::model::HostVersion;
    use rstest::rstest;

    fn info(current: &str, previous: Option<&str>) -> PluginRunInfo {
        PluginRunInfo {
            current_version: current.parse().unwrap(),
            previous_version: previous.map(|p| p.parse().unwrap()),
        }
    }

    #[rstest]
    #[case("2.0", Some("1.0"))]
    #[case("1.0", Some("1.0"))] // equal is not a downgrade
    #[case("1.10", Some("1.9"))]
    #[case("1.0", None)]
    fn check_passes_when_not_downgraded(#[case] current: &str, #[case] previous: Option<&str>) {
        assert_eq!(check(&info(current, previous)), Ok(()));
    }

    #[rstest]
    #[case("1.0", "2.0")]
    #[case("6.1", "6.2")]
    #[case("1.9", "1.10")]
    fn check_fails_with_both_versions_on_downgrade(#[case] current: &str, #[case] previous: &str) {
        let err = check(&info(current, Some(previous))).unwrap_err();

        assert_eq!(
            err,
            DowngradeDetectedError {
                current: current.parse::<HostVersion>().unwrap(),
                previous: previous.parse::<HostVersion>().unwrap(),
            }
        );
    }

    #[test]
    fn downgrade_error_message_names_both_versions() {
        let err = check(&info("1.0", Some("2.0"))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Downgrade detected: host version 1.0 is older than previously recorded 2.0"
        );
    }
}
