//! Advisory detection of the Android Termux host.
//!
//! The npm package targets Termux on arm64. Detection only decides whether
//! to print a warning; it never blocks installation. Environment variables
//! are captured once into a [`PlatformContext`] at process entry and passed
//! explicitly from there.

use std::ffi::OsString;

/// Environment variable Termux sets to its own version.
pub const TERMUX_VERSION_VAR: &str = "TERMUX_VERSION";

/// Environment variable holding the installation prefix.
pub const PREFIX_VAR: &str = "PREFIX";

/// Installation prefix used by a standard Termux install.
pub const TERMUX_PREFIX: &str = "/data/data/com.termux/files/usr";

/// Warning printed when the host does not look like Termux.
pub const PLATFORM_ADVISORY: &str = "This npm package is designed for Android Termux (arm64).";

/// Snapshot of the environment signals used for platform detection.
///
/// # Examples
///
/// ```
/// use zork_termux_installer::platform::{PlatformContext, TERMUX_PREFIX};
///
/// let termux = PlatformContext::new(None, Some(TERMUX_PREFIX.into()));
/// assert!(termux.is_expected_platform());
///
/// let desktop = PlatformContext::new(None, Some("/usr/local".into()));
/// assert!(!desktop.is_expected_platform());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformContext {
    termux_version: Option<OsString>,
    prefix: Option<OsString>,
}

impl PlatformContext {
    /// Build a context from explicit values.
    #[must_use]
    pub fn new(termux_version: Option<OsString>, prefix: Option<OsString>) -> Self {
        Self {
            termux_version,
            prefix,
        }
    }

    /// Capture the current process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os(TERMUX_VERSION_VAR),
            std::env::var_os(PREFIX_VAR),
        )
    }

    /// Return `true` when the environment looks like Termux.
    ///
    /// Either a non-empty `TERMUX_VERSION` or an exact `PREFIX` match is
    /// enough.
    #[must_use]
    pub fn is_expected_platform(&self) -> bool {
        let has_indicator = self
            .termux_version
            .as_ref()
            .is_some_and(|value| !value.is_empty());
        let has_prefix = self
            .prefix
            .as_ref()
            .is_some_and(|value| value.as_os_str() == TERMUX_PREFIX);
        has_indicator || has_prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::indicator_only(Some("0.118.0"), None, true)]
    #[case::prefix_only(None, Some(TERMUX_PREFIX), true)]
    #[case::both(Some("0.118.0"), Some(TERMUX_PREFIX), true)]
    #[case::empty_indicator(Some(""), None, false)]
    #[case::empty_indicator_with_prefix(Some(""), Some(TERMUX_PREFIX), true)]
    #[case::prefix_mismatch(None, Some("/usr"), false)]
    #[case::prefix_with_trailing_slash(None, Some("/data/data/com.termux/files/usr/"), false)]
    #[case::nothing(None, None, false)]
    fn detection_truth_table(
        #[case] termux_version: Option<&str>,
        #[case] prefix: Option<&str>,
        #[case] expected: bool,
    ) {
        let context = PlatformContext::new(
            termux_version.map(OsString::from),
            prefix.map(OsString::from),
        );
        assert_eq!(context.is_expected_platform(), expected);
    }

    #[test]
    fn from_env_reads_termux_variables() {
        temp_env::with_vars(
            [
                (TERMUX_VERSION_VAR, Some("0.118.0")),
                (PREFIX_VAR, None::<&str>),
            ],
            || {
                let context = PlatformContext::from_env();
                assert!(context.is_expected_platform());
            },
        );
    }

    #[test]
    fn from_env_without_signals_is_not_termux() {
        temp_env::with_vars_unset([TERMUX_VERSION_VAR, PREFIX_VAR], || {
            assert!(!PlatformContext::from_env().is_expected_platform());
        });
    }
}
