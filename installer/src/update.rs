//! Update check against the npm registry.
//!
//! One GET, one comparison, one informational message. Every failure is
//! folded into [`UpdateStatus::CheckFailed`] so the check can never fail the
//! caller: there is no error path out of [`check_for_update`].

use crate::error::REINSTALL_COMMAND;
use crate::manifest::PackageManifest;
use crate::output::write_status_line;
use crate::registry::{RegistryError, RegistryTransport, parse_registry_metadata};
use crate::version::SemanticVersion;
use camino::Utf8Path;
use log::debug;
use std::cmp::Ordering;
use std::fmt;
use std::io::Write;

/// Why an update check could not reach a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    /// The registry answered with a non-success status.
    NonSuccessStatus {
        /// The HTTP status code.
        status: u16,
    },
    /// The request failed at the transport level.
    NetworkError {
        /// Description of the failure.
        reason: String,
    },
    /// The response body was not a registry document.
    ParseError {
        /// Description of the parse failure.
        reason: String,
    },
    /// The document had no `dist-tags.latest` entry.
    MissingLatestTag,
}

impl CheckFailure {
    /// Stable machine-readable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NonSuccessStatus { .. } => "non_success_status",
            Self::NetworkError { .. } => "network_error",
            Self::ParseError { .. } => "parse_error",
            Self::MissingLatestTag => "missing_latest_tag",
        }
    }

    /// The informational line shown to the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::NonSuccessStatus { .. } => "Unable to check updates right now.",
            Self::NetworkError { .. } => "Update check failed (network error).",
            Self::ParseError { .. } => "Failed to parse npm response.",
            Self::MissingLatestTag => "No latest tag found on npm.",
        }
    }
}

impl From<RegistryError> for CheckFailure {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NonSuccessStatus { status, .. } => Self::NonSuccessStatus { status },
            other @ RegistryError::Network { .. } => Self::NetworkError {
                reason: other.to_string(),
            },
        }
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonSuccessStatus { status } => write!(f, "{}: HTTP {status}", self.code()),
            Self::NetworkError { reason } | Self::ParseError { reason } => {
                write!(f, "{}: {reason}", self.code())
            }
            Self::MissingLatestTag => f.write_str(self.code()),
        }
    }
}

/// Terminal outcome of an update check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The local version is at least as new as the registry's latest.
    UpToDate {
        /// Locally declared version.
        local: String,
    },
    /// The registry has a newer release.
    UpdateAvailable {
        /// Locally declared version.
        local: String,
        /// Version tagged `latest` on the registry.
        remote: String,
    },
    /// The check could not complete.
    CheckFailed(CheckFailure),
}

impl UpdateStatus {
    /// Write the informational lines for this outcome.
    pub fn report(&self, out: &mut dyn Write) {
        match self {
            Self::UpToDate { local } => {
                write_status_line(out, format!("You are up to date ({local})."));
            }
            Self::UpdateAvailable { local, remote } => {
                write_status_line(out, format!("Update available: {local} -> {remote}"));
                write_status_line(out, format!("Run: {REINSTALL_COMMAND}"));
            }
            Self::CheckFailed(failure) => write_status_line(out, failure.message()),
        }
    }
}

/// Compare the local version against the registry's `latest` tag.
///
/// # Examples
///
/// ```
/// use zork_termux_installer::registry::{RegistryError, RegistryTransport};
/// use zork_termux_installer::update::{UpdateStatus, check_for_update};
///
/// struct Fixed(&'static str);
///
/// impl RegistryTransport for Fixed {
///     fn get(&self, _url: &str) -> Result<String, RegistryError> {
///         Ok(self.0.to_owned())
///     }
/// }
///
/// let transport = Fixed(r#"{"dist-tags":{"latest":"9.9.9"}}"#);
/// let status = check_for_update("1.0.0", &transport, "https://registry.test/pkg");
/// assert_eq!(
///     status,
///     UpdateStatus::UpdateAvailable { local: "1.0.0".into(), remote: "9.9.9".into() },
/// );
/// ```
#[must_use]
pub fn check_for_update(
    local: &str,
    transport: &dyn RegistryTransport,
    url: &str,
) -> UpdateStatus {
    debug!("checking {url} for updates to {local}");
    let body = match transport.get(url) {
        Ok(body) => body,
        Err(err) => return UpdateStatus::CheckFailed(err.into()),
    };

    let metadata = match parse_registry_metadata(&body) {
        Ok(metadata) => metadata,
        Err(err) => {
            return UpdateStatus::CheckFailed(CheckFailure::ParseError {
                reason: err.to_string(),
            });
        }
    };

    let Some(remote) = metadata.latest else {
        return UpdateStatus::CheckFailed(CheckFailure::MissingLatestTag);
    };

    match SemanticVersion::parse(&remote).compare(&SemanticVersion::parse(local)) {
        Ordering::Greater => UpdateStatus::UpdateAvailable {
            local: local.to_owned(),
            remote,
        },
        Ordering::Equal | Ordering::Less => UpdateStatus::UpToDate {
            local: local.to_owned(),
        },
    }
}

/// Read the local version from `package.json`, check the registry, and
/// report the outcome.
///
/// Never fails: an unreadable manifest is reported like any other failed
/// check. Returns the status when a check was performed.
pub fn run_update_check(
    package_manifest: &Utf8Path,
    transport: &dyn RegistryTransport,
    url: &str,
    out: &mut dyn Write,
) -> Option<UpdateStatus> {
    let manifest = match PackageManifest::load(package_manifest) {
        Ok(manifest) => manifest,
        Err(err) => {
            debug!("update check skipped: {err}");
            write_status_line(out, format!("Unable to read local package version: {err}"));
            return None;
        }
    };

    let status = check_for_update(&manifest.version, transport, url);
    if let UpdateStatus::CheckFailed(failure) = &status {
        debug!("update check failed: {failure}");
    }
    status.report(out);
    Some(status)
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
