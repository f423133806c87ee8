//! npm registry access for the update check.
//!
//! Provides a trait-based abstraction over the single HTTP read the update
//! check performs, enabling dependency injection for testing. The production
//! transport uses `ureq` with its default configuration: no retries, no
//! caching, and no timeout beyond the agent's own defaults.

use serde::Deserialize;
use std::sync::OnceLock;

/// Default npm registry base URL.
pub const NPM_REGISTRY: &str = "https://registry.npmjs.org";

/// Scoped npm package name.
pub const PACKAGE_NAME: &str = "@mmmbuto/zork-termux";

/// Return the metadata URL for a package, percent-encoding the scope slash.
///
/// # Examples
///
/// ```
/// use zork_termux_installer::registry::{NPM_REGISTRY, PACKAGE_NAME, package_url};
///
/// assert_eq!(
///     package_url(NPM_REGISTRY, PACKAGE_NAME),
///     "https://registry.npmjs.org/@mmmbuto%2fzork-termux",
/// );
/// ```
#[must_use]
pub fn package_url(registry: &str, package: &str) -> String {
    let registry = registry.trim_end_matches('/');
    let encoded = package.replace('/', "%2f");
    format!("{registry}/{encoded}")
}

/// Errors reported by a [`RegistryTransport`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The registry answered with a non-success HTTP status.
    #[error("registry returned HTTP {status} for {url}")]
    NonSuccessStatus {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The request failed before a complete response arrived.
    #[error("request to {url} failed: {reason}")]
    Network {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },
}

/// Trait for fetching a registry document.
///
/// # Examples
///
/// ```no_run
/// use zork_termux_installer::registry::{HttpRegistryTransport, RegistryTransport};
///
/// let body = HttpRegistryTransport.get("https://registry.npmjs.org/@mmmbuto%2fzork-termux")?;
/// assert!(body.contains("dist-tags"));
/// # Ok::<(), zork_termux_installer::registry::RegistryError>(())
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait RegistryTransport {
    /// Perform a GET and return the response body.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NonSuccessStatus`] for non-2xx responses and
    /// [`RegistryError::Network`] for connection or read failures.
    fn get(&self, url: &str) -> Result<String, RegistryError>;
}

/// HTTP transport using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpRegistryTransport;

impl RegistryTransport for HttpRegistryTransport {
    fn get(&self, url: &str) -> Result<String, RegistryError> {
        let response = http_agent()
            .get(url)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(RegistryError::NonSuccessStatus {
                url: url.to_owned(),
                status,
            });
        }

        response
            .into_body()
            .read_to_string()
            .map_err(|e| RegistryError::Network {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }
}

/// Shared `ureq` agent with default configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(ureq::Agent::new_with_defaults)
}

/// Map a ureq error to a [`RegistryError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> RegistryError {
    match err {
        ureq::Error::StatusCode(status) => RegistryError::NonSuccessStatus {
            url: url.to_owned(),
            status: *status,
        },
        other => RegistryError::Network {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

/// The parts of the registry document the update check reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryMetadata {
    /// Version tagged `latest`, if the document carries one.
    pub latest: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegistryDocument {
    #[serde(rename = "dist-tags", default)]
    dist_tags: Option<DistTags>,
}

#[derive(Debug, Deserialize)]
struct DistTags {
    #[serde(default)]
    latest: Option<String>,
}

/// Parse a registry document body.
///
/// A missing `dist-tags` object, a missing `latest` entry, and an empty
/// `latest` string all yield `latest: None`.
///
/// # Errors
///
/// Returns the `serde_json` error if the body is not a JSON object of the
/// expected shape.
pub fn parse_registry_metadata(body: &str) -> Result<RegistryMetadata, serde_json::Error> {
    let document: RegistryDocument = serde_json::from_str(body)?;
    let latest = document
        .dist_tags
        .and_then(|tags| tags.latest)
        .filter(|latest| !latest.trim().is_empty());
    Ok(RegistryMetadata { latest })
}
