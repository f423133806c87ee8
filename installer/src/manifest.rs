//! The package's own `package.json`, the source of the local version.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// Fields the installer reads from `package.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageManifest {
    /// Locally declared version.
    pub version: String,
}

/// Errors raised while reading `package.json`.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the manifest.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or lacks a string `version`.
    #[error("invalid {path}: {source}")]
    Parse {
        /// Path of the manifest.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl PackageManifest {
    /// Read and parse a `package.json` file.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] if the file is unreadable or malformed.
    pub fn load(path: &Utf8Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ManifestError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(contents: &str) -> (tempfile::TempDir, Utf8PathBuf) {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::try_from(temp.path().join("package.json")).expect("UTF-8 path");
        std::fs::write(&path, contents).expect("write manifest");
        (temp, path)
    }

    #[test]
    fn load_reads_version_and_ignores_other_fields() {
        let (_temp, path) = write_manifest(
            r#"{"name":"@mmmbuto/zork-termux","version":"0.4.1","bin":{"zork-termux":"bin/zork-termux"}}"#,
        );
        let manifest = PackageManifest::load(&path).expect("manifest");
        assert_eq!(manifest.version, "0.4.1");
    }

    #[test]
    fn load_reports_missing_version() {
        let (_temp, path) = write_manifest(r#"{"name":"@mmmbuto/zork-termux"}"#);
        let err = PackageManifest::load(&path).expect_err("missing version");
        assert!(matches!(err, ManifestError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn load_reports_missing_file() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::try_from(temp.path().join("package.json")).expect("UTF-8 path");
        let err = PackageManifest::load(&path).expect_err("missing file");
        assert!(matches!(err, ManifestError::Read { .. }), "got {err:?}");
        assert!(err.to_string().contains("package.json"));
    }
}
