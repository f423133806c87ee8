//! Filesystem layout of the npm package and its source tree.
//!
//! Every path the installer touches is fixed relative to one of two roots:
//! the npm package root (where `package.json` and `prebuilt/` live) and the
//! source root (the repository checkout holding `Cargo.toml`). The npm
//! package ships under `npm/zork-termux/`, so the source root defaults to
//! two directories above the package root.

use camino::{Utf8Path, Utf8PathBuf};

/// Name of the native executable.
pub const BINARY_NAME: &str = "zork-termux";

/// Directory under the package root holding the bundled binary.
pub const PREBUILT_DIR: &str = "prebuilt";

/// Manifest whose presence proves a source tree is available.
pub const SOURCE_MANIFEST: &str = "Cargo.toml";

/// Target triple used by the cross-compiled release layout.
pub const CROSS_TARGET: &str = "aarch64-linux-android";

/// Resolved paths for a single installer run.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use zork_termux_installer::layout::PackageLayout;
///
/// let layout = PackageLayout::new(Utf8PathBuf::from("/repo/npm/zork-termux"), None);
/// assert_eq!(layout.source_root().as_str(), "/repo/npm/zork-termux/../..");
/// assert!(layout.bundled_binary().ends_with("prebuilt/zork-termux"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    package_root: Utf8PathBuf,
    source_root: Utf8PathBuf,
}

impl PackageLayout {
    /// Build a layout from the package root and an optional source root
    /// override.
    #[must_use]
    pub fn new(package_root: Utf8PathBuf, source_root: Option<Utf8PathBuf>) -> Self {
        let source_root = source_root.unwrap_or_else(|| default_source_root(&package_root));
        Self {
            package_root,
            source_root,
        }
    }

    /// Return the npm package root.
    #[must_use]
    pub fn package_root(&self) -> &Utf8Path {
        &self.package_root
    }

    /// Return the source tree root.
    #[must_use]
    pub fn source_root(&self) -> &Utf8Path {
        &self.source_root
    }

    /// Return the fixed path of the bundled binary.
    #[must_use]
    pub fn bundled_binary(&self) -> Utf8PathBuf {
        self.package_root.join(PREBUILT_DIR).join(BINARY_NAME)
    }

    /// Return the path of the package's own `package.json`.
    #[must_use]
    pub fn package_manifest(&self) -> Utf8PathBuf {
        self.package_root.join("package.json")
    }

    /// Return the path of the source tree's build manifest.
    #[must_use]
    pub fn source_manifest(&self) -> Utf8PathBuf {
        self.source_root.join(SOURCE_MANIFEST)
    }

    /// Return the host release output path.
    #[must_use]
    pub fn primary_build_output(&self) -> Utf8PathBuf {
        self.source_root
            .join("target")
            .join("release")
            .join(BINARY_NAME)
    }

    /// Return the cross-compiled release output path.
    #[must_use]
    pub fn secondary_build_output(&self) -> Utf8PathBuf {
        self.source_root
            .join("target")
            .join(CROSS_TARGET)
            .join("release")
            .join(BINARY_NAME)
    }
}

fn default_source_root(package_root: &Utf8Path) -> Utf8PathBuf {
    package_root.join("..").join("..")
}
