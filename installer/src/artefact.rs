//! Native binary locations and their provenance.
//!
//! The bundled binary lives at a single well-known path inside the package
//! (see [`PackageLayout::bundled_binary`]). There is no search and no choice
//! between candidates: the file either exists there or it does not.

use crate::layout::PackageLayout;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::io;

/// Permission bits applied to installed binaries (`rwxr-xr-x`).
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Where a binary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Shipped prebuilt inside the npm package.
    Bundled,
    /// Compiled from source during this install.
    Built,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => f.write_str("bundled"),
            Self::Built => f.write_str("built"),
        }
    }
}

/// A native binary path tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtefactLocation {
    path: Utf8PathBuf,
    provenance: Provenance,
}

impl ArtefactLocation {
    /// Create a new location.
    #[must_use]
    pub fn new(path: Utf8PathBuf, provenance: Provenance) -> Self {
        Self { path, provenance }
    }

    /// Return the binary path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Return how the binary was obtained.
    #[must_use]
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }
}

/// Return the bundled binary if it exists as a file.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use zork_termux_installer::artefact::locate_bundled;
/// use zork_termux_installer::layout::PackageLayout;
///
/// let layout = PackageLayout::new(Utf8PathBuf::from("/nonexistent/pkg"), None);
/// assert!(locate_bundled(&layout).is_none());
/// ```
#[must_use]
pub fn locate_bundled(layout: &PackageLayout) -> Option<ArtefactLocation> {
    let path = layout.bundled_binary();
    path.is_file()
        .then(|| ArtefactLocation::new(path, Provenance::Bundled))
}

/// Mark a file readable and executable for owner, group, and other.
///
/// This is a no-op on platforms without Unix permission bits.
///
/// # Errors
///
/// Returns any I/O error raised while updating the permissions.
#[cfg(unix)]
pub fn make_executable(path: &Utf8Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(EXECUTABLE_MODE))
}

/// Mark a file readable and executable for owner, group, and other.
///
/// This is a no-op on platforms without Unix permission bits.
///
/// # Errors
///
/// Returns an error only if the file does not exist.
#[cfg(not(unix))]
pub fn make_executable(path: &Utf8Path) -> io::Result<()> {
    std::fs::metadata(path).map(|_| ())
}
