//! Error types for the zork-termux installer.
//!
//! This module defines semantic error variants that provide actionable guidance
//! to users when binary resolution fails. Each fatal variant carries a recovery
//! hint in its message. Update-check failures never surface here; they are
//! folded into [`crate::update::UpdateStatus::CheckFailed`] instead.

use crate::layout::{BINARY_NAME, PREBUILT_DIR};
use camino::Utf8PathBuf;
use thiserror::Error;

/// npm command that reinstalls a release carrying a bundled binary.
pub const REINSTALL_COMMAND: &str = "npm i -g @mmmbuto/zork-termux@latest";

/// Hint shown when the Rust toolchain is missing or broken.
pub const TOOLCHAIN_HINT: &str = "install the Rust toolchain (Termux: pkg install rust) and reinstall";

/// Lead-in for [`REINSTALL_COMMAND`] in failure messages.
pub const RELEASE_HINT: &str = "reinstall a release with a packaged binary";

/// Errors that fail the install step.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// No bundled binary and no source tree to build from.
    #[error(
        "missing packaged binary {}/{} and no source tree at {manifest}; {}: {}",
        PREBUILT_DIR,
        BINARY_NAME,
        RELEASE_HINT,
        REINSTALL_COMMAND
    )]
    MissingSourceTree {
        /// Path where the source manifest was expected.
        manifest: Utf8PathBuf,
    },

    /// Spawning cargo failed, cargo exited non-zero, or the build timed out.
    #[error(
        "cargo build failed: {detail}; {}, or {}: {}",
        TOOLCHAIN_HINT,
        RELEASE_HINT,
        REINSTALL_COMMAND
    )]
    ToolchainInvocation {
        /// Description of the underlying failure.
        detail: String,
    },

    /// Cargo reported success but neither expected output path exists.
    #[error(
        "cargo build succeeded but no binary was found at {primary} or {secondary}; {}: {}",
        RELEASE_HINT,
        REINSTALL_COMMAND
    )]
    ArtefactNotFoundAfterBuild {
        /// Primary release output path that was searched.
        primary: Utf8PathBuf,
        /// Cross-compilation output path that was searched.
        secondary: Utf8PathBuf,
    },

    /// Copying the built binary into place or marking it executable failed.
    #[error("failed to install {path}: {reason}; {}: {}", RELEASE_HINT, REINSTALL_COMMAND)]
    InstallFailed {
        /// Destination path of the artefact.
        path: Utf8PathBuf,
        /// Description of the underlying I/O error.
        reason: String,
    },

    /// A path could not be represented as UTF-8.
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
