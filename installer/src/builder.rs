//! Source fallback build for when no bundled binary ships with the package.
//!
//! The orchestration is a linear state machine. Each step either advances to
//! the next [`BuildState`] or stops with a terminal [`BuildOutcome`]; there is
//! no backtracking and no retry:
//!
//! ```text
//! CheckSourceManifest -> InvokeBuild -> LocateBuiltBinary -> InstallArtefact
//!        |                   |                 |                  |
//!   Unavailable           Failed            Failed      Installed / Failed
//! ```
//!
//! Interrupting the process between a successful build and installation
//! leaves nothing installed. Re-running starts from scratch and is safe.

use crate::artefact::{ArtefactLocation, Provenance, make_executable};
use crate::error::InstallerError;
use crate::layout::PackageLayout;
use crate::output::write_status_line;
use crate::toolchain::{BuildInvocation, ToolchainRunner};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fmt;
use std::io::Write;
use std::time::Duration;

/// Options controlling the fallback build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildConfig {
    /// Kill the toolchain if it runs longer than this.
    pub timeout: Option<Duration>,
}

/// Intermediate states of the fallback build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    /// Check that a source tree is present.
    CheckSourceManifest,
    /// Run the toolchain.
    InvokeBuild,
    /// Look for the binary at the expected output paths.
    LocateBuiltBinary,
    /// Copy the built binary into the package.
    InstallArtefact {
        /// Path of the freshly built binary.
        built: Utf8PathBuf,
    },
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckSourceManifest => f.write_str("check-source-manifest"),
            Self::InvokeBuild => f.write_str("invoke-build"),
            Self::LocateBuiltBinary => f.write_str("locate-built-binary"),
            Self::InstallArtefact { .. } => f.write_str("install-artefact"),
        }
    }
}

/// Why no build could be attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The source manifest is absent.
    NoSourceTree {
        /// Path where the manifest was expected.
        manifest: Utf8PathBuf,
    },
}

impl UnavailableReason {
    /// Stable machine-readable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoSourceTree { .. } => "no_source_tree",
        }
    }
}

/// Why an attempted build did not produce an installed binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildFailure {
    /// The toolchain could not be run or reported failure.
    ToolchainError {
        /// Description of the toolchain failure.
        detail: String,
    },
    /// The toolchain succeeded but no output was found.
    BinaryNotFoundAfterBuild {
        /// Primary output path that was searched.
        primary: Utf8PathBuf,
        /// Cross-compilation output path that was searched.
        secondary: Utf8PathBuf,
    },
    /// Copying the binary or setting its permissions failed.
    InstallError {
        /// Destination of the copy.
        destination: Utf8PathBuf,
        /// Description of the I/O failure.
        detail: String,
    },
}

impl BuildFailure {
    /// Stable machine-readable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ToolchainError { .. } => "toolchain_error",
            Self::BinaryNotFoundAfterBuild { .. } => "binary_not_found_after_build",
            Self::InstallError { .. } => "install_error",
        }
    }
}

/// Terminal outcome of the fallback build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The built binary was installed at the bundled path.
    Installed(ArtefactLocation),
    /// No source tree was available to build from.
    Unavailable(UnavailableReason),
    /// The build was attempted and failed.
    Failed(BuildFailure),
}

impl BuildOutcome {
    /// Return the reason code for non-installed outcomes.
    #[must_use]
    pub const fn reason_code(&self) -> Option<&'static str> {
        match self {
            Self::Installed(_) => None,
            Self::Unavailable(reason) => Some(reason.code()),
            Self::Failed(failure) => Some(failure.code()),
        }
    }

    /// Convert into a `Result`, mapping failures onto [`InstallerError`].
    ///
    /// # Errors
    ///
    /// Returns the matching [`InstallerError`] for every outcome other than
    /// [`BuildOutcome::Installed`].
    pub fn into_result(self) -> crate::error::Result<ArtefactLocation> {
        match self {
            Self::Installed(location) => Ok(location),
            Self::Unavailable(UnavailableReason::NoSourceTree { manifest }) => {
                Err(InstallerError::MissingSourceTree { manifest })
            }
            Self::Failed(BuildFailure::ToolchainError { detail }) => {
                Err(InstallerError::ToolchainInvocation { detail })
            }
            Self::Failed(BuildFailure::BinaryNotFoundAfterBuild { primary, secondary }) => {
                Err(InstallerError::ArtefactNotFoundAfterBuild { primary, secondary })
            }
            Self::Failed(BuildFailure::InstallError {
                destination,
                detail,
            }) => Err(InstallerError::InstallFailed {
                path: destination,
                reason: detail,
            }),
        }
    }
}

/// Result of a single state transition.
#[derive(Debug)]
enum Step {
    Next(BuildState),
    Done(BuildOutcome),
}

/// Drives the fallback build for one package layout.
pub struct BuildOrchestrator<'a> {
    layout: &'a PackageLayout,
    runner: &'a dyn ToolchainRunner,
    config: BuildConfig,
}

impl<'a> BuildOrchestrator<'a> {
    /// Create an orchestrator over the given layout and toolchain runner.
    #[must_use]
    pub fn new(
        layout: &'a PackageLayout,
        runner: &'a dyn ToolchainRunner,
        config: BuildConfig,
    ) -> Self {
        Self {
            layout,
            runner,
            config,
        }
    }

    /// Run the state machine to a terminal outcome without progress output.
    #[must_use]
    pub fn run(&self) -> BuildOutcome {
        self.run_reporting(&mut std::io::sink())
    }

    /// Run the state machine to a terminal outcome, announcing the build on
    /// `progress` once a source tree has been found.
    pub fn run_reporting(&self, progress: &mut dyn Write) -> BuildOutcome {
        let mut state = BuildState::CheckSourceManifest;
        loop {
            debug!("build state: {state}");
            match self.step(state, progress) {
                Step::Next(next) => state = next,
                Step::Done(outcome) => {
                    debug!("build finished: {outcome:?}");
                    return outcome;
                }
            }
        }
    }

    fn step(&self, state: BuildState, progress: &mut dyn Write) -> Step {
        match state {
            BuildState::CheckSourceManifest => self.check_source_manifest(),
            BuildState::InvokeBuild => self.invoke_build(progress),
            BuildState::LocateBuiltBinary => self.locate_built_binary(),
            BuildState::InstallArtefact { built } => self.install_artefact(built),
        }
    }

    fn check_source_manifest(&self) -> Step {
        let manifest = self.layout.source_manifest();
        if manifest.is_file() {
            Step::Next(BuildState::InvokeBuild)
        } else {
            Step::Done(BuildOutcome::Unavailable(UnavailableReason::NoSourceTree {
                manifest,
            }))
        }
    }

    fn invoke_build(&self, progress: &mut dyn Write) -> Step {
        write_status_line(
            progress,
            "Packaged binary not found; building from source with cargo...",
        );
        let invocation =
            BuildInvocation::cargo_release(self.layout.source_root(), self.config.timeout);
        match self.runner.run(&invocation) {
            Ok(()) => Step::Next(BuildState::LocateBuiltBinary),
            Err(err) => Step::Done(BuildOutcome::Failed(BuildFailure::ToolchainError {
                detail: err.to_string(),
            })),
        }
    }

    fn locate_built_binary(&self) -> Step {
        let primary = self.layout.primary_build_output();
        if primary.is_file() {
            return Step::Next(BuildState::InstallArtefact { built: primary });
        }

        let secondary = self.layout.secondary_build_output();
        if secondary.is_file() {
            return Step::Next(BuildState::InstallArtefact { built: secondary });
        }

        Step::Done(BuildOutcome::Failed(
            BuildFailure::BinaryNotFoundAfterBuild { primary, secondary },
        ))
    }

    fn install_artefact(&self, built: Utf8PathBuf) -> Step {
        let destination = self.layout.bundled_binary();
        match install_binary(&built, &destination) {
            Ok(()) => Step::Done(BuildOutcome::Installed(ArtefactLocation::new(
                destination,
                Provenance::Built,
            ))),
            Err(err) => Step::Done(BuildOutcome::Failed(BuildFailure::InstallError {
                destination,
                detail: err.to_string(),
            })),
        }
    }
}

/// Copy `source` to `destination`, creating parents, and mark it executable.
fn install_binary(source: &Utf8Path, destination: &Utf8Path) -> std::io::Result<()> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(source, destination)?;
    make_executable(destination)
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
