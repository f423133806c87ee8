//! Top-level binary resolution run at package install time.
//!
//! The common path is fast: a bundled binary exists, gets marked executable,
//! and the install succeeds without touching the toolchain. Only when the
//! package ships without a binary does resolution hand over to the
//! [`BuildOrchestrator`].

use crate::artefact::{ArtefactLocation, locate_bundled, make_executable};
use crate::builder::{BuildConfig, BuildOrchestrator, BuildOutcome};
use crate::error::InstallerError;
use crate::layout::PackageLayout;
use crate::output::write_status_line;
use crate::platform::{PLATFORM_ADVISORY, PlatformContext};
use crate::toolchain::ToolchainRunner;
use log::{debug, info};
use std::io::Write;

/// Process exit status of an installer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exit 0.
    Success,
    /// Exit 1.
    Failure,
}

impl ExitOutcome {
    /// Return the numeric exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}

/// Terminal outcome of a resolution run.
#[derive(Debug)]
pub enum ResolveOutcome {
    /// The bundled binary was present and is now executable.
    Bundled(ArtefactLocation),
    /// The fallback build ran; carries its terminal outcome.
    Built(BuildOutcome),
    /// The bundled binary was present but could not be made executable.
    PermissionFailed(InstallerError),
}

impl ResolveOutcome {
    /// Map the outcome onto a process exit status.
    #[must_use]
    pub const fn exit_outcome(&self) -> ExitOutcome {
        match self {
            Self::Bundled(_) | Self::Built(BuildOutcome::Installed(_)) => ExitOutcome::Success,
            Self::Built(_) | Self::PermissionFailed(_) => ExitOutcome::Failure,
        }
    }
}

/// Dependencies and configuration for a resolution run.
pub struct Resolver<'a> {
    layout: &'a PackageLayout,
    platform: &'a PlatformContext,
    runner: &'a dyn ToolchainRunner,
    build_config: BuildConfig,
}

impl<'a> Resolver<'a> {
    /// Create a resolver for one package layout.
    #[must_use]
    pub fn new(
        layout: &'a PackageLayout,
        platform: &'a PlatformContext,
        runner: &'a dyn ToolchainRunner,
        build_config: BuildConfig,
    ) -> Self {
        Self {
            layout,
            platform,
            runner,
            build_config,
        }
    }

    /// Resolve a usable binary, reporting progress to `stdout` and warnings
    /// and errors to `stderr`.
    pub fn resolve(&self, stdout: &mut dyn Write, stderr: &mut dyn Write) -> ResolveOutcome {
        if !self.platform.is_expected_platform() {
            info!("host does not look like Termux; continuing");
            write_status_line(stderr, PLATFORM_ADVISORY);
        }

        let outcome = match locate_bundled(self.layout) {
            Some(location) => self.adopt_bundled(location),
            None => self.build_from_source(stdout),
        };
        report(&outcome, stdout, stderr);
        outcome
    }

    fn adopt_bundled(&self, location: ArtefactLocation) -> ResolveOutcome {
        debug!("bundled binary found at {}", location.path());
        match make_executable(location.path()) {
            Ok(()) => ResolveOutcome::Bundled(location),
            Err(err) => ResolveOutcome::PermissionFailed(InstallerError::InstallFailed {
                path: location.path().to_owned(),
                reason: err.to_string(),
            }),
        }
    }

    fn build_from_source(&self, stdout: &mut dyn Write) -> ResolveOutcome {
        debug!(
            "no bundled binary at {}; trying source root {}",
            self.layout.bundled_binary(),
            self.layout.source_root()
        );
        let orchestrator = BuildOrchestrator::new(self.layout, self.runner, self.build_config);
        ResolveOutcome::Built(orchestrator.run_reporting(stdout))
    }
}

fn report(outcome: &ResolveOutcome, stdout: &mut dyn Write, stderr: &mut dyn Write) {
    match outcome {
        ResolveOutcome::Bundled(location) => {
            write_status_line(stdout, format!("Using packaged binary: {}", location.path()));
        }
        ResolveOutcome::Built(build) => match build.clone().into_result() {
            Ok(location) => {
                write_status_line(stdout, format!("Installed built binary: {}", location.path()));
            }
            Err(err) => {
                info!("resolution failed: {}", build.reason_code().unwrap_or("unknown"));
                write_status_line(stderr, err);
            }
        },
        ResolveOutcome::PermissionFailed(err) => {
            info!("resolution failed: install_error");
            write_status_line(stderr, err);
        }
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
