//! CLI argument definitions for the zork-termux installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::builder::BuildConfig;
use crate::error::{InstallerError, Result};
use crate::layout::PackageLayout;
use crate::registry::{NPM_REGISTRY, PACKAGE_NAME, package_url};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use std::time::Duration;

/// Resolve the zork-termux binary for an npm install.
#[derive(Parser, Debug)]
#[command(name = "zork-termux-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Resolve the zork-termux binary for an npm install.\n\n",
    "The npm package normally ships a prebuilt binary at prebuilt/zork-termux. ",
    "When it does, the installer marks it executable and exits. Otherwise it ",
    "builds the game from the source checkout with cargo and installs the result ",
    "in the same place.\n\n",
    "The check-update subcommand compares the installed package version with the ",
    "latest release on the npm registry. It never fails the caller.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Resolve the binary from the package directory (npm postinstall):\n",
    "    $ zork-termux-installer\n\n",
    "  Build from a specific checkout, giving cargo ten minutes:\n",
    "    $ zork-termux-installer resolve --source-root ~/src/zork --build-timeout 600\n\n",
    "  Check for a newer release:\n",
    "    $ zork-termux-installer check-update\n\n",
    "Set RUST_LOG=debug for diagnostic output.",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Resolve arguments (used when no subcommand is given).
    #[command(flatten)]
    pub resolve: ResolveArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resolve the packaged binary (default when no subcommand given).
    Resolve(ResolveArgs),

    /// Check the npm registry for a newer release.
    CheckUpdate(CheckUpdateArgs),
}

/// Arguments for the resolve command.
#[derive(Parser, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// npm package directory [default: current directory].
    #[arg(long, value_name = "DIR")]
    pub package_root: Option<Utf8PathBuf>,

    /// Source checkout to build from [default: two levels above the package].
    #[arg(long, value_name = "DIR")]
    pub source_root: Option<Utf8PathBuf>,

    /// Kill the cargo build after this many seconds [default: no limit].
    #[arg(long, value_name = "SECS")]
    pub build_timeout: Option<u64>,
}

/// Arguments for the check-update command.
#[derive(Parser, Debug, Clone)]
pub struct CheckUpdateArgs {
    /// npm package directory holding package.json [default: current directory].
    #[arg(long, value_name = "DIR")]
    pub package_root: Option<Utf8PathBuf>,

    /// Registry document URL for the package.
    #[arg(long, value_name = "URL", default_value_t = default_registry_url())]
    pub registry_url: String,
}

impl Default for CheckUpdateArgs {
    fn default() -> Self {
        Self {
            package_root: None,
            registry_url: default_registry_url(),
        }
    }
}

/// The registry document URL for the published package.
#[must_use]
pub fn default_registry_url() -> String {
    package_url(NPM_REGISTRY, PACKAGE_NAME)
}

impl ResolveArgs {
    /// Build the package layout, defaulting the package root to the current
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or is not
    /// valid UTF-8.
    pub fn layout(&self) -> Result<PackageLayout> {
        let package_root = package_root_or_current_dir(self.package_root.as_ref())?;
        Ok(PackageLayout::new(package_root, self.source_root.clone()))
    }

    /// Return the build configuration selected by the flags.
    #[must_use]
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            timeout: self.build_timeout.map(Duration::from_secs),
        }
    }
}

impl CheckUpdateArgs {
    /// Build the package layout, defaulting the package root to the current
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or is not
    /// valid UTF-8.
    pub fn layout(&self) -> Result<PackageLayout> {
        let package_root = package_root_or_current_dir(self.package_root.as_ref())?;
        Ok(PackageLayout::new(package_root, None))
    }
}

impl Cli {
    /// Returns the effective resolve arguments.
    ///
    /// If a `Resolve` subcommand was provided, returns those arguments.
    /// Otherwise returns the flattened arguments.
    #[must_use]
    pub fn resolve_args(&self) -> &ResolveArgs {
        match &self.command {
            Some(Command::Resolve(args)) => args,
            Some(Command::CheckUpdate(_)) | None => &self.resolve,
        }
    }
}

fn package_root_or_current_dir(explicit: Option<&Utf8PathBuf>) -> Result<Utf8PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.clone());
    }
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::try_from(cwd).map_err(|err| InstallerError::NonUtf8Path(err.to_string()))
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
