//! Invocation of the external Rust toolchain.
//!
//! The installer never compiles anything itself. It spawns `cargo build
//! --release` in the source root with the terminal inherited, so compiler
//! diagnostics stream straight to the user, and blocks until the child exits.
//! The child handle is owned here and waited on in one place; an optional
//! timeout kills it if the build runs too long.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fmt;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// A single toolchain command to run in a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvocation {
    program: String,
    args: Vec<String>,
    working_dir: Utf8PathBuf,
    timeout: Option<Duration>,
}

impl BuildInvocation {
    /// Describe `cargo build --release` in `source_root`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use zork_termux_installer::toolchain::BuildInvocation;
    ///
    /// let invocation = BuildInvocation::cargo_release(Utf8Path::new("/repo"), None);
    /// assert_eq!(invocation.to_string(), "cargo build --release");
    /// assert_eq!(invocation.working_dir().as_str(), "/repo");
    /// ```
    #[must_use]
    pub fn cargo_release(source_root: &Utf8Path, timeout: Option<Duration>) -> Self {
        Self {
            program: "cargo".to_owned(),
            args: vec!["build".to_owned(), "--release".to_owned()],
            working_dir: source_root.to_owned(),
            timeout,
        }
    }

    /// Return the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Return the program arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Return the directory the command runs in.
    #[must_use]
    pub fn working_dir(&self) -> &Utf8Path {
        &self.working_dir
    }

    /// Return the optional wall-clock limit for the command.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Display for BuildInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Failures raised while running the toolchain.
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    /// The program could not be started at all.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully.
    #[error("{program} exited with {status}")]
    ExitStatus {
        /// Program that failed.
        program: String,
        /// Exit status reported by the OS.
        status: ExitStatus,
    },

    /// The program exceeded its timeout and was killed.
    #[error("{program} timed out after {} seconds", .timeout.as_secs())]
    TimedOut {
        /// Program that was killed.
        program: String,
        /// Limit that was exceeded.
        timeout: Duration,
    },

    /// Waiting on the child process failed.
    #[error("failed to wait for {program}: {source}")]
    Wait {
        /// Program being waited on.
        program: String,
        /// Underlying wait error.
        #[source]
        source: std::io::Error,
    },
}

/// Abstraction over running a build command to completion.
#[cfg_attr(test, mockall::automock)]
pub trait ToolchainRunner {
    /// Run the invocation and block until it finishes.
    ///
    /// # Errors
    ///
    /// Returns [`ToolchainError`] if the command cannot start, exits
    /// unsuccessfully, or exceeds its timeout.
    fn run(&self, invocation: &BuildInvocation) -> Result<(), ToolchainError>;
}

/// Runs toolchain commands on the host with inherited standard streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolchainRunner;

impl ToolchainRunner for SystemToolchainRunner {
    fn run(&self, invocation: &BuildInvocation) -> Result<(), ToolchainError> {
        debug!(
            "spawning `{invocation}` in {}",
            invocation.working_dir()
        );
        let mut child = Command::new(invocation.program())
            .args(invocation.args())
            .current_dir(invocation.working_dir().as_std_path())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| ToolchainError::Spawn {
                program: invocation.program().to_owned(),
                source,
            })?;

        let status = wait_for_child(&mut child, invocation)?;
        debug!("`{invocation}` finished with {status}");

        if status.success() {
            Ok(())
        } else {
            Err(ToolchainError::ExitStatus {
                program: invocation.program().to_owned(),
                status,
            })
        }
    }
}

/// Wait for the child, honouring the invocation's timeout if any.
fn wait_for_child(
    child: &mut Child,
    invocation: &BuildInvocation,
) -> Result<ExitStatus, ToolchainError> {
    let wait_error = |source| ToolchainError::Wait {
        program: invocation.program().to_owned(),
        source,
    };

    let Some(timeout) = invocation.timeout() else {
        return child.wait().map_err(wait_error);
    };

    match child.wait_timeout(timeout).map_err(wait_error)? {
        Some(status) => Ok(status),
        None => {
            if let Err(err) = child.kill() {
                debug!("failed to kill `{invocation}` after timeout: {err}");
            }
            if let Err(err) = child.wait() {
                debug!("failed to reap `{invocation}` after timeout: {err}");
            }
            Err(ToolchainError::TimedOut {
                program: invocation.program().to_owned(),
                timeout,
            })
        }
    }
}
