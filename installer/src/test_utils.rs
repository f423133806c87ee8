//! Shared test utilities for the installer crate.
//!
//! Available to unit tests and, through the `test-support` feature, to the
//! behaviour suites under `tests/`.

use crate::layout::PackageLayout;
use crate::registry::{RegistryError, RegistryTransport};
use crate::toolchain::{BuildInvocation, ToolchainError, ToolchainRunner};
use camino::{Utf8Path, Utf8PathBuf};
use std::cell::{Cell, RefCell};
use std::process::ExitStatus;
use tempfile::TempDir;

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// A throwaway repository checkout with the npm package at
/// `npm/zork-termux/`, mirroring the published layout.
///
/// The source root is left at its default (two levels above the package
/// root), so fixtures exercise the same path derivation as production.
#[derive(Debug)]
pub struct PackageFixture {
    _temp: TempDir,
    repo_root: Utf8PathBuf,
    layout: PackageLayout,
}

impl PackageFixture {
    /// Create an empty repository with an empty package directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created or is not UTF-8.
    #[must_use]
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("temp dir");
        let repo_root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("UTF-8 path");
        let package_root = repo_root.join("npm").join("zork-termux");
        std::fs::create_dir_all(&package_root).expect("create package root");
        Self {
            _temp: temp,
            repo_root,
            layout: PackageLayout::new(package_root, None),
        }
    }

    /// Return the layout under test.
    #[must_use]
    pub fn layout(&self) -> &PackageLayout {
        &self.layout
    }

    /// Return the repository root (the default source root, normalised).
    #[must_use]
    pub fn repo_root(&self) -> &Utf8Path {
        &self.repo_root
    }

    /// Write a bundled binary and return its path.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_bundled_binary(&self, contents: &[u8]) -> Utf8PathBuf {
        write_file(&self.layout.bundled_binary(), contents)
    }

    /// Write `package.json` declaring `version`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_package_json(&self, version: &str) -> Utf8PathBuf {
        let contents = format!(r#"{{"name":"@mmmbuto/zork-termux","version":"{version}"}}"#);
        write_file(&self.layout.package_manifest(), contents.as_bytes())
    }

    /// Write the source tree's `Cargo.toml`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_source_manifest(&self) -> Utf8PathBuf {
        write_file(
            &self.repo_root.join("Cargo.toml"),
            b"[package]\nname = \"zork-termux\"\nversion = \"0.4.0\"\n",
        )
    }
}

impl Default for PackageFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `contents` to `path`, creating parent directories.
///
/// # Panics
///
/// Panics if the directories or file cannot be written.
pub fn write_file(path: &Utf8Path, contents: &[u8]) -> Utf8PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directories");
    }
    std::fs::write(path, contents).expect("write file");
    path.to_owned()
}

/// Scripted behaviour for [`StubToolchainRunner`].
#[derive(Debug, Clone)]
pub enum StubBuild {
    /// Succeed after writing fake binaries to the given paths.
    Succeed {
        /// Paths the "build" produces.
        outputs: Vec<Utf8PathBuf>,
    },
    /// Fail as if cargo exited with this code.
    ExitCode(i32),
    /// Fail as if cargo could not be started.
    SpawnFailure,
}

/// A stub `ToolchainRunner` that records invocations and replays a
/// scripted outcome instead of spawning cargo.
#[derive(Debug)]
pub struct StubToolchainRunner {
    behaviour: StubBuild,
    invocations: RefCell<Vec<BuildInvocation>>,
}

impl StubToolchainRunner {
    /// Create a stub with the given behaviour.
    #[must_use]
    pub fn new(behaviour: StubBuild) -> Self {
        Self {
            behaviour,
            invocations: RefCell::new(Vec::new()),
        }
    }

    /// Return the invocations received so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<BuildInvocation> {
        self.invocations.borrow().clone()
    }
}

impl ToolchainRunner for StubToolchainRunner {
    fn run(&self, invocation: &BuildInvocation) -> Result<(), ToolchainError> {
        self.invocations.borrow_mut().push(invocation.clone());
        match &self.behaviour {
            StubBuild::Succeed { outputs } => {
                for output in outputs {
                    write_file(output, b"\x7fELF fake zork-termux");
                }
                Ok(())
            }
            StubBuild::ExitCode(code) => Err(ToolchainError::ExitStatus {
                program: invocation.program().to_owned(),
                status: exit_status(*code),
            }),
            StubBuild::SpawnFailure => Err(ToolchainError::Spawn {
                program: invocation.program().to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "cargo not found"),
            }),
        }
    }
}

/// A stub `RegistryTransport` that replays one scripted response.
#[derive(Debug)]
pub struct StubRegistryTransport {
    response: Result<String, RegistryError>,
    calls: Cell<usize>,
}

impl StubRegistryTransport {
    /// Respond with the given body.
    #[must_use]
    pub fn body(body: impl Into<String>) -> Self {
        Self::with_response(Ok(body.into()))
    }

    /// Respond with the given transport error.
    #[must_use]
    pub fn error(err: RegistryError) -> Self {
        Self::with_response(Err(err))
    }

    fn with_response(response: Result<String, RegistryError>) -> Self {
        Self {
            response,
            calls: Cell::new(0),
        }
    }

    /// Return how many requests were made.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl RegistryTransport for StubRegistryTransport {
    fn get(&self, _url: &str) -> Result<String, RegistryError> {
        self.calls.set(self.calls.get() + 1);
        self.response.clone()
    }
}
