//! zork-termux installer library.
//!
//! This crate resolves a runnable `zork-termux` binary when the npm package is
//! installed, and checks the npm registry for newer releases. It is used by
//! the `zork-termux-installer` CLI binary and can be driven programmatically
//! through the `ToolchainRunner` and `RegistryTransport` seams.
//!
//! # Modules
//!
//! - [`artefact`] - Bundled binary lookup and permission handling
//! - [`builder`] - Fallback build state machine
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Semantic error types with recovery hints
//! - [`layout`] - Package and source tree path derivation
//! - [`manifest`] - Local `package.json` reading
//! - [`output`] - Prefixed status line helpers
//! - [`platform`] - Termux host detection
//! - [`registry`] - npm registry transport and document parsing
//! - [`resolver`] - Top-level install-time resolution
//! - [`toolchain`] - Cargo invocation
//! - [`update`] - Update check against the registry
//! - [`version`] - Lenient dotted-numeric version comparison

pub mod artefact;
pub mod builder;
pub mod cli;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod output;
pub mod platform;
pub mod registry;
pub mod resolver;
pub mod toolchain;
pub mod update;
pub mod version;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
