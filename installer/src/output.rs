//! User-facing status lines.
//!
//! Every line the installer prints carries the `[zork-termux]` prefix so it
//! stands out in npm's install log. Writers are injected so callers and tests
//! decide where the lines go.

use std::fmt::Display;
use std::io::Write;

/// Prefix applied to every status line.
pub const PREFIX: &str = "[zork-termux]";

/// Format a message with the status prefix.
///
/// # Examples
///
/// ```
/// use zork_termux_installer::output::prefixed;
///
/// assert_eq!(prefixed("Using packaged binary"), "[zork-termux] Using packaged binary");
/// ```
#[must_use]
pub fn prefixed(message: impl Display) -> String {
    format!("{PREFIX} {message}")
}

/// Write a prefixed status line, ignoring write failures.
pub fn write_status_line(out: &mut dyn Write, message: impl Display) {
    write_line(out, prefixed(message));
}

/// Write a line verbatim, ignoring write failures.
pub fn write_line(out: &mut dyn Write, message: impl Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
