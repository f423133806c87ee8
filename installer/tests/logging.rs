//! Diagnostic log records emitted during resolution.

use logtest::Logger;
use std::ffi::OsString;
use zork_termux_installer::builder::BuildConfig;
use zork_termux_installer::platform::PlatformContext;
use zork_termux_installer::resolver::Resolver;
use zork_termux_installer::test_utils::{PackageFixture, StubBuild, StubToolchainRunner};

fn drain_matching(logger: &mut Logger, level: log::Level, needle: &str) -> bool {
    let mut found = false;
    while let Some(record) = logger.pop() {
        if record.level() == level && record.args().to_string().contains(needle) {
            found = true;
        }
    }
    found
}

#[test]
fn resolution_logs_advisory_and_fatal_outcome() {
    let mut logger = Logger::start();
    let fixture = PackageFixture::new();
    let platform = PlatformContext::new(None, Some(OsString::from("/usr")));
    let runner = StubToolchainRunner::new(StubBuild::SpawnFailure);

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let outcome = Resolver::new(fixture.layout(), &platform, &runner, BuildConfig::default())
        .resolve(&mut stdout, &mut stderr);
    assert_eq!(outcome.exit_outcome().code(), 1);

    let mut advised = false;
    let mut failed = false;
    while let Some(record) = logger.pop() {
        let message = record.args().to_string();
        assert!(
            record.level() > log::Level::Warn,
            "resolution records stay below warn so they do not echo stderr: {message}"
        );
        assert!(!message.contains("PlatformContext"), "record dumps state: {message}");
        advised |= message.contains("does not look like Termux");
        failed |= record.level() == log::Level::Info && message.contains("no_source_tree");
    }
    assert!(advised, "expected the platform advisory to be logged");
    assert!(failed, "expected the fatal outcome to be logged");

    fixture.write_bundled_binary(b"prebuilt");
    let termux = PlatformContext::new(Some(OsString::from("0.118.0")), None);
    let outcome = Resolver::new(fixture.layout(), &termux, &runner, BuildConfig::default())
        .resolve(&mut stdout, &mut stderr);
    assert_eq!(outcome.exit_outcome().code(), 0);
    assert!(
        !drain_matching(&mut logger, log::Level::Info, "resolution failed"),
        "fast path must not log a failure"
    );
}
