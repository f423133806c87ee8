//! Unit tests for top-level resolution.

use super::*;
use crate::artefact::Provenance;
use crate::error::REINSTALL_COMMAND;
use crate::platform::TERMUX_PREFIX;
use crate::test_utils::{PackageFixture, StubBuild, StubToolchainRunner};
use crate::toolchain::MockToolchainRunner;
use rstest::{fixture, rstest};
use std::ffi::OsString;

#[fixture]
fn package() -> PackageFixture {
    PackageFixture::new()
}

fn termux() -> PlatformContext {
    PlatformContext::new(Some(OsString::from("0.118.0")), None)
}

fn desktop() -> PlatformContext {
    PlatformContext::new(None, Some(OsString::from("/usr")))
}

/// Captured stdout and stderr from one run.
struct Run {
    outcome: ResolveOutcome,
    stdout: String,
    stderr: String,
}

fn resolve_with(
    package: &PackageFixture,
    platform: &PlatformContext,
    runner: &dyn ToolchainRunner,
) -> Run {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let outcome = Resolver::new(package.layout(), platform, runner, BuildConfig::default())
        .resolve(&mut stdout, &mut stderr);
    Run {
        outcome,
        stdout: String::from_utf8(stdout).expect("stdout UTF-8"),
        stderr: String::from_utf8(stderr).expect("stderr UTF-8"),
    }
}

#[rstest]
fn bundled_binary_skips_the_build(package: PackageFixture) {
    let bundled = package.write_bundled_binary(b"prebuilt");
    let mut runner = MockToolchainRunner::new();
    runner.expect_run().never();

    let run = resolve_with(&package, &termux(), &runner);

    assert_eq!(run.outcome.exit_outcome(), ExitOutcome::Success);
    assert_eq!(
        run.stdout,
        format!("[zork-termux] Using packaged binary: {bundled}\n")
    );
    assert!(run.stderr.is_empty(), "stderr: {}", run.stderr);
}

#[cfg(unix)]
#[rstest]
fn bundled_binary_is_made_executable(package: PackageFixture) {
    use std::os::unix::fs::PermissionsExt;

    let bundled = package.write_bundled_binary(b"prebuilt");
    std::fs::set_permissions(&bundled, std::fs::Permissions::from_mode(0o644))
        .expect("reset mode");
    let runner = StubToolchainRunner::new(StubBuild::ExitCode(1));

    let run = resolve_with(&package, &termux(), &runner);

    assert!(matches!(run.outcome, ResolveOutcome::Bundled(_)));
    let mode = std::fs::metadata(&bundled)
        .expect("metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[rstest]
fn missing_source_tree_exits_with_reinstall_hint(package: PackageFixture) {
    let runner = StubToolchainRunner::new(StubBuild::ExitCode(1));

    let run = resolve_with(&package, &termux(), &runner);

    assert_eq!(run.outcome.exit_outcome(), ExitOutcome::Failure);
    match &run.outcome {
        ResolveOutcome::Built(outcome) => assert_eq!(outcome.reason_code(), Some("no_source_tree")),
        other => panic!("expected build outcome, got {other:?}"),
    }
    assert!(runner.invocations().is_empty());
    assert!(
        !run.stdout.contains("building from source"),
        "stdout: {}",
        run.stdout
    );
    assert_eq!(
        run.stderr,
        format!(
            concat!(
                "[zork-termux] missing packaged binary prebuilt/zork-termux and no source tree ",
                "at {}; reinstall a release with a packaged binary: ",
                "npm i -g @mmmbuto/zork-termux@latest\n",
            ),
            package.layout().source_manifest()
        )
    );
}

#[rstest]
fn successful_build_installs_the_binary(package: PackageFixture) {
    package.write_source_manifest();
    let runner = StubToolchainRunner::new(StubBuild::Succeed {
        outputs: vec![package.layout().primary_build_output()],
    });

    let run = resolve_with(&package, &termux(), &runner);

    match &run.outcome {
        ResolveOutcome::Built(BuildOutcome::Installed(location)) => {
            assert_eq!(location.provenance(), Provenance::Built);
        }
        other => panic!("expected installed build, got {other:?}"),
    }
    let bundled = package.layout().bundled_binary();
    assert!(bundled.is_file());
    assert!(run.stdout.contains("building from source with cargo"));
    assert!(
        run.stdout
            .contains(&format!("Installed built binary: {bundled}"))
    );

    let invocations = runner.invocations();
    assert_eq!(invocations.len(), 1);
    let invocation = invocations.first().expect("one invocation");
    assert_eq!(invocation.working_dir(), package.repo_root());
}

#[rstest]
fn second_run_after_build_takes_the_fast_path(package: PackageFixture) {
    package.write_source_manifest();
    let runner = StubToolchainRunner::new(StubBuild::Succeed {
        outputs: vec![package.layout().primary_build_output()],
    });

    let first = resolve_with(&package, &termux(), &runner);
    let second = resolve_with(&package, &termux(), &runner);

    assert!(matches!(
        first.outcome,
        ResolveOutcome::Built(BuildOutcome::Installed(_))
    ));
    assert!(matches!(second.outcome, ResolveOutcome::Bundled(_)));
    assert_eq!(runner.invocations().len(), 1);
}

#[rstest]
#[case::non_zero_exit(StubBuild::ExitCode(101))]
#[case::missing_cargo(StubBuild::SpawnFailure)]
fn toolchain_failure_prints_rust_hint(package: PackageFixture, #[case] behaviour: StubBuild) {
    package.write_source_manifest();
    let runner = StubToolchainRunner::new(behaviour);

    let run = resolve_with(&package, &termux(), &runner);

    assert_eq!(run.outcome.exit_outcome(), ExitOutcome::Failure);
    assert!(run.stderr.contains("cargo build failed"), "stderr: {}", run.stderr);
    assert!(run.stderr.contains("pkg install rust"));
    assert!(run.stderr.contains(REINSTALL_COMMAND));
    assert!(!package.layout().bundled_binary().exists());
}

#[rstest]
fn build_without_outputs_reports_searched_paths(package: PackageFixture) {
    package.write_source_manifest();
    let runner = StubToolchainRunner::new(StubBuild::Succeed { outputs: vec![] });

    let run = resolve_with(&package, &termux(), &runner);

    assert_eq!(run.outcome.exit_outcome(), ExitOutcome::Failure);
    let primary = package.layout().primary_build_output();
    assert!(run.stderr.contains(primary.as_str()), "stderr: {}", run.stderr);
}

#[rstest]
fn binary_not_found_after_build_suggests_reinstall(package: PackageFixture) {
    package.write_source_manifest();
    let runner = StubToolchainRunner::new(StubBuild::Succeed { outputs: vec![] });

    let run = resolve_with(&package, &termux(), &runner);

    match &run.outcome {
        ResolveOutcome::Built(outcome) => {
            assert_eq!(outcome.reason_code(), Some("binary_not_found_after_build"));
        }
        other => panic!("expected build outcome, got {other:?}"),
    }
    assert!(run.stderr.contains(REINSTALL_COMMAND), "stderr: {}", run.stderr);
    assert!(run.stdout.contains("building from source with cargo"));
}

#[rstest]
#[case::termux_version(PlatformContext::new(Some(OsString::from("0.118.0")), None), false)]
#[case::termux_prefix(PlatformContext::new(None, Some(OsString::from(TERMUX_PREFIX))), false)]
#[case::desktop(desktop(), true)]
fn advisory_is_printed_only_off_termux(
    package: PackageFixture,
    #[case] platform: PlatformContext,
    #[case] expect_advisory: bool,
) {
    package.write_bundled_binary(b"prebuilt");
    let runner = StubToolchainRunner::new(StubBuild::ExitCode(1));

    let run = resolve_with(&package, &platform, &runner);

    assert_eq!(run.outcome.exit_outcome(), ExitOutcome::Success);
    assert_eq!(
        run.stderr.contains("designed for Android Termux"),
        expect_advisory
    );
}

#[test]
fn exit_codes_are_zero_and_one() {
    assert_eq!(ExitOutcome::Success.code(), 0);
    assert_eq!(ExitOutcome::Failure.code(), 1);
}
