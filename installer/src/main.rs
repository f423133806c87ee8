//! zork-termux installer CLI entrypoint.
//!
//! Runs as the npm install hook: it adopts the packaged binary or builds one
//! from source. The `check-update` subcommand reports whether a newer release
//! is published and always exits successfully.

use clap::Parser;
use std::io::Write;
use zork_termux_installer::cli::{CheckUpdateArgs, Cli, Command, ResolveArgs};
use zork_termux_installer::error::Result;
use zork_termux_installer::output::write_status_line;
use zork_termux_installer::platform::PlatformContext;
use zork_termux_installer::registry::HttpRegistryTransport;
use zork_termux_installer::resolver::{ExitOutcome, Resolver};
use zork_termux_installer::toolchain::SystemToolchainRunner;
use zork_termux_installer::update::run_update_check;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<ExitOutcome> {
    match &cli.command {
        Some(Command::CheckUpdate(args)) => run_check_update(args, stdout),
        Some(Command::Resolve(_)) | None => run_resolve(cli.resolve_args(), stdout, stderr),
    }
}

fn run_resolve(
    args: &ResolveArgs,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<ExitOutcome> {
    let layout = args.layout()?;
    let platform = PlatformContext::from_env();
    let runner = SystemToolchainRunner;
    let outcome = Resolver::new(&layout, &platform, &runner, args.build_config())
        .resolve(stdout, stderr);
    Ok(outcome.exit_outcome())
}

/// The update check is informational; nothing it encounters fails the run.
fn run_check_update(args: &CheckUpdateArgs, stdout: &mut dyn Write) -> Result<ExitOutcome> {
    match args.layout() {
        Ok(layout) => {
            let transport = HttpRegistryTransport;
            run_update_check(
                &layout.package_manifest(),
                &transport,
                &args.registry_url,
                stdout,
            );
        }
        Err(err) => log::warn!("update check skipped: {err}"),
    }
    Ok(ExitOutcome::Success)
}

fn exit_code_for_run_result(result: Result<ExitOutcome>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(outcome) => outcome.code(),
        Err(err) => {
            write_status_line(stderr, err);
            ExitOutcome::Failure.code()
        }
    }
}
