//! pyATS installer - Main entry point

use anyhow::{Context, Result};
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use pyats_installer::cli::Cli;
use pyats_installer::{
    Catalog, CommandExecutor, Confirmation, DryRunExecutor, FixedConfirmation, InstallOutcome,
    InstallRequest, Installer, InstallerError, PythonInspector, ShellExecutor, StdinConfirmation,
};

/// Initialize the logger. Logs go to stderr so they never mix with relayed pip output.
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logger(cli.verbose);
    debug!(?cli, "CLI arguments parsed");

    // Ensure pip is torn down with us on Ctrl+C
    if let Err(e) = pyats_installer::process_guard::init_signal_handlers() {
        warn!("Failed to initialize signal handlers: {}", e);
    }

    match run(&cli) {
        Ok(outcome) => {
            info!(?outcome, "finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = ?e, "run failed");
            eprintln!("✗ {:#}", e);
            let code = e
                .downcast_ref::<InstallerError>()
                .map_or(1, InstallerError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(cli: &Cli) -> Result<InstallOutcome> {
    let catalog = match &cli.catalog {
        Some(path) => {
            info!("Loading catalog from: {:?}", path);
            Catalog::load_from_file(path)?
        }
        None => Catalog::builtin(),
    };

    let request = cli.request();
    let inspector = PythonInspector::new(&cli.python, catalog.layout_boundary);

    if cli.dry_run {
        execute(
            cli,
            catalog,
            &request,
            inspector,
            FixedConfirmation(true),
            DryRunExecutor::new(std::io::stdout()),
        )
    } else {
        execute(
            cli,
            catalog,
            &request,
            inspector,
            StdinConfirmation,
            ShellExecutor::stdout(),
        )
    }
}

fn execute<C: Confirmation, E: CommandExecutor>(
    cli: &Cli,
    catalog: Catalog,
    request: &InstallRequest,
    inspector: PythonInspector,
    confirmation: C,
    executor: E,
) -> Result<InstallOutcome> {
    let mut installer = Installer::new(
        catalog,
        &cli.pip,
        inspector,
        confirmation,
        executor,
        std::io::stdout(),
    );
    installer
        .run(request)
        .context("Installation did not complete")
}
