use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use relief_runner::{Cli, Result, Runner};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    #[cfg(feature = "prometheus")]
    if let Some(addr) = cli.prometheus {
        relief_metrics::install_prometheus(addr)
            .map_err(|e| relief_runner::RunnerError::InvalidInput(format!("prometheus exporter: {}", e)))?;
        info!(%addr, "Serving Prometheus metrics");
    }

    let config = cli.into_config()?;
    let runner = Runner::new(config)?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    if let Err(e) = ctrlc::set_handler(move || {
        flag.store(true, Ordering::Relaxed);
    }) {
        warn!(error = %e, "Could not install Ctrl-C handler");
    }

    let tiles = runner.discover()?;
    info!(
        tiles = tiles.len(),
        workers = runner.config().workers,
        output = %runner.config().output.display(),
        "Starting run"
    );

    let summary = runner.run(&tiles, &cancel);
    for (coord, message) in &summary.failures {
        warn!(tile = %coord, "{}", message);
    }
    println!("{}", summary);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
