//! rinse: strips types and lowers JSX and modules to plain JavaScript.

mod cli;
mod config;
mod runner;

use clap::Parser;
use cli::Args;
use miette::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let options = config::load_options(&args)?;
    let jobs = runner::discover(&args)?;
    if jobs.is_empty() {
        eprintln!("No input files found.");
        return Ok(());
    }

    let summary = runner::run(&jobs, &options, args.source_maps);
    let failed = summary.failures.len();
    for failure in summary.failures {
        eprintln!("{:?}", miette::Report::new(failure));
    }
    if failed > 0 {
        eprintln!("{failed} of {} files failed to transform.", jobs.len());
        std::process::exit(1);
    }
    Ok(())
}

/// Logs go to stderr, filtered by `RINSE_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("RINSE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
