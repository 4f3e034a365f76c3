//! SQLPulse CLI entry point

use anyhow::{Context, Result};
use sqlpulse::config::{self, cli::Cli, validator};
use sqlpulse::distribution::DistributionIndex;
use sqlpulse::engine::{NullEngine, StdoutEngine};
use sqlpulse::output::{self, RunSummary};
use sqlpulse::worker::run_workers;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    cli.validate()?;
    init_tracing(cli.log_level());

    let config = config::load_config(&cli.config)?;
    validator::validate_config(&config).context("Configuration validation failed")?;

    let index = DistributionIndex::build(&config)
        .with_context(|| format!("Invalid query configuration: {}", cli.config.display()))?;

    if cli.dry_run {
        output::text::print_ranges(&index);
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    let run_config = cli.run_config();
    let start = Instant::now();
    let stats = if cli.quiet {
        run_workers(&index, &run_config, |_| NullEngine)?
    } else {
        run_workers(&index, &run_config, |_| StdoutEngine::new())?
    };
    let elapsed = start.elapsed();

    let summary = RunSummary::new(&index, &stats, elapsed);
    if !cli.quiet {
        println!();
    }
    output::text::print_summary(&summary);

    if let Some(ref path) = cli.json_output {
        output::json::write_summary(path, &summary, true)?;
        println!();
        println!("JSON summary written to {}", path.display());
    }

    Ok(())
}

/// Log to stderr; RUST_LOG overrides the verbosity flags
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("Unable to set up logging: {}", e);
    }
}
