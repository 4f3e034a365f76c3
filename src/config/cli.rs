//! CLI argument parsing using clap

use crate::worker::RunConfig;
use clap::Parser;
use std::path::PathBuf;

/// SQLPulse - Weighted SQL query selection for stress runs
#[derive(Parser, Debug)]
#[command(name = "sqlpulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Query mix configuration (JSON, or TOML with a .toml extension)
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Samples drawn by each worker
    #[arg(short = 'i', long, default_value = "10")]
    pub iterations: u64,

    /// Number of worker threads
    #[arg(short = 't', long, default_value = "1")]
    pub threads: usize,

    /// Base random seed (worker N uses seed + N)
    #[arg(long, env = "SQLPULSE_SEED")]
    pub seed: Option<u64>,

    /// Do not print rendered queries, only the summary
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Build the distribution, print its ranges and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Write the run summary as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub json_output: Option<PathBuf>,

    /// Keep sampling when a query batch fails
    #[arg(long)]
    pub continue_on_error: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.threads == 0 {
            anyhow::bail!("threads must be at least 1");
        }

        if self.iterations == 0 {
            anyhow::bail!("iterations must be at least 1");
        }

        Ok(())
    }

    /// Default log filter for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Worker settings derived from the arguments
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            threads: self.threads,
            iterations: self.iterations,
            seed: self.seed,
            continue_on_error: self.continue_on_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sqlpulse", "mix.json"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("mix.json"));
        assert_eq!(cli.iterations, 10);
        assert_eq!(cli.threads, 1);
        assert!(!cli.quiet);
        assert_eq!(cli.log_level(), "warn");
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_run_config() {
        let cli = Cli::try_parse_from([
            "sqlpulse", "mix.toml", "-i", "500", "-t", "4", "--seed", "9", "--continue-on-error", "-vv",
        ])
        .unwrap();

        assert_eq!(
            cli.run_config(),
            RunConfig {
                threads: 4,
                iterations: 500,
                seed: Some(9),
                continue_on_error: true,
            }
        );
        assert_eq!(cli.log_level(), "trace");
    }

    #[test]
    fn test_validate_threads() {
        let cli = Cli::try_parse_from(["sqlpulse", "mix.json", "--threads", "0"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_validate_iterations() {
        let cli = Cli::try_parse_from(["sqlpulse", "mix.json", "--iterations", "0"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_config_is_required() {
        assert!(Cli::try_parse_from(["sqlpulse"]).is_err());
    }
}
