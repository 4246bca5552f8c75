//! fx-aggregator CLI - run one pipeline step
//!
//! ## Example Usage
//!
//! ```bash
//! # First run: backfill five years of history
//! fx-aggregator --api-key $KEY full-history
//!
//! # Daily: append the latest fixings
//! fx-aggregator --api-key $KEY daily-fix
//!
//! # Scheduled: log an intraday snapshot
//! FX_API_KEY=$KEY fx-aggregator intraday
//!
//! # Recompute realized volatility (no API key needed)
//! fx-aggregator vol
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use fx_aggregator::config::AggregatorConfig;
use fx_aggregator::data::ExchangeRatesClient;
use fx_aggregator::pairs::PairRegistry;
use fx_aggregator::sync::{DataPaths, Pipeline, StepOutcome};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

/// fx-aggregator: FX rate store and realized volatility
#[derive(Parser)]
#[command(name = "fx-aggregator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "FX aggregator - data pipeline", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured data directory
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Exchange rates API key
    #[arg(long, env = "FX_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Backfill the full history into daily.csv (no-op if it exists)
    FullHistory,

    /// Merge fixings since the last stored date into daily.csv
    DailyFix,

    /// Append a latest-rate snapshot to intraday.csv
    Intraday,

    /// Regenerate volatility.csv from daily.csv
    Vol,
}

impl Commands {
    fn needs_api_key(self) -> bool {
        !matches!(self, Commands::Vol)
    }

    fn label(self) -> &'static str {
        match self {
            Commands::FullHistory => "Fetching full history",
            Commands::DailyFix => "Updating daily fixings",
            Commands::Intraday => "Recording intraday snapshot",
            Commands::Vol => "Computing realized volatility",
        }
    }
}

/// Explicit path, then ./config.toml, then ~/.fx-aggregator/config.toml
fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let local = PathBuf::from("config.toml");
    if local.exists() {
        return Some(local);
    }

    dirs::home_dir()
        .map(|home| home.join(".fx-aggregator").join("config.toml"))
        .filter(|path| path.exists())
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = resolve_config_path(cli.config.as_deref())
        .context("No configuration found. Pass --config or create ./config.toml")?;
    let mut config = AggregatorConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    if cli.verbose {
        println!(
            "{} v{}",
            "fx-aggregator".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!("Config:   {}", config_path.display().to_string().dimmed());
        println!("Data dir: {}", config.data_dir.display().to_string().dimmed());
        println!("Pairs:    {}", config.pairs.len());
        println!();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(cli.command.label());

    let outcome = if cli.command.needs_api_key() {
        let api_key = cli
            .api_key
            .context("An API key is required: pass --api-key or set FX_API_KEY")?;
        let client = ExchangeRatesClient::new(&config.api, api_key)?;
        let pipeline = Pipeline::new(config, client)?;
        match cli.command {
            Commands::FullHistory => pipeline.full_history(),
            Commands::DailyFix => pipeline.daily_fixing(),
            Commands::Intraday => pipeline.intraday_snapshot(),
            Commands::Vol => pipeline.volatility(),
        }
    } else {
        config.validate()?;
        let registry = PairRegistry::new(config.pairs.clone());
        fx_aggregator::volatility::run(&registry, &DataPaths::new(&config.data_dir))
    };
    spinner.finish_and_clear();

    match outcome? {
        StepOutcome::Written { rows } => println!(
            "{} {} ({} rows)",
            "✓".green().bold(),
            cli.command.label(),
            rows
        ),
        StepOutcome::Skipped(reason) => println!("{} {}", "Skipped:".yellow(), reason),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["fx-aggregator", "--api-key", "k", "full-history"]).unwrap();
        assert_eq!(cli.command, Commands::FullHistory);
        assert_eq!(cli.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fx-aggregator",
            "daily-fix",
            "--config",
            "fx.toml",
            "--data-dir",
            "/tmp/fx",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.command, Commands::DailyFix);
        assert_eq!(cli.config, Some(PathBuf::from("fx.toml")));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/fx")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_vol_needs_no_key() {
        assert!(!Commands::Vol.needs_api_key());
        assert!(Commands::Intraday.needs_api_key());
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(Cli::try_parse_from(["fx-aggregator", "backtest"]).is_err());
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let path = resolve_config_path(Some(Path::new("custom.toml")));
        assert_eq!(path, Some(PathBuf::from("custom.toml")));
    }
}
