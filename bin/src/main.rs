//! Ronda CLI binary.
//!
//! Runs the walk-forward pipeline from a local daily price Parquet file:
//! validate, cherry-pick the universe, build features and labels,
//! evaluate folds, write the detail and summary tables.

mod cmd;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ronda")]
#[command(about = "Leakage-safe walk-forward backtests on daily equity panels", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Shared windowing and model arguments.
#[derive(Debug, clap::Args)]
pub(crate) struct RunArgs {
    /// Daily price Parquet file (symbol, date, open, high, low, close, volume)
    #[arg(long)]
    pub(crate) prices: PathBuf,

    /// Training window in panel dates
    #[arg(long, default_value = "252")]
    pub(crate) train_window: usize,

    /// Test window in panel dates
    #[arg(long, default_value = "21")]
    pub(crate) test_window: usize,

    /// Cursor advance between folds
    #[arg(long, default_value = "21")]
    pub(crate) step: usize,

    /// Label horizon in trading days
    #[arg(short = 'H', long, default_value = "5")]
    pub(crate) horizon: usize,

    /// Window mode (rolling or expanding)
    #[arg(long, default_value = "rolling")]
    pub(crate) mode: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a walk-forward backtest and write fold/summary tables
    Backtest {
        #[command(flatten)]
        run: RunArgs,

        /// Model backend (baseline, boosted-trees, neural-net)
        #[arg(short, long, default_value = "baseline")]
        backend: String,

        /// Compute device hint (cpu or accelerator)
        #[arg(long, default_value = "cpu")]
        device: String,

        /// Up-probability decision threshold
        #[arg(long, default_value = "0.5")]
        threshold: f64,

        /// Purge width in panel dates (default: horizon - 1)
        #[arg(long)]
        purge_days: Option<usize>,

        /// Embargo width in panel dates after each test window
        #[arg(long, default_value = "0")]
        embargo_days: usize,

        /// Seed for stochastic backends
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Per-fold output CSV
        #[arg(long, default_value = "wf_folds.csv")]
        out_detail: PathBuf,

        /// Summary output CSV
        #[arg(long, default_value = "wf_summary.csv")]
        out_summary: PathBuf,

        /// Console output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show the fold plan for a price panel without training anything
    Plan {
        #[command(flatten)]
        run: RunArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Backtest {
            run,
            backend,
            device,
            threshold,
            purge_days,
            embargo_days,
            seed,
            out_detail,
            out_summary,
            format,
        } => cmd::backtest::run_backtest(&cmd::backtest::BacktestArgs {
            run,
            backend,
            device,
            threshold,
            purge_days,
            embargo_days,
            seed,
            out_detail,
            out_summary,
            format,
        }),
        Commands::Plan { run } => cmd::plan::show_plan(&run),
    }
}
