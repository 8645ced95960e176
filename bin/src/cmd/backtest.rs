//! Backtest command implementation.

use std::path::PathBuf;

use anyhow::Result;
use ronda_backends::{Backend, Device};
use ronda_data::write_csv;
use ronda_eval::report::{fold_records_frame, summary_frame};
use ronda_eval::{WalkForwardConfig, WindowMode, run_walk_forward};

use crate::RunArgs;
use crate::cmd::prepare::prepare;

pub(crate) struct BacktestArgs {
    pub(crate) run: RunArgs,
    pub(crate) backend: String,
    pub(crate) device: String,
    pub(crate) threshold: f64,
    pub(crate) purge_days: Option<usize>,
    pub(crate) embargo_days: usize,
    pub(crate) seed: u64,
    pub(crate) out_detail: PathBuf,
    pub(crate) out_summary: PathBuf,
    pub(crate) format: String,
}

/// Run the full walk-forward backtest and write both output tables.
pub(crate) fn run_backtest(args: &BacktestArgs) -> Result<()> {
    let config = WalkForwardConfig {
        train_window: args.run.train_window,
        test_window: args.run.test_window,
        step: args.run.step,
        horizon: args.run.horizon,
        purge_days: args.purge_days,
        embargo_days: args.embargo_days,
        backend: args.backend.parse::<Backend>()?,
        device: args.device.parse::<Device>()?,
        threshold: args.threshold,
        seed: args.seed,
        mode: args.run.mode.parse::<WindowMode>()?,
    };

    let panel = prepare(&args.run)?;
    let run = run_walk_forward(&config, &panel.features, &panel.labels)?;

    let mut detail = fold_records_frame(&run.folds)?;
    write_csv(&mut detail, &args.out_detail)?;
    let mut summary = summary_frame(&run.summary)?;
    write_csv(&mut summary, &args.out_summary)?;

    if args.format.eq_ignore_ascii_case("json") {
        println!("{}", serde_json::to_string_pretty(&run)?);
        return Ok(());
    }

    println!();
    println!("Walk-forward backtest");
    println!("  backend:    {} on {}", config.backend, config.device);
    println!("  universe:   {} symbols", panel.symbols.len());
    println!(
        "  windows:    train {} / test {} / step {} ({})",
        config.train_window, config.test_window, config.step, config.mode
    );
    println!(
        "  leakage:    purge {} / embargo {} (horizon {})",
        config.effective_purge_days(),
        config.embargo_days,
        config.horizon
    );
    println!();
    println!("  folds completed: {}", run.summary.folds_completed);
    let s = &run.summary;
    println!(
        "  direction accuracy: {:.4} ± {:.4}",
        s.direction_accuracy.mean, s.direction_accuracy.std
    );
    println!(
        "  return rmse:        {:.6} ± {:.6}",
        s.return_rmse.mean, s.return_rmse.std
    );
    println!(
        "  cumulative return:  {:.4} ± {:.4}",
        s.cumulative_return.mean, s.cumulative_return.std
    );
    println!(
        "  sharpe-like ratio:  {:.3} ± {:.3}",
        s.sharpe_like_ratio.mean, s.sharpe_like_ratio.std
    );
    println!();
    println!("  detail:  {}", args.out_detail.display());
    println!("  summary: {}", args.out_summary.display());

    Ok(())
}
