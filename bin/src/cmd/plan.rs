//! Plan command implementation.

use anyhow::Result;
use ronda_eval::{WalkForward, WindowMode};

use crate::RunArgs;
use crate::cmd::prepare::prepare;

/// Print the fold plan for a price panel without training anything.
pub(crate) fn show_plan(args: &RunArgs) -> Result<()> {
    let mode = args.mode.parse::<WindowMode>()?;
    let panel = prepare(args)?;
    let index = panel.features.panel_index();

    let folds = WalkForward {
        train_window: args.train_window,
        test_window: args.test_window,
        step: args.step,
        mode,
    }
    .folds(&index);

    println!();
    println!(
        "Fold plan: {} panel dates, {} symbols, train {} / test {} / step {} ({mode})",
        index.len(),
        panel.symbols.len(),
        args.train_window,
        args.test_window,
        args.step,
    );
    if folds.is_empty() {
        println!("  no fold fits this panel");
        return Ok(());
    }
    for fold in &folds {
        // Generated folds always carry non-empty windows.
        let (Some(ts), Some(te)) = (fold.train_dates.first(), fold.train_dates.last()) else {
            continue;
        };
        let (Some(vs), Some(ve)) = (fold.test_dates.first(), fold.test_dates.last()) else {
            continue;
        };
        println!(
            "  fold {:>3}: train {ts} .. {te} ({} dates) | test {vs} .. {ve} ({} dates)",
            fold.fold_number,
            fold.train_dates.len(),
            fold.test_dates.len(),
        );
    }
    Ok(())
}
