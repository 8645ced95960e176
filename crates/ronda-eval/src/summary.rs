//! Aggregation of completed folds.

use ronda_traits::stats::{MeanStd, mean_std};
use serde::{Deserialize, Serialize};

use crate::fold::FoldRecord;

/// Mean and dispersion of each fold metric over the completed folds.
///
/// Skipped folds contribute nothing; zero completed folds produces an
/// all-NaN summary rather than an error, so a degenerate run is still
/// reportable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of folds that produced a record.
    pub folds_completed: usize,
    /// Direction accuracy across folds.
    pub direction_accuracy: MeanStd,
    /// Return RMSE across folds.
    pub return_rmse: MeanStd,
    /// Cumulative strategy return across folds.
    pub cumulative_return: MeanStd,
    /// Sharpe-like ratio across folds.
    pub sharpe_like_ratio: MeanStd,
}

impl Summary {
    /// The summary of a run where every fold was skipped.
    pub const EMPTY: Self = Self {
        folds_completed: 0,
        direction_accuracy: MeanStd::NAN,
        return_rmse: MeanStd::NAN,
        cumulative_return: MeanStd::NAN,
        sharpe_like_ratio: MeanStd::NAN,
    };
}

/// Aggregate fold records into a [`Summary`].
pub fn summarize(records: &[FoldRecord]) -> Summary {
    if records.is_empty() {
        return Summary::EMPTY;
    }

    let collect = |f: fn(&FoldRecord) -> f64| -> MeanStd {
        let values: Vec<f64> = records.iter().map(f).collect();
        mean_std(&values)
    };

    Summary {
        folds_completed: records.len(),
        direction_accuracy: collect(|r| r.direction_accuracy),
        return_rmse: collect(|r| r.return_rmse),
        cumulative_return: collect(|r| r.cumulative_return),
        sharpe_like_ratio: collect(|r| r.sharpe_like_ratio),
    }
}
