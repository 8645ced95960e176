//! Per-fold model training and evaluation.

use std::collections::HashSet;

use ronda_backends::{BackendFactory, MostFrequentClassifier};
use ronda_data::{AlignedPanel, PanelIndex};
use ronda_traits::{Date, DirectionClassifier, Result, RondaError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::metrics;
use crate::purge::purge_embargo;
use crate::split::Fold;

/// Per-fold knobs the evaluator needs beyond the fold itself.
#[derive(Debug, Clone, Copy)]
pub struct FoldSettings {
    /// Training positions within this many panel dates before the test
    /// window are dropped.
    pub purge_days: usize,
    /// Training positions within this many panel dates after the test
    /// window are dropped.
    pub embargo_days: usize,
    /// Up-probability decision threshold in `[0, 1]`.
    pub threshold: f64,
}

/// The immutable result of one evaluated fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldRecord {
    /// 1-based fold number.
    pub fold_number: usize,
    /// First training date after purging.
    pub train_start: Date,
    /// Last training date after purging.
    pub train_end: Date,
    /// First test date.
    pub test_start: Date,
    /// Last test date.
    pub test_end: Date,
    /// Fraction of test rows with the direction called correctly.
    pub direction_accuracy: f64,
    /// RMSE of predicted vs actual forward returns.
    pub return_rmse: f64,
    /// Sum of signed per-row strategy returns.
    pub cumulative_return: f64,
    /// Scale-adjusted mean/std of the strategy return series.
    pub sharpe_like_ratio: f64,
    /// Observation rows in the purged training slice.
    pub train_rows: usize,
    /// Observation rows in the test slice.
    pub test_rows: usize,
}

fn position_of(index: &PanelIndex, date: Date) -> Result<usize> {
    index.position(date).ok_or_else(|| {
        RondaError::InvalidData(format!("fold date {date} is not in the panel index"))
    })
}

/// Train on the purged slice of one fold and evaluate on its test slice.
///
/// Returns `Ok(None)` when the fold is skipped: an empty purged training
/// set, or no observation rows landing in either slice. Backend `fit` and
/// `predict` failures propagate as errors.
pub fn evaluate_fold(
    panel: &AlignedPanel,
    index: &PanelIndex,
    fold: &Fold,
    factory: &BackendFactory,
    settings: &FoldSettings,
) -> Result<Option<FoldRecord>> {
    let (Some(&test_first), Some(&test_last)) =
        (fold.test_dates.first(), fold.test_dates.last())
    else {
        return Ok(None);
    };
    let test_start = position_of(index, test_first)?;
    let test_end = position_of(index, test_last)?;

    let train_positions: Vec<usize> = fold
        .train_dates
        .iter()
        .map(|&d| position_of(index, d))
        .collect::<Result<_>>()?;

    let purged = purge_embargo(
        &train_positions,
        test_start,
        test_end,
        settings.purge_days,
        settings.embargo_days,
    );
    if purged.is_empty() {
        warn!(
            fold = fold.fold_number,
            purge_days = settings.purge_days,
            "skipping fold: purge removed every training date"
        );
        return Ok(None);
    }

    let purged_set: HashSet<usize> = purged.iter().copied().collect();
    let test_set: HashSet<usize> = (test_start..=test_end).collect();
    let train_rows = panel.rows_at_positions(&purged_set);
    let test_rows = panel.rows_at_positions(&test_set);
    if train_rows.is_empty() || test_rows.is_empty() {
        warn!(
            fold = fold.fold_number,
            train_rows = train_rows.len(),
            test_rows = test_rows.len(),
            "skipping fold: no observations in a slice"
        );
        return Ok(None);
    }

    let x_train = panel.feature_rows(&train_rows);
    let y_dir = panel.direction_rows(&train_rows);
    let y_ret = panel.return_rows(&train_rows);
    let x_test = panel.feature_rows(&test_rows);
    let actual_dir = panel.direction_rows(&test_rows);
    let actual_ret = panel.return_rows(&test_rows);

    // A single-class training slice defeats probabilistic classifiers;
    // substitute the constant baseline instead of failing the fold.
    let ups = y_dir.iter().filter(|&&y| y >= 0.5).count();
    let classifier: Box<dyn DirectionClassifier> = if ups == 0 || ups == y_dir.len() {
        let class = if ups == 0 { 0.0 } else { 1.0 };
        warn!(
            fold = fold.fold_number,
            class, "single-class training labels, using constant classifier"
        );
        Box::new(MostFrequentClassifier::constant(class))
    } else {
        let mut clf = factory.classifier();
        clf.fit(x_train.view(), y_dir.view())?;
        clf
    };

    let mut regressor = factory.regressor();
    regressor.fit(x_train.view(), y_ret.view())?;

    let p_up = classifier.predict_up_probability(x_test.view())?;
    let pred_ret = regressor.predict(x_test.view())?;

    let pred_dir = metrics::predicted_directions(p_up.view(), settings.threshold);
    let strategy = metrics::strategy_returns(actual_ret.view(), pred_dir.view());

    let purged_first = index.date_at(*purged.iter().min().unwrap_or(&0));
    let purged_last = index.date_at(*purged.iter().max().unwrap_or(&0));
    let (Some(train_start), Some(train_end)) = (purged_first, purged_last) else {
        return Ok(None);
    };

    Ok(Some(FoldRecord {
        fold_number: fold.fold_number,
        train_start,
        train_end,
        test_start: test_first,
        test_end: test_last,
        direction_accuracy: metrics::direction_accuracy(pred_dir.view(), actual_dir.view()),
        return_rmse: metrics::return_rmse(actual_ret.view(), pred_ret.view()),
        cumulative_return: metrics::cumulative_return(strategy.view()),
        sharpe_like_ratio: metrics::sharpe_like(strategy.view(), fold.test_dates.len()),
        train_rows: train_rows.len(),
        test_rows: test_rows.len(),
    }))
}
