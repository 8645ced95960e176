//! The validated configuration surface and the run loop.

use ronda_backends::{Backend, BackendFactory, Device};
use ronda_data::{AlignedPanel, FeatureMatrix, LabelTable};
use ronda_traits::{Result, RondaError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::fold::{FoldRecord, FoldSettings, evaluate_fold};
use crate::purge::default_purge_days;
use crate::split::{WalkForward, WindowMode};
use crate::summary::{Summary, summarize};

/// Full configuration of one walk-forward run.
///
/// Validated fail-fast by [`run_walk_forward`] before any fold executes;
/// the struct itself is inert data and serializes for run provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    /// Panel dates in each training window.
    pub train_window: usize,
    /// Panel dates in each test window.
    pub test_window: usize,
    /// Cursor advance between folds.
    pub step: usize,
    /// Label horizon in trading days.
    pub horizon: usize,
    /// Purge width; `None` derives `horizon - 1`.
    pub purge_days: Option<usize>,
    /// Embargo width after each test window.
    pub embargo_days: usize,
    /// Model backend identifier.
    pub backend: Backend,
    /// Compute device hint.
    pub device: Device,
    /// Up-probability decision threshold.
    pub threshold: f64,
    /// Seed for stochastic backends.
    pub seed: u64,
    /// Rolling or expanding training windows.
    pub mode: WindowMode,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            train_window: 252,
            test_window: 21,
            step: 21,
            horizon: 5,
            purge_days: None,
            embargo_days: 0,
            backend: Backend::Baseline,
            device: Device::Cpu,
            threshold: 0.5,
            seed: 42,
            mode: WindowMode::Rolling,
        }
    }
}

impl WalkForwardConfig {
    /// The purge width actually applied: explicit, or `horizon - 1`.
    pub const fn effective_purge_days(&self) -> usize {
        match self.purge_days {
            Some(days) => days,
            None => default_purge_days(self.horizon),
        }
    }

    /// Check every parameter that can be checked without data.
    pub fn validate(&self) -> Result<()> {
        if self.train_window == 0 {
            return Err(RondaError::InvalidConfig(
                "train_window must be positive".to_string(),
            ));
        }
        if self.test_window == 0 {
            return Err(RondaError::InvalidConfig(
                "test_window must be positive".to_string(),
            ));
        }
        if self.step == 0 {
            return Err(RondaError::InvalidConfig(
                "step must be positive".to_string(),
            ));
        }
        if self.horizon == 0 {
            return Err(RondaError::InvalidConfig(
                "horizon must be positive".to_string(),
            ));
        }
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(RondaError::InvalidConfig(format!(
                "threshold must be in [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// The complete output of one walk-forward run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRun {
    /// The configuration the run executed under.
    pub config: WalkForwardConfig,
    /// One record per completed fold, chronological.
    pub folds: Vec<FoldRecord>,
    /// Aggregate over the completed folds.
    pub summary: Summary,
}

/// Run a full walk-forward backtest over a feature matrix and label table.
///
/// # Errors
///
/// Fails before the first fold when the configuration is invalid, the
/// panel is too short to fit a single fold, or features and labels share
/// no observation keys. Per-fold degeneracies (fully purged training set,
/// empty slices, single-class labels) are recovered locally and reflected
/// in `folds_completed`, not raised.
pub fn run_walk_forward(
    config: &WalkForwardConfig,
    features: &FeatureMatrix,
    labels: &LabelTable,
) -> Result<BacktestRun> {
    config.validate()?;

    let index = features.panel_index();
    let needed = config.train_window + config.test_window;
    if index.len() < needed {
        return Err(RondaError::InvalidConfig(format!(
            "panel has {} dates but train_window + test_window needs {}",
            index.len(),
            needed
        )));
    }

    let panel = AlignedPanel::merge(features, labels, &index)?;
    let factory = BackendFactory::new(config.backend, config.device, config.seed);
    let settings = FoldSettings {
        purge_days: config.effective_purge_days(),
        embargo_days: config.embargo_days,
        threshold: config.threshold,
    };
    let generator = WalkForward {
        train_window: config.train_window,
        test_window: config.test_window,
        step: config.step,
        mode: config.mode,
    };

    let folds = generator.folds(&index);
    info!(
        backend = %config.backend,
        folds = folds.len(),
        panel_dates = index.len(),
        observations = panel.n_rows(),
        purge_days = settings.purge_days,
        embargo_days = settings.embargo_days,
        "starting walk-forward run"
    );

    let mut records = Vec::with_capacity(folds.len());
    for fold in &folds {
        if let Some(record) = evaluate_fold(&panel, &index, fold, &factory, &settings)? {
            info!(
                fold = record.fold_number,
                test_start = %record.test_start,
                accuracy = record.direction_accuracy,
                cumulative_return = record.cumulative_return,
                "fold complete"
            );
            records.push(record);
        }
    }

    let summary = summarize(&records);
    info!(
        folds_completed = summary.folds_completed,
        mean_accuracy = summary.direction_accuracy.mean,
        "walk-forward run finished"
    );

    Ok(BacktestRun {
        config: config.clone(),
        folds: records,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use ronda_traits::Date;

    fn d(day0: u32) -> Date {
        Date::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(u64::from(day0))
    }

    fn panel_inputs(n: usize) -> (FeatureMatrix, LabelTable) {
        let dates: Vec<Date> = (0..n as u32).map(d).collect();
        let symbols = vec!["A".to_string(); n];
        let values = Array2::from_shape_fn((n, 2), |(i, j)| ((i * 7 + j * 3) % 11) as f64);
        let features = FeatureMatrix::new(
            symbols.clone(),
            dates.clone(),
            vec!["f0".into(), "f1".into()],
            values,
        )
        .unwrap();

        let direction: Vec<f64> = (0..n).map(|i| if i % 3 == 0 { 0.0 } else { 1.0 }).collect();
        let forward_return: Vec<f64> = direction
            .iter()
            .map(|&dir| if dir >= 0.5 { 0.01 } else { -0.005 })
            .collect();
        let labels = LabelTable::new(symbols, dates, direction, forward_return, 2).unwrap();
        (features, labels)
    }

    fn small_config() -> WalkForwardConfig {
        WalkForwardConfig {
            train_window: 10,
            test_window: 3,
            step: 3,
            horizon: 2,
            ..WalkForwardConfig::default()
        }
    }

    #[test]
    fn test_run_produces_folds_and_summary() {
        let (features, labels) = panel_inputs(30);
        let run = run_walk_forward(&small_config(), &features, &labels).unwrap();
        assert!(!run.folds.is_empty());
        assert_eq!(run.summary.folds_completed, run.folds.len());
        for pair in run.folds.windows(2) {
            assert!(pair[0].test_start < pair[1].test_start);
        }
    }

    #[test]
    fn test_short_panel_is_config_error() {
        let (features, labels) = panel_inputs(8);
        let err = run_walk_forward(&small_config(), &features, &labels).unwrap_err();
        assert!(matches!(err, RondaError::InvalidConfig(_)));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let (features, labels) = panel_inputs(30);
        let config = WalkForwardConfig {
            threshold: 1.5,
            ..small_config()
        };
        assert!(run_walk_forward(&config, &features, &labels).is_err());
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = WalkForwardConfig {
            train_window: 0,
            ..small_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_purge_defaults_to_horizon_minus_one() {
        let config = WalkForwardConfig {
            horizon: 5,
            purge_days: None,
            ..WalkForwardConfig::default()
        };
        assert_eq!(config.effective_purge_days(), 4);
        let explicit = WalkForwardConfig {
            purge_days: Some(10),
            ..config
        };
        assert_eq!(explicit.effective_purge_days(), 10);
    }

    #[test]
    fn test_all_folds_skipped_yields_nan_summary() {
        let (features, labels) = panel_inputs(30);
        let config = WalkForwardConfig {
            purge_days: Some(100),
            ..small_config()
        };
        let run = run_walk_forward(&config, &features, &labels).unwrap();
        assert!(run.folds.is_empty());
        assert_eq!(run.summary.folds_completed, 0);
        assert!(run.summary.direction_accuracy.mean.is_nan());
    }

    #[test]
    fn test_same_config_same_results() {
        let (features, labels) = panel_inputs(40);
        let config = WalkForwardConfig {
            backend: Backend::NeuralNet,
            ..small_config()
        };
        let a = run_walk_forward(&config, &features, &labels).unwrap();
        let b = run_walk_forward(&config, &features, &labels).unwrap();
        assert_eq!(a.folds, b.folds);
    }
}
