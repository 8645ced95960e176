//! Gradient-boosted tree backend.
//!
//! Depth-1 regression trees (stumps) boosted with Newton leaf values:
//! logistic loss for the direction classifier, squared loss for the return
//! regressor. Splits are chosen from quantile candidate thresholds, so
//! fitting is fully deterministic. Missing feature values route to the
//! left child.

use ndarray::{Array1, ArrayView1, ArrayView2};
use ronda_traits::{DirectionClassifier, Result, ReturnRegressor, RondaError};
use serde::{Deserialize, Serialize};

/// Hyperparameters for the gradient-boosted backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedConfig {
    /// Number of boosting rounds.
    pub n_rounds: usize,
    /// Shrinkage applied to every leaf value.
    pub learning_rate: f64,
    /// Maximum number of candidate thresholds per feature.
    pub max_bins: usize,
    /// L2 regularization added to leaf hessians.
    pub l2: f64,
}

impl Default for GradientBoostedConfig {
    fn default() -> Self {
        Self {
            n_rounds: 50,
            learning_rate: 0.1,
            max_bins: 16,
            l2: 1.0,
        }
    }
}

/// One boosted split: rows with `feature <= threshold` (or NaN) take the
/// left value, the rest the right value. Leaf values carry the learning
/// rate already applied.
#[derive(Debug, Clone)]
struct Stump {
    feature: usize,
    threshold: f64,
    left: f64,
    right: f64,
}

impl Stump {
    fn output(&self, row: ArrayView1<'_, f64>) -> f64 {
        let v = row[self.feature];
        // NaN fails the comparison and routes left with the low values.
        if !(v > self.threshold) { self.left } else { self.right }
    }
}

#[derive(Debug, Clone, Default)]
struct Ensemble {
    base: f64,
    stumps: Vec<Stump>,
    n_features: usize,
}

impl Ensemble {
    fn raw_score(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.base + self.stumps.iter().map(|s| s.output(row)).sum::<f64>()
    }
}

/// Candidate thresholds for one feature: midpoints between up to
/// `max_bins` quantile cuts of the finite values.
fn candidate_thresholds(values: &[f64], max_bins: usize) -> Vec<f64> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return Vec::new();
    }
    finite.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    finite.dedup();
    if finite.len() < 2 {
        return Vec::new();
    }

    let n_cuts = max_bins.min(finite.len() - 1);
    let mut thresholds = Vec::with_capacity(n_cuts);
    for k in 1..=n_cuts {
        let idx = k * (finite.len() - 1) / (n_cuts + 1);
        let threshold = f64::midpoint(finite[idx], finite[idx + 1]);
        if thresholds.last() != Some(&threshold) {
            thresholds.push(threshold);
        }
    }
    thresholds
}

/// Fit the stump maximizing the Newton gain over all features.
fn fit_stump(
    features: ArrayView2<'_, f64>,
    grad: &[f64],
    hess: &[f64],
    config: &GradientBoostedConfig,
) -> Option<Stump> {
    let total_g: f64 = grad.iter().sum();
    let total_h: f64 = hess.iter().sum();
    let base_score = total_g * total_g / (total_h + config.l2);

    let mut best: Option<(f64, Stump)> = None;

    for feature in 0..features.ncols() {
        let column: Vec<f64> = features.column(feature).to_vec();
        for threshold in candidate_thresholds(&column, config.max_bins) {
            let mut left_g = 0.0;
            let mut left_h = 0.0;
            for (i, &v) in column.iter().enumerate() {
                if !(v > threshold) {
                    left_g += grad[i];
                    left_h += hess[i];
                }
            }
            let right_g = total_g - left_g;
            let right_h = total_h - left_h;

            let gain = left_g * left_g / (left_h + config.l2)
                + right_g * right_g / (right_h + config.l2)
                - base_score;
            if gain <= 1e-12 {
                continue;
            }
            if best.as_ref().is_none_or(|(g, _)| gain > *g) {
                best = Some((
                    gain,
                    Stump {
                        feature,
                        threshold,
                        left: config.learning_rate * left_g / (left_h + config.l2),
                        right: config.learning_rate * right_g / (right_h + config.l2),
                    },
                ));
            }
        }
    }

    best.map(|(_, stump)| stump)
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Gradient-boosted direction classifier (logistic loss).
#[derive(Debug, Clone, Default)]
pub struct BoostedClassifier {
    config: GradientBoostedConfig,
    ensemble: Option<Ensemble>,
}

impl BoostedClassifier {
    /// Create a classifier with the given hyperparameters.
    pub const fn new(config: GradientBoostedConfig) -> Self {
        Self {
            config,
            ensemble: None,
        }
    }
}

impl DirectionClassifier for BoostedClassifier {
    fn fit(&mut self, features: ArrayView2<'_, f64>, labels: ArrayView1<'_, f64>) -> Result<()> {
        let n = features.nrows();
        if n == 0 || labels.len() != n {
            return Err(RondaError::ModelExecution(format!(
                "boosted classifier: {} feature rows vs {} labels",
                n,
                labels.len()
            )));
        }

        let up_rate = labels.iter().filter(|&&y| y >= 0.5).count() as f64 / n as f64;
        let p0 = up_rate.clamp(1e-6, 1.0 - 1e-6);
        let base = (p0 / (1.0 - p0)).ln();

        let mut ensemble = Ensemble {
            base,
            stumps: Vec::with_capacity(self.config.n_rounds),
            n_features: features.ncols(),
        };
        let mut scores = vec![base; n];

        for _ in 0..self.config.n_rounds {
            let mut grad = vec![0.0; n];
            let mut hess = vec![0.0; n];
            for i in 0..n {
                let p = sigmoid(scores[i]);
                grad[i] = labels[i] - p;
                hess[i] = (p * (1.0 - p)).max(1e-6);
            }

            let Some(stump) = fit_stump(features, &grad, &hess, &self.config) else {
                break;
            };
            for i in 0..n {
                scores[i] += stump.output(features.row(i));
            }
            ensemble.stumps.push(stump);
        }

        self.ensemble = Some(ensemble);
        Ok(())
    }

    fn predict_up_probability(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let ensemble = self.ensemble.as_ref().ok_or_else(|| {
            RondaError::ModelExecution("boosted classifier is not fitted".to_string())
        })?;
        if features.ncols() != ensemble.n_features {
            return Err(RondaError::ModelExecution(format!(
                "boosted classifier fitted on {} features, got {}",
                ensemble.n_features,
                features.ncols()
            )));
        }
        Ok((0..features.nrows())
            .map(|i| sigmoid(ensemble.raw_score(features.row(i))))
            .collect())
    }
}

/// Gradient-boosted return regressor (squared loss).
#[derive(Debug, Clone, Default)]
pub struct BoostedRegressor {
    config: GradientBoostedConfig,
    ensemble: Option<Ensemble>,
}

impl BoostedRegressor {
    /// Create a regressor with the given hyperparameters.
    pub const fn new(config: GradientBoostedConfig) -> Self {
        Self {
            config,
            ensemble: None,
        }
    }
}

impl ReturnRegressor for BoostedRegressor {
    fn fit(&mut self, features: ArrayView2<'_, f64>, targets: ArrayView1<'_, f64>) -> Result<()> {
        let n = features.nrows();
        if n == 0 || targets.len() != n {
            return Err(RondaError::ModelExecution(format!(
                "boosted regressor: {} feature rows vs {} targets",
                n,
                targets.len()
            )));
        }

        let base = targets.iter().sum::<f64>() / n as f64;
        let mut ensemble = Ensemble {
            base,
            stumps: Vec::with_capacity(self.config.n_rounds),
            n_features: features.ncols(),
        };
        let mut scores = vec![base; n];
        let hess = vec![1.0; n];

        for _ in 0..self.config.n_rounds {
            let grad: Vec<f64> = (0..n).map(|i| targets[i] - scores[i]).collect();
            let Some(stump) = fit_stump(features, &grad, &hess, &self.config) else {
                break;
            };
            for i in 0..n {
                scores[i] += stump.output(features.row(i));
            }
            ensemble.stumps.push(stump);
        }

        self.ensemble = Some(ensemble);
        Ok(())
    }

    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let ensemble = self.ensemble.as_ref().ok_or_else(|| {
            RondaError::ModelExecution("boosted regressor is not fitted".to_string())
        })?;
        if features.ncols() != ensemble.n_features {
            return Err(RondaError::ModelExecution(format!(
                "boosted regressor fitted on {} features, got {}",
                ensemble.n_features,
                features.ncols()
            )));
        }
        Ok((0..features.nrows())
            .map(|i| ensemble.raw_score(features.row(i)))
            .collect())
    }
}
