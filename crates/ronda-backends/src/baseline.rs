//! Constant-predictor baseline backend.
//!
//! The most-frequent classifier and mean regressor ignore features
//! entirely. They exist as the deterministic reference every other backend
//! is compared against, and as the substitute the fold trainer falls back
//! to when a training slice carries a single label class.

use ndarray::{Array1, ArrayView1, ArrayView2};
use ronda_traits::{DirectionClassifier, Result, ReturnRegressor, RondaError};

/// Predicts the majority training class for every test row.
///
/// On a tie the down class (0.0) wins, so behavior is deterministic.
#[derive(Debug, Clone, Default)]
pub struct MostFrequentClassifier {
    class: Option<f64>,
}

impl MostFrequentClassifier {
    /// A classifier pinned to a fixed class, bypassing `fit`.
    ///
    /// Used by the fold trainer's single-class fallback.
    pub const fn constant(class: f64) -> Self {
        Self { class: Some(class) }
    }

    /// The fitted majority class, if any.
    pub const fn class(&self) -> Option<f64> {
        self.class
    }
}

impl DirectionClassifier for MostFrequentClassifier {
    fn fit(&mut self, _features: ArrayView2<'_, f64>, labels: ArrayView1<'_, f64>) -> Result<()> {
        let mut ups = 0usize;
        let mut downs = 0usize;
        for &label in labels {
            if !label.is_finite() {
                continue;
            }
            if label >= 0.5 {
                ups += 1;
            } else {
                downs += 1;
            }
        }
        if ups + downs == 0 {
            return Err(RondaError::ModelExecution(
                "cannot fit most-frequent classifier on empty labels".to_string(),
            ));
        }
        self.class = Some(if ups > downs { 1.0 } else { 0.0 });
        Ok(())
    }

    fn predict_up_probability(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let class = self.class.ok_or_else(|| {
            RondaError::ModelExecution("most-frequent classifier is not fitted".to_string())
        })?;
        Ok(Array1::from_elem(features.nrows(), class))
    }
}

/// Predicts the training-mean target for every test row.
#[derive(Debug, Clone, Default)]
pub struct MeanRegressor {
    mean: Option<f64>,
}

impl ReturnRegressor for MeanRegressor {
    fn fit(&mut self, _features: ArrayView2<'_, f64>, targets: ArrayView1<'_, f64>) -> Result<()> {
        let finite: Vec<f64> = targets.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Err(RondaError::ModelExecution(
                "cannot fit mean regressor on empty targets".to_string(),
            ));
        }
        self.mean = Some(finite.iter().sum::<f64>() / finite.len() as f64);
        Ok(())
    }

    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let mean = self.mean.ok_or_else(|| {
            RondaError::ModelExecution("mean regressor is not fitted".to_string())
        })?;
        Ok(Array1::from_elem(features.nrows(), mean))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    #[test]
    fn test_most_frequent_majority_up() {
        let mut clf = MostFrequentClassifier::default();
        let x = Array2::zeros((4, 2));
        clf.fit(x.view(), array![1.0, 1.0, 0.0, 1.0].view()).unwrap();
        let p = clf.predict_up_probability(x.view()).unwrap();
        assert!(p.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_most_frequent_tie_is_down() {
        let mut clf = MostFrequentClassifier::default();
        let x = Array2::zeros((2, 1));
        clf.fit(x.view(), array![1.0, 0.0].view()).unwrap();
        assert_eq!(clf.class(), Some(0.0));
    }

    #[test]
    fn test_most_frequent_unfitted_errors() {
        let clf = MostFrequentClassifier::default();
        let x = Array2::zeros((1, 1));
        assert!(clf.predict_up_probability(x.view()).is_err());
    }

    #[test]
    fn test_constant_classifier() {
        let clf = MostFrequentClassifier::constant(1.0);
        let x = Array2::zeros((3, 1));
        let p = clf.predict_up_probability(x.view()).unwrap();
        assert!(p.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_mean_regressor() {
        let mut reg = MeanRegressor::default();
        let x = Array2::zeros((3, 1));
        reg.fit(x.view(), array![0.01, 0.03, f64::NAN].view()).unwrap();
        let pred = reg.predict(x.view()).unwrap();
        assert_relative_eq!(pred[0], 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_mean_regressor_empty_targets() {
        let mut reg = MeanRegressor::default();
        let x = Array2::zeros((0, 1));
        assert!(reg.fit(x.view(), array![].view()).is_err());
    }

    #[test]
    fn test_refit_is_deterministic() {
        let x = Array2::zeros((3, 1));
        let y = array![1.0, 1.0, 0.0];
        let mut a = MostFrequentClassifier::default();
        let mut b = MostFrequentClassifier::default();
        a.fit(x.view(), y.view()).unwrap();
        b.fit(x.view(), y.view()).unwrap();
        assert_eq!(
            a.predict_up_probability(x.view()).unwrap(),
            b.predict_up_probability(x.view()).unwrap()
        );
    }
}
