//! Model contract traits for the fold trainer.
//!
//! The evaluation core is agnostic to the concrete model backend; it only
//! requires the two-call contract defined here: `fit` on a training slice,
//! then a prediction per test row. Backends are selected once at
//! configuration time and constructed fresh for every fold.

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::Result;

/// A trainable binary direction classifier.
///
/// Labels are encoded as `0.0` (down) and `1.0` (up). Implementations must
/// tolerate NaN feature values (treated as missing, not zero) and must be
/// deterministic for a fixed seed: fitting the same slice twice yields
/// bit-identical probabilities.
pub trait DirectionClassifier {
    /// Fit the classifier on a training slice.
    ///
    /// # Arguments
    ///
    /// * `features` - Training feature matrix, one row per observation
    /// * `labels` - Direction labels in {0.0, 1.0}, one per row
    fn fit(&mut self, features: ArrayView2<'_, f64>, labels: ArrayView1<'_, f64>) -> Result<()>;

    /// Calibrated probability of the positive (up) class for each test row.
    fn predict_up_probability(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>>;
}

/// A trainable forward-return regressor.
///
/// Same determinism and NaN-tolerance requirements as
/// [`DirectionClassifier`].
pub trait ReturnRegressor {
    /// Fit the regressor on a training slice.
    fn fit(&mut self, features: ArrayView2<'_, f64>, targets: ArrayView1<'_, f64>) -> Result<()>;

    /// Real-valued return prediction for each test row.
    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>>;
}
