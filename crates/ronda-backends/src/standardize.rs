//! Per-column feature standardization for the neural backend.

use ndarray::{Array2, ArrayView2};

const MIN_STD: f64 = 1e-10;

/// Column-wise z-score transform fitted on a training slice.
///
/// NaN entries are excluded from the fitted statistics and map to 0.0
/// (the column mean) after transformation, so missing values carry no
/// signal.
#[derive(Debug, Clone)]
pub(crate) struct Standardizer {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl Standardizer {
    pub(crate) fn fit(features: ArrayView2<'_, f64>) -> Self {
        let n_cols = features.ncols();
        let mut means = vec![0.0; n_cols];
        let mut stds = vec![1.0; n_cols];

        for j in 0..n_cols {
            let finite: Vec<f64> = features
                .column(j)
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            if finite.is_empty() {
                continue;
            }
            let mean = finite.iter().sum::<f64>() / finite.len() as f64;
            let variance = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / finite.len() as f64;
            means[j] = mean;
            stds[j] = variance.sqrt().max(MIN_STD);
        }

        Self { means, stds }
    }

    pub(crate) fn transform(&self, features: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut out = Array2::zeros((features.nrows(), features.ncols()));
        for i in 0..features.nrows() {
            for j in 0..features.ncols() {
                let v = features[[i, j]];
                out[[i, j]] = if v.is_finite() {
                    (v - self.means[j]) / self.stds[j]
                } else {
                    0.0
                };
            }
        }
        out
    }
}
