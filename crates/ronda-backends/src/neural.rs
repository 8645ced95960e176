//! Single-hidden-layer MLP backend.
//!
//! Inputs are standardized column-wise on the training slice, the hidden
//! layer uses tanh, and training is full-batch gradient descent from a
//! seeded initialization so repeated runs produce identical models. The
//! classifier head applies a sigmoid (log loss), the regressor head is
//! linear (squared loss).

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ronda_traits::{DirectionClassifier, Result, ReturnRegressor, RondaError};
use serde::{Deserialize, Serialize};

use crate::standardize::Standardizer;

/// Hyperparameters for the MLP backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpConfig {
    /// Hidden layer width.
    pub hidden: usize,
    /// Full-batch gradient descent epochs.
    pub epochs: usize,
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Seed for weight initialization.
    pub seed: u64,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            hidden: 16,
            epochs: 200,
            learning_rate: 0.05,
            seed: 42,
        }
    }
}

/// Fitted network state shared by both heads.
#[derive(Debug, Clone)]
struct Network {
    scaler: Standardizer,
    w1: Array2<f64>,
    b1: Array1<f64>,
    w2: Array1<f64>,
    b2: f64,
}

impl Network {
    /// Hidden activations for standardized inputs.
    fn hidden(&self, z: &Array2<f64>) -> Array2<f64> {
        let mut h = z.dot(&self.w1);
        h += &self.b1;
        h.mapv_inplace(f64::tanh);
        h
    }

    /// Raw pre-activation output for standardized inputs.
    fn raw_output(&self, z: &Array2<f64>) -> Array1<f64> {
        self.hidden(z).dot(&self.w2) + self.b2
    }
}

fn init_network(n_features: usize, config: &MlpConfig, scaler: Standardizer) -> Network {
    let mut rng = StdRng::seed_from_u64(config.seed);
    // Uniform(-s, s) with the fan-in scale keeps tanh out of saturation.
    let s1 = (1.0 / n_features.max(1) as f64).sqrt();
    let s2 = (1.0 / config.hidden.max(1) as f64).sqrt();

    let w1 = Array2::from_shape_fn((n_features, config.hidden), |_| rng.gen_range(-s1..s1));
    let w2 = Array1::from_shape_fn(config.hidden, |_| rng.gen_range(-s2..s2));
    Network {
        scaler,
        w1,
        b1: Array1::zeros(config.hidden),
        w2,
        b2: 0.0,
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// One gradient descent step on the output error `delta = prediction - target`
/// (in the raw-output space, which is the loss gradient for both the
/// sigmoid/log-loss head and the linear/squared-loss head).
fn descend(net: &mut Network, z: &Array2<f64>, delta: &Array1<f64>, learning_rate: f64) {
    let n = z.nrows() as f64;
    let h = net.hidden(z);

    // Output layer gradients.
    let grad_w2 = h.t().dot(delta) / n;
    let grad_b2 = delta.sum() / n;

    // Backpropagate through tanh: dh = delta * w2 * (1 - h^2).
    let mut dh = Array2::zeros(h.raw_dim());
    for i in 0..h.nrows() {
        for j in 0..h.ncols() {
            dh[[i, j]] = delta[i] * net.w2[j] * (1.0 - h[[i, j]] * h[[i, j]]);
        }
    }
    let grad_w1 = z.t().dot(&dh) / n;
    let grad_b1 = dh.sum_axis(ndarray::Axis(0)) / n;

    net.w1 -= &(grad_w1 * learning_rate);
    net.b1 -= &(grad_b1 * learning_rate);
    net.w2 -= &(grad_w2 * learning_rate);
    net.b2 -= grad_b2 * learning_rate;
}

fn check_fit_shapes(features: ArrayView2<'_, f64>, targets: ArrayView1<'_, f64>) -> Result<()> {
    if features.nrows() == 0 || targets.len() != features.nrows() {
        return Err(RondaError::ModelExecution(format!(
            "mlp: {} feature rows vs {} targets",
            features.nrows(),
            targets.len()
        )));
    }
    Ok(())
}

fn check_predict_shapes(net: &Network, features: ArrayView2<'_, f64>) -> Result<()> {
    if features.ncols() != net.w1.nrows() {
        return Err(RondaError::ModelExecution(format!(
            "mlp fitted on {} features, got {}",
            net.w1.nrows(),
            features.ncols()
        )));
    }
    Ok(())
}

/// MLP direction classifier with a sigmoid output head.
#[derive(Debug, Clone, Default)]
pub struct MlpClassifier {
    config: MlpConfig,
    network: Option<Network>,
}

impl MlpClassifier {
    /// Create a classifier with the given hyperparameters.
    pub const fn new(config: MlpConfig) -> Self {
        Self {
            config,
            network: None,
        }
    }
}

impl DirectionClassifier for MlpClassifier {
    fn fit(&mut self, features: ArrayView2<'_, f64>, labels: ArrayView1<'_, f64>) -> Result<()> {
        check_fit_shapes(features, labels)?;

        let scaler = Standardizer::fit(features);
        let z = scaler.transform(features);
        let mut net = init_network(features.ncols(), &self.config, scaler);

        for _ in 0..self.config.epochs {
            let raw = net.raw_output(&z);
            let delta: Array1<f64> =
                raw.iter().zip(labels.iter()).map(|(&r, &y)| sigmoid(r) - y).collect();
            descend(&mut net, &z, &delta, self.config.learning_rate);
        }

        self.network = Some(net);
        Ok(())
    }

    fn predict_up_probability(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let net = self
            .network
            .as_ref()
            .ok_or_else(|| RondaError::ModelExecution("mlp classifier is not fitted".to_string()))?;
        check_predict_shapes(net, features)?;
        let z = net.scaler.transform(features);
        Ok(net.raw_output(&z).mapv(sigmoid))
    }
}

/// MLP return regressor with a linear output head.
#[derive(Debug, Clone, Default)]
pub struct MlpRegressor {
    config: MlpConfig,
    network: Option<Network>,
}

impl MlpRegressor {
    /// Create a regressor with the given hyperparameters.
    pub const fn new(config: MlpConfig) -> Self {
        Self {
            config,
            network: None,
        }
    }
}

impl ReturnRegressor for MlpRegressor {
    fn fit(&mut self, features: ArrayView2<'_, f64>, targets: ArrayView1<'_, f64>) -> Result<()> {
        check_fit_shapes(features, targets)?;

        let scaler = Standardizer::fit(features);
        let z = scaler.transform(features);
        let mut net = init_network(features.ncols(), &self.config, scaler);

        for _ in 0..self.config.epochs {
            let raw = net.raw_output(&z);
            let delta: Array1<f64> =
                raw.iter().zip(targets.iter()).map(|(&r, &y)| r - y).collect();
            descend(&mut net, &z, &delta, self.config.learning_rate);
        }

        self.network = Some(net);
        Ok(())
    }

    fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let net = self
            .network
            .as_ref()
            .ok_or_else(|| RondaError::ModelExecution("mlp regressor is not fitted".to_string()))?;
        check_predict_shapes(net, features)?;
        let z = net.scaler.transform(features);
        Ok(net.raw_output(&z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_classifier_separable_problem() {
        let x = array![
            [-2.0, 1.0],
            [-1.5, 0.5],
            [-1.0, 1.5],
            [-0.5, 0.0],
            [0.5, -0.5],
            [1.0, -1.0],
            [1.5, 0.5],
            [2.0, -1.5]
        ];
        let y = array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];

        let mut clf = MlpClassifier::new(MlpConfig {
            epochs: 500,
            ..MlpConfig::default()
        });
        clf.fit(x.view(), y.view()).unwrap();
        let p = clf.predict_up_probability(x.view()).unwrap();
        for i in 0..4 {
            assert!(p[i] < 0.5, "row {i}: {}", p[i]);
        }
        for i in 4..8 {
            assert!(p[i] > 0.5, "row {i}: {}", p[i]);
        }
    }

    #[test]
    fn test_same_seed_same_predictions() {
        let x = array![[-1.0], [0.0], [1.0], [2.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];
        let mut a = MlpClassifier::default();
        let mut b = MlpClassifier::default();
        a.fit(x.view(), y.view()).unwrap();
        b.fit(x.view(), y.view()).unwrap();
        assert_eq!(
            a.predict_up_probability(x.view()).unwrap(),
            b.predict_up_probability(x.view()).unwrap()
        );
    }

    #[test]
    fn test_different_seed_different_weights() {
        let x = array![[-1.0, 0.3], [0.0, -0.2], [1.0, 0.8], [2.0, -0.6]];
        let y = array![0.0, 0.0, 1.0, 1.0];
        let mut a = MlpClassifier::new(MlpConfig { seed: 1, ..MlpConfig::default() });
        let mut b = MlpClassifier::new(MlpConfig { seed: 2, ..MlpConfig::default() });
        a.fit(x.view(), y.view()).unwrap();
        b.fit(x.view(), y.view()).unwrap();
        assert_ne!(
            a.predict_up_probability(x.view()).unwrap(),
            b.predict_up_probability(x.view()).unwrap()
        );
    }

    #[test]
    fn test_regressor_tracks_mean_level() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = array![0.01, 0.01, 0.01, 0.01];
        let mut reg = MlpRegressor::default();
        reg.fit(x.view(), y.view()).unwrap();
        let pred = reg.predict(x.view()).unwrap();
        for &p in &pred {
            assert!((p - 0.01).abs() < 5e-3, "prediction {p} far from target level");
        }
    }

    #[test]
    fn test_nan_features_stay_finite() {
        let x = array![[1.0], [f64::NAN], [3.0], [4.0]];
        let y = array![0.0, 1.0, 1.0, 0.0];
        let mut clf = MlpClassifier::default();
        clf.fit(x.view(), y.view()).unwrap();
        let p = clf.predict_up_probability(x.view()).unwrap();
        assert!(p.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_unfitted_predict_errors() {
        let clf = MlpClassifier::default();
        assert!(clf.predict_up_probability(array![[1.0]].view()).is_err());
    }

    #[test]
    fn test_feature_width_mismatch_errors() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0.0, 1.0, 0.0, 1.0];
        let mut clf = MlpClassifier::default();
        clf.fit(x.view(), y.view()).unwrap();
        assert!(clf.predict_up_probability(array![[1.0, 2.0]].view()).is_err());
    }
}
