//! Backend selection and construction.

use std::fmt;
use std::str::FromStr;

use ronda_traits::{DirectionClassifier, ReturnRegressor, RondaError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::baseline::{MeanRegressor, MostFrequentClassifier};
use crate::boosted::{BoostedClassifier, BoostedRegressor, GradientBoostedConfig};
use crate::neural::{MlpClassifier, MlpConfig, MlpRegressor};

/// Model family identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Most-frequent classifier and mean regressor.
    Baseline,
    /// Gradient-boosted depth-1 trees.
    GradientBoosted,
    /// Single-hidden-layer MLP.
    NeuralNet,
}

impl FromStr for Backend {
    type Err = RondaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baseline" => Ok(Self::Baseline),
            "boosted-trees" => Ok(Self::GradientBoosted),
            "neural-net" => Ok(Self::NeuralNet),
            other => Err(RondaError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Baseline => "baseline",
            Self::GradientBoosted => "boosted-trees",
            Self::NeuralNet => "neural-net",
        };
        f.write_str(name)
    }
}

/// Compute device requested for model training.
///
/// Every backend in this crate runs on the CPU; requesting the
/// accelerator logs a warning and falls back rather than failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Device {
    /// Host CPU.
    Cpu,
    /// Hardware accelerator, accepted for forward compatibility.
    Accelerator,
}

impl FromStr for Device {
    type Err = RondaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "accelerator" | "gpu" => Ok(Self::Accelerator),
            other => Err(RondaError::UnknownDevice(other.to_string())),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cpu => "cpu",
            Self::Accelerator => "accelerator",
        };
        f.write_str(name)
    }
}

/// Builds fresh classifier/regressor pairs for each fold.
///
/// Every fold gets its own model instances so no fitted state can leak
/// across fold boundaries.
#[derive(Debug, Clone)]
pub struct BackendFactory {
    backend: Backend,
    device: Device,
    seed: u64,
}

impl BackendFactory {
    /// Create a factory for the chosen backend and device.
    pub fn new(backend: Backend, device: Device, seed: u64) -> Self {
        if device == Device::Accelerator {
            warn!(
                backend = %backend,
                "accelerator requested but unavailable, training on cpu"
            );
        }
        Self {
            backend,
            device,
            seed,
        }
    }

    /// The selected model family.
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    /// The requested device.
    pub const fn device(&self) -> Device {
        self.device
    }

    /// A fresh, unfitted direction classifier.
    pub fn classifier(&self) -> Box<dyn DirectionClassifier> {
        match self.backend {
            Backend::Baseline => Box::new(MostFrequentClassifier::default()),
            Backend::GradientBoosted => {
                Box::new(BoostedClassifier::new(GradientBoostedConfig::default()))
            }
            Backend::NeuralNet => Box::new(MlpClassifier::new(MlpConfig {
                seed: self.seed,
                ..MlpConfig::default()
            })),
        }
    }

    /// A fresh, unfitted return regressor.
    pub fn regressor(&self) -> Box<dyn ReturnRegressor> {
        match self.backend {
            Backend::Baseline => Box::new(MeanRegressor::default()),
            Backend::GradientBoosted => {
                Box::new(BoostedRegressor::new(GradientBoostedConfig::default()))
            }
            Backend::NeuralNet => Box::new(MlpRegressor::new(MlpConfig {
                seed: self.seed,
                ..MlpConfig::default()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_backend_parse_roundtrip() {
        for backend in [Backend::Baseline, Backend::GradientBoosted, Backend::NeuralNet] {
            assert_eq!(backend.to_string().parse::<Backend>().unwrap(), backend);
        }
    }

    #[test]
    fn test_backend_unknown_rejected() {
        assert!("xgboost".parse::<Backend>().is_err());
    }

    #[test]
    fn test_device_gpu_alias() {
        assert_eq!("gpu".parse::<Device>().unwrap(), Device::Accelerator);
        assert_eq!("CPU".parse::<Device>().unwrap(), Device::Cpu);
        assert!("tpu".parse::<Device>().is_err());
    }

    #[test]
    fn test_factory_produces_fresh_models() {
        let factory = BackendFactory::new(Backend::Baseline, Device::Cpu, 42);
        let mut clf = factory.classifier();
        let x = array![[0.0], [0.0]];
        clf.fit(x.view(), array![1.0, 1.0].view()).unwrap();

        // A second instance must not carry the first one's fitted state.
        let fresh = factory.classifier();
        assert!(fresh.predict_up_probability(x.view()).is_err());
    }

    #[test]
    fn test_factory_all_backends_fit_and_predict() {
        let x = array![[-1.0], [0.0], [1.0], [2.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];
        for backend in [Backend::Baseline, Backend::GradientBoosted, Backend::NeuralNet] {
            let factory = BackendFactory::new(backend, Device::Cpu, 42);
            let mut clf = factory.classifier();
            clf.fit(x.view(), y.view()).unwrap();
            let p = clf.predict_up_probability(x.view()).unwrap();
            assert_eq!(p.len(), 4);
            assert!(p.iter().all(|v| (0.0..=1.0).contains(v)), "{backend}: {p}");

            let mut reg = factory.regressor();
            reg.fit(x.view(), array![0.01, -0.02, 0.03, 0.0].view()).unwrap();
            assert_eq!(reg.predict(x.view()).unwrap().len(), 4);
        }
    }
}
