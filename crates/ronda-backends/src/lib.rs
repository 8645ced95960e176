//! Model backends for the Ronda evaluation core.
//!
//! Three backends implement the [`ronda_traits::DirectionClassifier`] and
//! [`ronda_traits::ReturnRegressor`] contract:
//!
//! - [`Baseline`](factory::Backend::Baseline): most-frequent classifier and
//!   mean regressor, the deterministic reference point
//! - [`GradientBoosted`](factory::Backend::GradientBoosted): gradient-boosted
//!   depth-1 trees with Newton leaf values
//! - [`NeuralNet`](factory::Backend::NeuralNet): a single-hidden-layer MLP
//!   trained by full-batch gradient descent from a seeded initialization
//!
//! Backends are selected once at configuration time through the
//! [`BackendFactory`]; the evaluation loop never branches on backend
//! identity.

pub mod baseline;
pub mod boosted;
pub mod factory;
pub mod neural;
mod standardize;

pub use baseline::{MeanRegressor, MostFrequentClassifier};
pub use boosted::{BoostedClassifier, BoostedRegressor, GradientBoostedConfig};
pub use factory::{Backend, BackendFactory, Device};
pub use neural::{MlpClassifier, MlpConfig, MlpRegressor};
