//! Core types and trait definitions for the Ronda research pipeline.
//!
//! This crate defines the vocabulary shared by every other Ronda crate:
//! the observation key types ([`Symbol`], [`Date`]), the error enum
//! ([`RondaError`]) with its [`Result`] alias, the model contract traits
//! ([`DirectionClassifier`], [`ReturnRegressor`]), and a handful of
//! statistical helpers used across the evaluation stack.

pub mod error;
pub mod model;
pub mod stats;
pub mod types;

pub use error::{Result, RondaError};
pub use model::{DirectionClassifier, ReturnRegressor};
pub use types::{Date, Symbol, TRADING_DAYS_PER_YEAR};
