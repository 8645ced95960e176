#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/ronda-quant/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # ronda
//!
//! Leakage-safe walk-forward evaluation for daily equity panels.
//!
//! ronda is an umbrella crate that re-exports all ronda sub-crates for
//! convenience. It covers the full pipeline from a validated daily price
//! table to per-fold backtest records and an aggregate summary.
//!
//! ## Crate Organization
//!
//! - [`traits`] - Core types, errors, and the model fit/predict contract
//! - [`data`] - Schema validation, feature/label builders, the typed panel
//! - [`backends`] - Model backends behind the [`BackendFactory`]
//! - [`eval`] - Window generation, purge/embargo, fold evaluation, the run loop
//!
//! ## Architecture
//!
//! 1. **Data layer** validates the price table and builds the feature
//!    matrix and label table, keyed by `(symbol, date)`
//! 2. **Window generator** slices the shared date axis into chronological
//!    train/test folds
//! 3. **Purge/embargo** drops training dates whose labels overlap each
//!    test window
//! 4. **Backends** train a direction classifier and return regressor per
//!    fold through a single factory
//! 5. **Aggregator** reduces completed folds to mean/std of each metric

/// Version information for the ronda crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core type and trait definitions.
///
/// Re-exports [`ronda_traits`]: the [`Date`]/[`Symbol`] aliases, the
/// [`RondaError`] enum, the [`DirectionClassifier`] and [`ReturnRegressor`]
/// model contract, and shared statistics helpers.
pub mod traits {
    pub use ronda_traits::*;
}

/// Edge-validated data layer.
///
/// Re-exports [`ronda_data`]: price schema validation, universe
/// filtering, feature and label construction, and the typed observation
/// panel the evaluation loop slices.
pub mod data {
    pub use ronda_data::*;
}

/// Model backends.
///
/// Re-exports [`ronda_backends`]: the baseline, gradient-boosted, and
/// neural backends, selected once per run through the [`BackendFactory`].
pub mod backends {
    pub use ronda_backends::*;
}

/// Walk-forward evaluation core.
///
/// Re-exports [`ronda_eval`]: window generation, purge/embargo
/// filtering, per-fold training and metrics, aggregation, and the
/// validated run loop.
pub mod eval {
    pub use ronda_eval::*;
}

// Re-export the working surface at top level for convenience
pub use ronda_backends::{Backend, BackendFactory, Device};
pub use ronda_data::{
    AlignedPanel, FeatureMatrix, LabelTable, PanelIndex, build_features, build_labels,
    filter_symbols, load_price_frame, valid_symbols, validate_price_frame,
};
pub use ronda_eval::{
    BacktestRun, Fold, FoldRecord, Summary, WalkForward, WalkForwardConfig, WindowMode,
    run_walk_forward,
};
pub use ronda_traits::{
    Date, DirectionClassifier, Result, ReturnRegressor, RondaError, Symbol,
};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use ronda::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Backend, BackendFactory, BacktestRun, Date, Device, DirectionClassifier, FeatureMatrix,
        FoldRecord, LabelTable, PanelIndex, Result, ReturnRegressor, RondaError, Summary, Symbol,
        WalkForward, WalkForwardConfig, WindowMode, build_features, build_labels,
        load_price_frame, run_walk_forward, valid_symbols, validate_price_frame,
    };
}
