//! Shared pipeline preparation: load, validate, cherry-pick, build.

use anyhow::{Context, Result, bail};
use ronda_data::{
    FeatureMatrix, LabelTable, build_features, build_labels, filter_symbols, load_price_frame,
    valid_symbols, validate_price_frame,
};

use crate::RunArgs;

pub(crate) struct PreparedPanel {
    pub(crate) features: FeatureMatrix,
    pub(crate) labels: LabelTable,
    pub(crate) symbols: Vec<String>,
}

/// Load the price table and build the feature matrix and label table the
/// run operates on.
pub(crate) fn prepare(args: &RunArgs) -> Result<PreparedPanel> {
    let prices = load_price_frame(&args.prices)
        .with_context(|| format!("loading {}", args.prices.display()))?;
    validate_price_frame(&prices)?;

    let symbols = valid_symbols(&prices, args.horizon)?;
    if symbols.is_empty() {
        bail!(
            "no symbol has enough history for horizon {} (need {} trading days)",
            args.horizon,
            ronda_data::min_history_days(args.horizon)
        );
    }
    let prices = filter_symbols(&prices, &symbols)?;

    let features = build_features(&prices)?;
    let labels = build_labels(&prices, args.horizon)?;
    tracing::info!(
        symbols = symbols.len(),
        feature_rows = features.n_rows(),
        label_rows = labels.n_rows(),
        "prepared observation panel"
    );

    Ok(PreparedPanel {
        features,
        labels,
        symbols,
    })
}
