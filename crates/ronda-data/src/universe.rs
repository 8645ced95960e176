//! Point-in-time universe selection.
//!
//! Longer prediction horizons need longer per-symbol history for a stable
//! target, so the universe is cherry-picked per horizon: a symbol
//! qualifies when it has at least `52 * horizon` observed trading days.

use std::collections::{HashMap, HashSet};

use polars::prelude::*;
use ronda_traits::{Result, RondaError, Symbol};
use tracing::info;

/// Minimum trading-day history required for a horizon, in trading days.
pub const fn min_history_days(horizon: usize) -> usize {
    52 * horizon
}

/// Symbols in the price frame with enough history for `horizon`.
///
/// Returned sorted for deterministic downstream iteration.
pub fn valid_symbols(prices: &DataFrame, horizon: usize) -> Result<Vec<Symbol>> {
    if horizon == 0 {
        return Err(RondaError::InvalidConfig(
            "horizon must be positive".to_string(),
        ));
    }

    let symbols = prices.column("symbol")?.as_materialized_series().str()?.clone();
    let mut history: HashMap<String, usize> = HashMap::new();
    for symbol in symbols.into_iter().flatten() {
        *history.entry(symbol.to_string()).or_insert(0) += 1;
    }

    let required = min_history_days(horizon);
    let mut valid: Vec<Symbol> = history
        .into_iter()
        .filter(|(_, days)| *days >= required)
        .map(|(symbol, _)| symbol)
        .collect();
    valid.sort_unstable();

    info!(
        horizon,
        required_days = required,
        symbols = valid.len(),
        "cherry-picked universe"
    );
    Ok(valid)
}

/// Restrict a price frame to the given symbols.
pub fn filter_symbols(prices: &DataFrame, symbols: &[Symbol]) -> Result<DataFrame> {
    let keep: HashSet<&str> = symbols.iter().map(String::as_str).collect();
    let mask: BooleanChunked = prices
        .column("symbol")?
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|s| s.is_some_and(|s| keep.contains(s)))
        .collect();
    Ok(prices.filter(&mask)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn price_frame() -> DataFrame {
        // A has 52 trading days, B only 3.
        let mut symbols = vec!["A"; 52];
        symbols.extend(vec!["B"; 3]);
        let dates: Vec<NaiveDate> = (0..52)
            .chain(0..3)
            .map(|i| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i))
            .collect();
        let closes = vec![100.0; 55];
        df! {
            "symbol" => &symbols,
            "date" => &dates,
            "close" => &closes,
        }
        .unwrap()
    }

    #[test]
    fn test_min_history_scaling() {
        assert_eq!(min_history_days(1), 52);
        assert_eq!(min_history_days(5), 260);
        assert_eq!(min_history_days(30), 1560);
    }

    #[test]
    fn test_valid_symbols_filters_short_history() {
        let valid = valid_symbols(&price_frame(), 1).unwrap();
        assert_eq!(valid, vec!["A".to_string()]);
    }

    #[test]
    fn test_valid_symbols_zero_horizon() {
        assert!(valid_symbols(&price_frame(), 0).is_err());
    }

    #[test]
    fn test_filter_symbols() {
        let df = price_frame();
        let filtered = filter_symbols(&df, &["B".to_string()]).unwrap();
        assert_eq!(filtered.height(), 3);
    }

    #[test]
    fn test_filter_symbols_empty_keep() {
        let filtered = filter_symbols(&price_frame(), &[]).unwrap();
        assert!(filtered.is_empty());
    }
}
