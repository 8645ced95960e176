//! Common types used throughout the Ronda pipeline.
//!
//! Observations in every Ronda table are keyed by a `(Symbol, Date)` pair.
//! Dates are trading days only; non-trading days never appear in any table.

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A tradable instrument identifier.
///
/// Typically a ticker symbol like "AAPL" or "MSFT". Symbols identify the
/// entity half of every observation key in the pipeline.
pub type Symbol = String;

/// Number of trading days per year used for annualization.
///
/// Note that Sharpe-like annualization based on this constant is a
/// documented approximation: it assumes the configured test window counts
/// trading days exactly, ignoring any calendar irregularities inside a fold.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_symbol_type() {
        let symbol: Symbol = "AAPL".to_string();
        assert_eq!(symbol, "AAPL");
    }

    #[test]
    fn test_date_type() {
        let date: Date = Date::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(date.year(), 2024);
    }

    #[test]
    fn test_trading_days_constant() {
        assert_eq!(TRADING_DAYS_PER_YEAR, 252);
    }
}
