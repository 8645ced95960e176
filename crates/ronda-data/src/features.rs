//! Technical and seasonality feature construction.
//!
//! A compact cross-sectional feature set computed per symbol from the
//! validated price frame: lagged returns, rolling volatility, a trend
//! ratio, an intraday range, a volume delta, and two calendar features.
//! Warmup rows that lack enough history carry NaN, which the core treats
//! as missing.

use ndarray::Array2;
use polars::prelude::*;
use ronda_traits::{Date, Result, RondaError, Symbol};

use crate::panel::{FeatureMatrix, calendar_features};

/// Names of the generated feature columns, in output order.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "ret_1d",
    "ret_5d",
    "ret_21d",
    "vol_21d",
    "close_to_sma_21",
    "range_pct",
    "volume_delta",
    "day_of_week",
    "month",
];

const VOL_WINDOW: usize = 21;

struct PriceRow {
    symbol: Symbol,
    date: Date,
    close: f64,
    high: f64,
    low: f64,
    volume: f64,
}

/// Build the feature matrix from a validated price frame.
///
/// One output row per input observation, keyed `(symbol, date)`.
pub fn build_features(prices: &DataFrame) -> Result<FeatureMatrix> {
    let mut rows = extract_rows(prices)?;
    rows.sort_unstable_by(|a, b| {
        (a.symbol.as_str(), a.date).cmp(&(b.symbol.as_str(), b.date))
    });

    let n = rows.len();
    let mut values = Array2::from_elem((n, FEATURE_COLUMNS.len()), f64::NAN);

    let mut run_start = 0;
    while run_start < n {
        let symbol = rows[run_start].symbol.as_str();
        let mut run_end = run_start + 1;
        while run_end < n && rows[run_end].symbol == symbol {
            run_end += 1;
        }

        fill_symbol_features(&rows[run_start..run_end], &mut values, run_start);
        run_start = run_end;
    }

    let symbols = rows.iter().map(|r| r.symbol.clone()).collect();
    let dates = rows.iter().map(|r| r.date).collect();
    let columns = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
    FeatureMatrix::new(symbols, dates, columns, values)
}

fn fill_symbol_features(rows: &[PriceRow], values: &mut Array2<f64>, offset: usize) {
    let closes: Vec<f64> = rows.iter().map(|r| r.close).collect();
    let n = rows.len();

    // Daily returns, NaN for the first observation.
    let mut ret_1d = vec![f64::NAN; n];
    for i in 1..n {
        ret_1d[i] = closes[i] / closes[i - 1] - 1.0;
    }

    for i in 0..n {
        let out = offset + i;
        values[[out, 0]] = ret_1d[i];
        if i >= 5 {
            values[[out, 1]] = closes[i] / closes[i - 5] - 1.0;
        }
        if i >= 21 {
            values[[out, 2]] = closes[i] / closes[i - 21] - 1.0;
        }
        if i >= VOL_WINDOW {
            values[[out, 3]] = window_std(&ret_1d[i + 1 - VOL_WINDOW..=i]);
            let sma: f64 =
                closes[i + 1 - VOL_WINDOW..=i].iter().sum::<f64>() / VOL_WINDOW as f64;
            values[[out, 4]] = closes[i] / sma - 1.0;
        }
        if rows[i].close > 0.0 {
            values[[out, 5]] = (rows[i].high - rows[i].low) / rows[i].close;
        }
        if i >= 1 && rows[i - 1].volume > 0.0 {
            values[[out, 6]] = rows[i].volume / rows[i - 1].volume - 1.0;
        }
        let (day_of_week, month) = calendar_features(rows[i].date);
        values[[out, 7]] = day_of_week;
        values[[out, 8]] = month;
    }
}

fn window_std(window: &[f64]) -> f64 {
    let finite: Vec<f64> = window.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return f64::NAN;
    }
    let mean = finite.iter().sum::<f64>() / finite.len() as f64;
    let variance =
        finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (finite.len() - 1) as f64;
    variance.sqrt()
}

fn extract_rows(prices: &DataFrame) -> Result<Vec<PriceRow>> {
    let symbols = prices.column("symbol")?.as_materialized_series().str()?.clone();
    let dates = prices.column("date")?.as_materialized_series().date()?.clone();
    let f64_col = |name: &str| -> Result<Float64Chunked> {
        Ok(prices
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?
            .f64()?
            .clone())
    };
    let closes = f64_col("close")?;
    let highs = f64_col("high")?;
    let lows = f64_col("low")?;
    let volumes = f64_col("volume")?;

    let mut rows = Vec::with_capacity(prices.height());
    for i in 0..prices.height() {
        let (Some(symbol), Some(days)) = (symbols.get(i), dates.get(i)) else {
            return Err(RondaError::InvalidData(
                "null symbol or date in price frame".to_string(),
            ));
        };
        let date = Date::from_num_days_from_ce_opt(days + 719_163).ok_or_else(|| {
            RondaError::InvalidData(format!("date out of range: {days} days since epoch"))
        })?;
        rows.push(PriceRow {
            symbol: symbol.to_string(),
            date,
            close: closes.get(i).unwrap_or(f64::NAN),
            high: highs.get(i).unwrap_or(f64::NAN),
            low: lows.get(i).unwrap_or(f64::NAN),
            volume: volumes.get(i).unwrap_or(f64::NAN),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn price_frame() -> DataFrame {
        let dates = [d(2), d(3), d(4)];
        df! {
            "symbol" => &["A", "A", "A"],
            "date" => &dates,
            "open" => &[99.0, 101.0, 100.5],
            "high" => &[101.0, 103.0, 102.0],
            "low" => &[98.0, 100.0, 99.0],
            "close" => &[100.0, 102.0, 101.0],
            "volume" => &[1000.0, 1500.0, 1200.0],
        }
        .unwrap()
    }

    #[test]
    fn test_feature_columns_fixed_width() {
        let matrix = build_features(&price_frame()).unwrap();
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_features(), FEATURE_COLUMNS.len());
        assert_eq!(matrix.columns()[0], "ret_1d");
    }

    #[test]
    fn test_daily_return() {
        let matrix = build_features(&price_frame()).unwrap();
        // First row has no prior close.
        assert!(matrix.values()[[0, 0]].is_nan());
        assert_relative_eq!(matrix.values()[[1, 0]], 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_warmup_rows_are_nan() {
        let matrix = build_features(&price_frame()).unwrap();
        // 5-day and 21-day features need more history than three rows.
        assert!(matrix.values()[[2, 1]].is_nan());
        assert!(matrix.values()[[2, 3]].is_nan());
    }

    #[test]
    fn test_range_and_calendar() {
        let matrix = build_features(&price_frame()).unwrap();
        assert_relative_eq!(matrix.values()[[0, 5]], 3.0 / 100.0, epsilon = 1e-12);
        // 2024-01-02 was a Tuesday.
        assert_eq!(matrix.values()[[0, 7]], 1.0);
        assert_eq!(matrix.values()[[0, 8]], 1.0);
    }

    #[test]
    fn test_volume_delta() {
        let matrix = build_features(&price_frame()).unwrap();
        assert!(matrix.values()[[0, 6]].is_nan());
        assert_relative_eq!(matrix.values()[[1, 6]], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_rolling_window_values() {
        // 30 trading days of a steadily rising price.
        let dates: Vec<Date> = (0..30)
            .map(|i| Date::from_ymd_opt(2024, 3, 1).unwrap() + chrono::Days::new(i))
            .collect();
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let df = df! {
            "symbol" => &vec!["A"; 30],
            "date" => &dates,
            "open" => &closes,
            "high" => &closes,
            "low" => &closes,
            "close" => &closes,
            "volume" => &vec![1000.0; 30],
        }
        .unwrap();

        let matrix = build_features(&df).unwrap();
        // Row 21 is the first with a full volatility window.
        assert!(matrix.values()[[20, 3]].is_nan());
        assert!(matrix.values()[[21, 3]].is_finite());
        assert!(matrix.values()[[21, 4]].is_finite());
        // Rising prices sit above their moving average.
        assert!(matrix.values()[[21, 4]] > 0.0);
    }
}
