//! Forward-looking label construction.
//!
//! A label at date `d` for horizon `h` uses price information from `d`
//! through the symbol's `h`-th subsequent *trading* day: horizons are
//! counted along each symbol's own observed date sequence, not along a
//! calendar. When that subsequent day does not exist the label is NaN.

use polars::prelude::*;
use ronda_traits::{Date, Result, RondaError, Symbol};

use crate::panel::LabelTable;

/// Build direction and forward-return labels at `horizon` trading days.
///
/// The input frame must have passed [`crate::validate_price_frame`];
/// labels are computed from the `close` column.
///
/// `direction` is 1.0 when the forward return is strictly positive, 0.0
/// otherwise; both fields are NaN for the last `horizon` observations of
/// each symbol.
pub fn build_labels(prices: &DataFrame, horizon: usize) -> Result<LabelTable> {
    if horizon == 0 {
        return Err(RondaError::InvalidConfig(
            "label horizon must be positive".to_string(),
        ));
    }

    let mut rows = extract_price_rows(prices)?;
    rows.sort_unstable_by(|a, b| (a.0.as_str(), a.1).cmp(&(b.0.as_str(), b.1)));

    let n = rows.len();
    let mut symbols = Vec::with_capacity(n);
    let mut dates = Vec::with_capacity(n);
    let mut direction = vec![f64::NAN; n];
    let mut forward_return = vec![f64::NAN; n];

    let mut run_start = 0;
    while run_start < n {
        let symbol = rows[run_start].0.as_str();
        let mut run_end = run_start + 1;
        while run_end < n && rows[run_end].0 == symbol {
            run_end += 1;
        }

        for i in run_start..run_end {
            let j = i + horizon;
            if j < run_end {
                let ret = rows[j].2 / rows[i].2 - 1.0;
                forward_return[i] = ret;
                direction[i] = if ret > 0.0 { 1.0 } else { 0.0 };
            }
        }

        run_start = run_end;
    }

    for (symbol, date, _) in rows {
        symbols.push(symbol);
        dates.push(date);
    }

    LabelTable::new(symbols, dates, direction, forward_return, horizon)
}

fn extract_price_rows(prices: &DataFrame) -> Result<Vec<(Symbol, Date, f64)>> {
    let symbols = prices.column("symbol")?.as_materialized_series().str()?.clone();
    let dates = prices.column("date")?.as_materialized_series().date()?.clone();
    let closes = prices
        .column("close")?
        .as_materialized_series()
        .cast(&DataType::Float64)?
        .f64()?
        .clone();

    let mut rows = Vec::with_capacity(prices.height());
    for ((symbol, days), close) in symbols.into_iter().zip(dates.into_iter()).zip(closes.into_iter()) {
        let (Some(symbol), Some(days), Some(close)) = (symbol, days, close) else {
            return Err(RondaError::InvalidData(
                "null symbol, date, or close in price frame".to_string(),
            ));
        };
        let date = Date::from_num_days_from_ce_opt(days + 719_163).ok_or_else(|| {
            RondaError::InvalidData(format!("date out of range: {days} days since epoch"))
        })?;
        rows.push((symbol.to_string(), date, close));
    }
    Ok(rows)
}
