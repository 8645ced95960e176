//! Price-table schema validation.
//!
//! The pipeline's single ingestion contract: a daily price frame with one
//! row per `(symbol, date)` observation. Validation runs once, before any
//! feature or label construction, and fails fast naming the offending
//! column.

use polars::prelude::*;
use ronda_traits::{Result, RondaError};

/// Columns every price frame must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = ["symbol", "date", "open", "high", "low", "close", "volume"];

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
    )
}

/// Validate a raw price frame against the declared schema.
///
/// Checks, in order:
/// 1. All required columns are present.
/// 2. `symbol` is a string column and `date` a date column.
/// 3. Price and volume columns are numeric.
/// 4. `(symbol, date)` keys are unique.
///
/// # Errors
///
/// Returns [`RondaError::MissingColumn`] or [`RondaError::InvalidData`]
/// with the offending column named.
pub fn validate_price_frame(df: &DataFrame) -> Result<()> {
    if df.is_empty() {
        return Err(RondaError::InvalidData("price frame is empty".to_string()));
    }

    for name in REQUIRED_COLUMNS {
        if df.column(name).is_err() {
            return Err(RondaError::MissingColumn(name.to_string()));
        }
    }

    let symbol_dtype = df.column("symbol")?.dtype();
    if !matches!(symbol_dtype, DataType::String) {
        return Err(RondaError::InvalidData(format!(
            "column 'symbol': expected String, got {symbol_dtype}"
        )));
    }

    let date_dtype = df.column("date")?.dtype();
    if !matches!(date_dtype, DataType::Date) {
        return Err(RondaError::InvalidData(format!(
            "column 'date': expected Date, got {date_dtype}"
        )));
    }

    for name in ["open", "high", "low", "close", "volume"] {
        let dtype = df.column(name)?.dtype();
        if !is_numeric(dtype) {
            return Err(RondaError::InvalidData(format!(
                "column '{name}': expected a numeric dtype, got {dtype}"
            )));
        }
    }

    let duplicates = df
        .clone()
        .lazy()
        .group_by([col("symbol"), col("date")])
        .agg([len().alias("n")])
        .filter(col("n").gt(lit(1u32)))
        .collect()?;
    if !duplicates.is_empty() {
        return Err(RondaError::InvalidData(format!(
            "{} duplicate (symbol, date) keys in price frame",
            duplicates.height()
        )));
    }

    Ok(())
}
