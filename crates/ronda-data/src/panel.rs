//! Typed panel structures keyed by `(symbol, date)`.
//!
//! The evaluation core never touches a DataFrame: features live in a
//! fixed-width [`FeatureMatrix`], labels in a [`LabelTable`], and the time
//! axis in a [`PanelIndex`]. All three are built once per run and are
//! read-only thereafter.

use std::collections::{HashMap, HashSet};

use chrono::Datelike;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use ronda_traits::{Date, Result, RondaError, Symbol};

/// The ordered set of distinct observation dates across the universe.
///
/// This is the time axis all windowing operates on. Derived once from the
/// feature table; immutable thereafter.
#[derive(Debug, Clone)]
pub struct PanelIndex {
    dates: Vec<Date>,
    positions: HashMap<Date, usize>,
}

impl PanelIndex {
    /// Build an index from an arbitrary collection of dates.
    ///
    /// Dates are sorted and de-duplicated.
    pub fn from_dates<I>(dates: I) -> Self
    where
        I: IntoIterator<Item = Date>,
    {
        let mut dates: Vec<Date> = dates.into_iter().collect();
        dates.sort_unstable();
        dates.dedup();
        let positions = dates.iter().enumerate().map(|(i, &d)| (d, i)).collect();
        Self { dates, positions }
    }

    /// Number of distinct dates in the panel.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the panel has no dates.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The ordered dates.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Integer position of a date in the panel, if present.
    pub fn position(&self, date: Date) -> Option<usize> {
        self.positions.get(&date).copied()
    }

    /// Date at an integer position.
    pub fn date_at(&self, position: usize) -> Option<Date> {
        self.dates.get(position).copied()
    }
}

fn date_from_days(days: i32) -> Date {
    // Polars stores dates as days since the Unix epoch; chrono counts from CE.
    Date::from_num_days_from_ce_opt(days + 719_163).unwrap_or_default()
}

fn extract_keys(df: &DataFrame) -> Result<(Vec<Symbol>, Vec<Date>)> {
    let symbols: Vec<Symbol> = df
        .column("symbol")?
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|s| {
            s.map(str::to_string)
                .ok_or_else(|| RondaError::InvalidData("null symbol in key column".to_string()))
        })
        .collect::<Result<_>>()?;

    let dates: Vec<Date> = df
        .column("date")?
        .as_materialized_series()
        .date()?
        .into_iter()
        .map(|d: Option<i32>| {
            d.map(date_from_days)
                .ok_or_else(|| RondaError::InvalidData("null date in key column".to_string()))
        })
        .collect::<Result<_>>()?;

    Ok((symbols, dates))
}

fn check_unique_keys(symbols: &[Symbol], dates: &[Date], table: &str) -> Result<()> {
    let mut seen: HashSet<(&str, Date)> = HashSet::with_capacity(symbols.len());
    for (symbol, &date) in symbols.iter().zip(dates.iter()) {
        if !seen.insert((symbol.as_str(), date)) {
            return Err(RondaError::InvalidData(format!(
                "duplicate ({symbol}, {date}) key in {table} table"
            )));
        }
    }
    Ok(())
}

/// A fixed-width numeric feature matrix keyed by `(symbol, date)`.
///
/// Every feature column is present for every key; missing values are NaN,
/// never zero. Keys are unique.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    symbols: Vec<Symbol>,
    dates: Vec<Date>,
    columns: Vec<String>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Assemble a feature matrix from its parts, checking shape and key
    /// uniqueness.
    pub fn new(
        symbols: Vec<Symbol>,
        dates: Vec<Date>,
        columns: Vec<String>,
        values: Array2<f64>,
    ) -> Result<Self> {
        if symbols.len() != dates.len() || symbols.len() != values.nrows() {
            return Err(RondaError::InvalidData(format!(
                "feature matrix shape mismatch: {} symbols, {} dates, {} value rows",
                symbols.len(),
                dates.len(),
                values.nrows()
            )));
        }
        if columns.len() != values.ncols() {
            return Err(RondaError::InvalidData(format!(
                "feature matrix has {} column names for {} value columns",
                columns.len(),
                values.ncols()
            )));
        }
        check_unique_keys(&symbols, &dates, "feature")?;
        Ok(Self {
            symbols,
            dates,
            columns,
            values,
        })
    }

    /// Convert an edge DataFrame into a typed feature matrix.
    ///
    /// Expects `symbol` and `date` key columns; every remaining column is
    /// cast to `f64` and becomes a feature.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        if df.is_empty() {
            return Err(RondaError::InvalidData("feature table is empty".to_string()));
        }
        for key in ["symbol", "date"] {
            if df.column(key).is_err() {
                return Err(RondaError::MissingColumn(key.to_string()));
            }
        }

        let (symbols, dates) = extract_keys(df)?;

        let feature_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .filter(|n| n != "symbol" && n != "date")
            .collect();
        if feature_names.is_empty() {
            return Err(RondaError::InvalidData(
                "feature table has no feature columns".to_string(),
            ));
        }

        let n_rows = df.height();
        let mut values = Array2::from_elem((n_rows, feature_names.len()), f64::NAN);
        for (j, name) in feature_names.iter().enumerate() {
            let casted = df
                .column(name.as_str())?
                .as_materialized_series()
                .cast(&DataType::Float64)?;
            for (i, v) in casted.f64()?.into_iter().enumerate() {
                values[[i, j]] = v.unwrap_or(f64::NAN);
            }
        }

        Self::new(symbols, dates, feature_names, values)
    }

    /// Number of observation rows.
    pub fn n_rows(&self) -> usize {
        self.symbols.len()
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    /// Whether the matrix holds no rows.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Declared feature column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row symbols, parallel to the value rows.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Row dates, parallel to the value rows.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// The numeric values.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Derive the panel index from this matrix's dates.
    pub fn panel_index(&self) -> PanelIndex {
        PanelIndex::from_dates(self.dates.iter().copied())
    }

    /// Convert back to a DataFrame for presentation.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len() + 2);
        columns.push(Column::new("symbol".into(), &self.symbols));
        columns.push(
            DateChunked::from_naive_date("date".into(), self.dates.iter().copied())
                .into_column(),
        );
        for (j, name) in self.columns.iter().enumerate() {
            let values: Vec<f64> = self.values.column(j).to_vec();
            columns.push(Column::new(name.as_str().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Forward-looking labels for one horizon, keyed like the feature matrix.
///
/// `direction` is 1.0 when the symbol's close is higher `horizon` trading
/// days later, 0.0 otherwise; `forward_return` is the relative change over
/// the same span. Both are NaN when the horizon extends past the symbol's
/// last observed trading day.
#[derive(Debug, Clone)]
pub struct LabelTable {
    symbols: Vec<Symbol>,
    dates: Vec<Date>,
    direction: Vec<f64>,
    forward_return: Vec<f64>,
    horizon: usize,
}

impl LabelTable {
    /// Assemble a label table from its parts, checking shape and key
    /// uniqueness.
    pub fn new(
        symbols: Vec<Symbol>,
        dates: Vec<Date>,
        direction: Vec<f64>,
        forward_return: Vec<f64>,
        horizon: usize,
    ) -> Result<Self> {
        let n = symbols.len();
        if dates.len() != n || direction.len() != n || forward_return.len() != n {
            return Err(RondaError::InvalidData(
                "label table columns differ in length".to_string(),
            ));
        }
        if horizon == 0 {
            return Err(RondaError::InvalidConfig(
                "label horizon must be positive".to_string(),
            ));
        }
        check_unique_keys(&symbols, &dates, "label")?;
        Ok(Self {
            symbols,
            dates,
            direction,
            forward_return,
            horizon,
        })
    }

    /// Number of label rows.
    pub fn n_rows(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The label horizon in trading days.
    pub const fn horizon(&self) -> usize {
        self.horizon
    }

    /// Row symbols, parallel to the label columns.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Row dates, parallel to the label columns.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Direction labels in {0.0, 1.0}, NaN where undefined.
    pub fn direction(&self) -> &[f64] {
        &self.direction
    }

    /// Forward relative returns, NaN where undefined.
    pub fn forward_return(&self) -> &[f64] {
        &self.forward_return
    }
}

/// The inner join of a feature matrix and a label table, with undefined
/// labels dropped.
///
/// This is the read-only observation panel the fold loop slices. Each row
/// carries its date's integer position in the [`PanelIndex`] so purge and
/// embargo arithmetic never re-derives positions.
#[derive(Debug, Clone)]
pub struct AlignedPanel {
    features: Array2<f64>,
    direction: Vec<f64>,
    forward_return: Vec<f64>,
    dates: Vec<Date>,
    date_positions: Vec<usize>,
}

impl AlignedPanel {
    /// Join features with labels on `(symbol, date)`.
    ///
    /// Rows whose label is undefined (NaN direction or return) are
    /// dropped; the underlying tables are never mutated.
    ///
    /// # Errors
    ///
    /// Fails fast when the two tables share no observation keys, or when
    /// every overlapping row has undefined labels.
    pub fn merge(
        features: &FeatureMatrix,
        labels: &LabelTable,
        index: &PanelIndex,
    ) -> Result<Self> {
        let mut label_rows: HashMap<(&str, Date), usize> =
            HashMap::with_capacity(labels.n_rows());
        for i in 0..labels.n_rows() {
            label_rows.insert((labels.symbols[i].as_str(), labels.dates[i]), i);
        }

        let mut kept_feature_rows: Vec<usize> = Vec::new();
        let mut direction = Vec::new();
        let mut forward_return = Vec::new();
        let mut dates = Vec::new();
        let mut date_positions = Vec::new();
        let mut overlapping = 0usize;

        for i in 0..features.n_rows() {
            let key = (features.symbols[i].as_str(), features.dates[i]);
            let Some(&row) = label_rows.get(&key) else {
                continue;
            };
            overlapping += 1;

            let dir = labels.direction[row];
            let ret = labels.forward_return[row];
            if !dir.is_finite() || !ret.is_finite() {
                continue;
            }
            let Some(position) = index.position(features.dates[i]) else {
                continue;
            };

            kept_feature_rows.push(i);
            direction.push(dir);
            forward_return.push(ret);
            dates.push(features.dates[i]);
            date_positions.push(position);
        }

        if overlapping == 0 {
            return Err(RondaError::InvalidData(
                "feature and label tables share no observation keys".to_string(),
            ));
        }
        if kept_feature_rows.is_empty() {
            return Err(RondaError::InsufficientData(
                "every overlapping observation has undefined labels".to_string(),
            ));
        }

        let n_features = features.n_features();
        let mut values = Array2::from_elem((kept_feature_rows.len(), n_features), f64::NAN);
        for (out_row, &in_row) in kept_feature_rows.iter().enumerate() {
            values
                .row_mut(out_row)
                .assign(&features.values.row(in_row));
        }

        Ok(Self {
            features: values,
            direction,
            forward_return,
            dates,
            date_positions,
        })
    }

    /// Number of joined observation rows.
    pub fn n_rows(&self) -> usize {
        self.direction.len()
    }

    /// Per-row integer date positions into the panel index.
    pub fn date_positions(&self) -> &[usize] {
        &self.date_positions
    }

    /// Per-row observation dates.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Row indices whose date position falls inside `positions`.
    pub fn rows_at_positions(&self, positions: &HashSet<usize>) -> Vec<usize> {
        self.date_positions
            .iter()
            .enumerate()
            .filter(|(_, p)| positions.contains(p))
            .map(|(i, _)| i)
            .collect()
    }

    /// Copy the feature rows at `rows` into a dense matrix.
    pub fn feature_rows(&self, rows: &[usize]) -> Array2<f64> {
        let mut out = Array2::from_elem((rows.len(), self.features.ncols()), f64::NAN);
        for (i, &row) in rows.iter().enumerate() {
            out.row_mut(i).assign(&self.features.row(row));
        }
        out
    }

    /// Direction labels at `rows`.
    pub fn direction_rows(&self, rows: &[usize]) -> Array1<f64> {
        rows.iter().map(|&r| self.direction[r]).collect()
    }

    /// Forward returns at `rows`.
    pub fn return_rows(&self, rows: &[usize]) -> Array1<f64> {
        rows.iter().map(|&r| self.forward_return[r]).collect()
    }
}

/// Extract the weekday (0 = Monday) and month (1..=12) of a date as
/// numeric features.
pub(crate) fn calendar_features(date: Date) -> (f64, f64) {
    (
        f64::from(date.weekday().num_days_from_monday()),
        f64::from(date.month()),
    )
}
