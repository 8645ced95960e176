//! DataFrame presentation of run results.
//!
//! The run itself is DataFrame-free; these conversions exist for the CLI
//! and notebooks at the presentation edge.

use polars::prelude::*;
use ronda_traits::Result;

use crate::fold::FoldRecord;
use crate::summary::Summary;

/// One row per completed fold, chronological.
pub fn fold_records_frame(records: &[FoldRecord]) -> Result<DataFrame> {
    let fold_numbers: Vec<u32> = records.iter().map(|r| r.fold_number as u32).collect();
    let train_rows: Vec<u32> = records.iter().map(|r| r.train_rows as u32).collect();
    let test_rows: Vec<u32> = records.iter().map(|r| r.test_rows as u32).collect();

    let date_column = |name: &str, pick: fn(&FoldRecord) -> ronda_traits::Date| {
        DateChunked::from_naive_date(name.into(), records.iter().map(pick)).into_column()
    };
    let metric_column = |name: &str, pick: fn(&FoldRecord) -> f64| {
        Column::new(name.into(), records.iter().map(pick).collect::<Vec<f64>>())
    };

    let df = DataFrame::new(vec![
        Column::new("fold".into(), fold_numbers),
        date_column("train_start", |r| r.train_start),
        date_column("train_end", |r| r.train_end),
        date_column("test_start", |r| r.test_start),
        date_column("test_end", |r| r.test_end),
        metric_column("direction_accuracy", |r| r.direction_accuracy),
        metric_column("return_rmse", |r| r.return_rmse),
        metric_column("cumulative_return", |r| r.cumulative_return),
        metric_column("sharpe_like_ratio", |r| r.sharpe_like_ratio),
        Column::new("train_rows".into(), train_rows),
        Column::new("test_rows".into(), test_rows),
    ])?;
    Ok(df)
}

/// One row per metric with its mean and dispersion over completed folds.
pub fn summary_frame(summary: &Summary) -> Result<DataFrame> {
    let metrics = [
        ("direction_accuracy", summary.direction_accuracy),
        ("return_rmse", summary.return_rmse),
        ("cumulative_return", summary.cumulative_return),
        ("sharpe_like_ratio", summary.sharpe_like_ratio),
    ];

    let names: Vec<&str> = metrics.iter().map(|(n, _)| *n).collect();
    let means: Vec<f64> = metrics.iter().map(|(_, m)| m.mean).collect();
    let stds: Vec<f64> = metrics.iter().map(|(_, m)| m.std).collect();
    let folds = vec![summary.folds_completed as u32; metrics.len()];

    let df = DataFrame::new(vec![
        Column::new("metric".into(), names),
        Column::new("mean".into(), means),
        Column::new("std".into(), stds),
        Column::new("folds_completed".into(), folds),
    ])?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize;
    use ronda_traits::Date;

    fn record(fold_number: usize) -> FoldRecord {
        let d = Date::from_ymd_opt(2024, 1, 2).unwrap();
        FoldRecord {
            fold_number,
            train_start: d,
            train_end: d,
            test_start: d,
            test_end: d,
            direction_accuracy: 0.6,
            return_rmse: 0.02,
            cumulative_return: 0.05,
            sharpe_like_ratio: 1.2,
            train_rows: 100,
            test_rows: 20,
        }
    }

    #[test]
    fn test_fold_frame_shape() {
        let df = fold_records_frame(&[record(1), record(2)]).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 11);
        assert!(df.column("direction_accuracy").is_ok());
        assert!(df.column("train_rows").is_ok());
    }

    #[test]
    fn test_empty_fold_frame() {
        let df = fold_records_frame(&[]).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 11);
    }

    #[test]
    fn test_summary_frame_rows() {
        let summary = summarize(&[record(1), record(2)]);
        let df = summary_frame(&summary).unwrap();
        assert_eq!(df.height(), 4);
        let means = df.column("mean").unwrap().as_materialized_series();
        assert_eq!(means.f64().unwrap().get(0), Some(0.6));
    }
}
