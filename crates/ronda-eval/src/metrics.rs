//! Per-fold evaluation metrics.

use ndarray::{Array1, ArrayView1};
use ronda_traits::TRADING_DAYS_PER_YEAR;
use ronda_traits::stats::{MIN_STD_THRESHOLD, mean, population_std, rmse};

/// Binarize up-probabilities against a decision threshold.
///
/// A probability exactly at the threshold counts as an up call.
pub fn predicted_directions(p_up: ArrayView1<'_, f64>, threshold: f64) -> Array1<f64> {
    p_up.iter()
        .map(|&p| if p >= threshold { 1.0 } else { 0.0 })
        .collect()
}

/// Fraction of test rows where the predicted direction matches the actual
/// one. NaN for an empty slice.
pub fn direction_accuracy(predicted: ArrayView1<'_, f64>, actual: ArrayView1<'_, f64>) -> f64 {
    if predicted.is_empty() || predicted.len() != actual.len() {
        return f64::NAN;
    }
    let hits = predicted
        .iter()
        .zip(actual.iter())
        .filter(|(p, a)| (**p >= 0.5) == (**a >= 0.5))
        .count();
    hits as f64 / predicted.len() as f64
}

/// Per-row signed strategy return: long the actual return on an up call,
/// short it on a down call.
pub fn strategy_returns(
    actual_returns: ArrayView1<'_, f64>,
    predicted: ArrayView1<'_, f64>,
) -> Array1<f64> {
    actual_returns
        .iter()
        .zip(predicted.iter())
        .map(|(&r, &d)| r * 2.0f64.mul_add(d, -1.0))
        .collect()
}

/// Simple sum of per-row strategy returns over the test slice.
pub fn cumulative_return(strategy_returns: ArrayView1<'_, f64>) -> f64 {
    strategy_returns.iter().filter(|v| v.is_finite()).sum()
}

/// Sharpe-like ratio of the strategy return series.
///
/// `mean / std * sqrt(252 / test_window)`, with the population std. The
/// annualization treats each test row as one period of `test_window`
/// panel dates, which overstates the scale factor on multi-symbol panels;
/// it is kept as a comparable score, not an annualized Sharpe estimate.
/// NaN when the std is (near) zero.
pub fn sharpe_like(strategy_returns: ArrayView1<'_, f64>, test_window: usize) -> f64 {
    if test_window == 0 {
        return f64::NAN;
    }
    let values: Vec<f64> = strategy_returns.to_vec();
    let std = population_std(&values);
    if !std.is_finite() || std < MIN_STD_THRESHOLD {
        return f64::NAN;
    }
    let annualization = (TRADING_DAYS_PER_YEAR as f64 / test_window as f64).sqrt();
    mean(&values) / std * annualization
}

/// Root-mean-square error between predicted and actual returns.
pub fn return_rmse(actual: ArrayView1<'_, f64>, predicted: ArrayView1<'_, f64>) -> f64 {
    rmse(&actual.to_vec(), &predicted.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_threshold_binarization() {
        let p = array![0.9, 0.5, 0.49, 0.1];
        assert_eq!(
            predicted_directions(p.view(), 0.5),
            array![1.0, 1.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_perfect_direction_accuracy() {
        let p_up = array![0.9, 0.1];
        let pred = predicted_directions(p_up.view(), 0.5);
        let actual = array![1.0, 0.0];
        assert_eq!(direction_accuracy(pred.view(), actual.view()), 1.0);
    }

    #[test]
    fn test_half_direction_accuracy() {
        let pred = array![1.0, 1.0];
        let actual = array![1.0, 0.0];
        assert_relative_eq!(direction_accuracy(pred.view(), actual.view()), 0.5);
    }

    #[test]
    fn test_empty_accuracy_is_nan() {
        let empty = Array1::<f64>::zeros(0);
        assert!(direction_accuracy(empty.view(), empty.view()).is_nan());
    }

    #[test]
    fn test_strategy_returns_sign() {
        let rets = array![0.02, -0.01, 0.03];
        let pred = array![1.0, 0.0, 0.0];
        let strat = strategy_returns(rets.view(), pred.view());
        assert_relative_eq!(strat[0], 0.02);
        assert_relative_eq!(strat[1], 0.01);
        assert_relative_eq!(strat[2], -0.03);
    }

    #[test]
    fn test_cumulative_return_sums() {
        let strat = array![0.01, -0.02, 0.04];
        assert_relative_eq!(cumulative_return(strat.view()), 0.03);
    }

    #[test]
    fn test_sharpe_like_constant_series_is_nan() {
        let strat = array![0.01, 0.01, 0.01];
        assert!(sharpe_like(strat.view(), 21).is_nan());
    }

    #[test]
    fn test_sharpe_like_known_value() {
        let strat = array![0.01, -0.01];
        // mean 0, so the ratio is exactly 0 regardless of annualization
        assert_relative_eq!(sharpe_like(strat.view(), 21), 0.0);
    }

    #[test]
    fn test_sharpe_like_annualization_scale() {
        let strat = array![0.02, 0.0];
        let m = 0.01;
        let s = 0.01;
        let expected = m / s * (252.0f64 / 21.0).sqrt();
        assert_relative_eq!(sharpe_like(strat.view(), 21), expected, epsilon = 1e-12);
    }
}
