//! Statistical utility functions shared across the evaluation stack.
//!
//! All helpers here filter out non-finite values before computing: a NaN
//! in a metric series means "missing", never "zero".

/// Minimum threshold for standard deviation to avoid division by near-zero.
pub const MIN_STD_THRESHOLD: f64 = 1e-10;

/// Mean and sample standard deviation of a value series.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeanStd {
    /// Mean of the finite values, NaN when there are none.
    pub mean: f64,
    /// Sample standard deviation (N-1 denominator), NaN when fewer than
    /// two finite values are present.
    pub std: f64,
}

impl MeanStd {
    /// An all-NaN result, used when a series carries no finite values.
    pub const NAN: Self = Self {
        mean: f64::NAN,
        std: f64::NAN,
    };
}

/// Compute mean and sample standard deviation, ignoring non-finite values.
///
/// # Edge Cases
///
/// - Empty input or all-NaN input: mean and std are both NaN
/// - Single finite value: std is NaN (sample std is undefined)
///
/// # Examples
///
/// ```
/// use ronda_traits::stats::mean_std;
///
/// let stats = mean_std(&[1.0, 2.0, 3.0, 4.0, 5.0]);
/// assert!((stats.mean - 3.0).abs() < 1e-12);
/// ```
pub fn mean_std(values: &[f64]) -> MeanStd {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let n = finite.len();
    if n == 0 {
        return MeanStd::NAN;
    }

    let mean = finite.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let variance = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    } else {
        f64::NAN
    };

    MeanStd { mean, std }
}

/// Mean of a series using the population denominator, ignoring non-finite
/// values. NaN for an empty or all-NaN series.
pub fn mean(values: &[f64]) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Population standard deviation (N denominator), ignoring non-finite
/// values.
///
/// The Sharpe-like ratio uses the population form so that a single-row
/// test slice yields std 0 rather than NaN, which the caller then maps to
/// a NaN ratio explicitly.
pub fn population_std(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    let m = finite.iter().sum::<f64>() / finite.len() as f64;
    let variance = finite.iter().map(|v| (v - m).powi(2)).sum::<f64>() / finite.len() as f64;
    variance.sqrt()
}

/// Root-mean-square error between predicted and actual values.
///
/// Pairs where either side is non-finite are excluded. NaN when no valid
/// pairs remain or the slices differ in length.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() {
        return f64::NAN;
    }
    let (sum_sq, n) = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, p)| a.is_finite() && p.is_finite())
        .fold((0.0, 0usize), |(s, n), (a, p)| {
            (s + (p - a).powi(2), n + 1)
        });
    if n == 0 {
        f64::NAN
    } else {
        (sum_sq / n as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_std_basic() {
        let stats = mean_std(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((stats.mean - 3.0).abs() < 1e-12);
        // Sample std of 1..5 is sqrt(2.5)
        assert!((stats.std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_mean_std_empty() {
        let stats = mean_std(&[]);
        assert!(stats.mean.is_nan());
        assert!(stats.std.is_nan());
    }

    #[test]
    fn test_mean_std_filters_nan() {
        let stats = mean_std(&[1.0, f64::NAN, 3.0, f64::INFINITY, 5.0]);
        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert!(stats.std.is_finite());
    }

    #[test]
    fn test_mean_std_single_value() {
        let stats = mean_std(&[42.0]);
        assert_eq!(stats.mean, 42.0);
        assert!(stats.std.is_nan());
    }

    #[test]
    fn test_population_std_constant() {
        let std = population_std(&[0.01, 0.01, 0.01]);
        assert_eq!(std, 0.0);
    }

    #[test]
    fn test_population_std_single_value() {
        assert_eq!(population_std(&[0.02]), 0.0);
    }

    #[test]
    fn test_rmse_exact() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [1.0, 2.0, 3.0];
        assert_eq!(rmse(&actual, &predicted), 0.0);
    }

    #[test]
    fn test_rmse_known_value() {
        // Errors of 1 and -1: rmse = 1
        let actual = [0.0, 0.0];
        let predicted = [1.0, -1.0];
        assert!((rmse(&actual, &predicted) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rmse_length_mismatch() {
        assert!(rmse(&[1.0], &[1.0, 2.0]).is_nan());
    }

    #[test]
    fn test_rmse_all_nan() {
        assert!(rmse(&[f64::NAN], &[1.0]).is_nan());
    }
}
