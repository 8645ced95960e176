//! Chronological train/test window generation.

use std::fmt;
use std::str::FromStr;

use ronda_data::PanelIndex;
use ronda_traits::{Date, RondaError};
use serde::{Deserialize, Serialize};

/// How the training window grows as folds advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowMode {
    /// Fixed-width training window sliding forward with the cursor.
    #[default]
    Rolling,
    /// Training window anchored at the first panel date, growing each fold.
    Expanding,
}

impl FromStr for WindowMode {
    type Err = RondaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rolling" => Ok(Self::Rolling),
            "expanding" => Ok(Self::Expanding),
            other => Err(RondaError::InvalidConfig(format!(
                "unknown window mode: {other}"
            ))),
        }
    }
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rolling => "rolling",
            Self::Expanding => "expanding",
        };
        f.write_str(name)
    }
}

/// One train/test split over the panel's time axis.
///
/// Ephemeral: folds are generated, evaluated, and discarded; only the
/// resulting [`FoldRecord`](crate::fold::FoldRecord) survives the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// 1-based fold number, assigned in chronological order.
    pub fold_number: usize,
    /// Ordered training dates, all strictly before the test dates.
    pub train_dates: Vec<Date>,
    /// Ordered test dates.
    pub test_dates: Vec<Date>,
}

/// Walk-forward window generator.
///
/// A cursor starts at `train_window` and advances by `step` while a full
/// test window still fits; each stop yields one [`Fold`]. A panel shorter
/// than `train_window + test_window` yields no folds, which is a valid
/// (empty) outcome here — the runner decides whether that is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkForward {
    /// Number of panel dates in each training window.
    pub train_window: usize,
    /// Number of panel dates in each test window.
    pub test_window: usize,
    /// Cursor advance between folds.
    pub step: usize,
    /// Rolling or expanding training windows.
    pub mode: WindowMode,
}

impl WalkForward {
    /// A rolling-window generator with `step` defaulting to `test_window`.
    pub const fn rolling(train_window: usize, test_window: usize) -> Self {
        Self {
            train_window,
            test_window,
            step: test_window,
            mode: WindowMode::Rolling,
        }
    }

    /// Generate every fold that fits the panel, in chronological order.
    pub fn folds(&self, index: &PanelIndex) -> Vec<Fold> {
        let dates = index.dates();
        let n = dates.len();
        if self.train_window == 0 || self.test_window == 0 || self.step == 0 {
            return Vec::new();
        }

        let mut folds = Vec::new();
        let mut cursor = self.train_window;
        while cursor + self.test_window <= n {
            let train_start = match self.mode {
                WindowMode::Rolling => cursor - self.train_window,
                WindowMode::Expanding => 0,
            };
            folds.push(Fold {
                fold_number: folds.len() + 1,
                train_dates: dates[train_start..cursor].to_vec(),
                test_dates: dates[cursor..cursor + self.test_window].to_vec(),
            });
            cursor += self.step;
        }
        folds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(n: u32) -> PanelIndex {
        PanelIndex::from_dates((1..=n).map(|i| {
            Date::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(u64::from(i - 1))
        }))
    }

    #[test]
    fn test_ten_dates_five_two_one_gives_four_folds() {
        let folds = WalkForward {
            train_window: 5,
            test_window: 2,
            step: 1,
            mode: WindowMode::Rolling,
        }
        .folds(&index_of(10));
        assert_eq!(folds.len(), 4);
        assert_eq!(folds[0].fold_number, 1);
        assert_eq!(folds[3].fold_number, 4);
    }

    #[test]
    fn test_short_panel_gives_zero_folds() {
        let folds = WalkForward {
            train_window: 5,
            test_window: 2,
            step: 1,
            mode: WindowMode::Rolling,
        }
        .folds(&index_of(6));
        assert!(folds.is_empty());
    }

    #[test]
    fn test_train_and_test_disjoint_and_ordered() {
        let folds = WalkForward::rolling(5, 2).folds(&index_of(10));
        for fold in &folds {
            let last_train = *fold.train_dates.last().unwrap();
            let first_test = *fold.test_dates.first().unwrap();
            assert!(last_train < first_test);
            assert_eq!(fold.train_dates.len(), 5);
            assert_eq!(fold.test_dates.len(), 2);
        }
    }

    #[test]
    fn test_folds_advance_chronologically() {
        let folds = WalkForward::rolling(5, 2).folds(&index_of(12));
        assert_eq!(folds.len(), 3);
        for pair in folds.windows(2) {
            assert!(pair[0].test_dates.first() < pair[1].test_dates.first());
        }
    }

    #[test]
    fn test_expanding_mode_anchors_train_start() {
        let index = index_of(10);
        let folds = WalkForward {
            train_window: 5,
            test_window: 2,
            step: 2,
            mode: WindowMode::Expanding,
        }
        .folds(&index);
        assert_eq!(folds.len(), 2);
        assert_eq!(folds[0].train_dates.len(), 5);
        assert_eq!(folds[1].train_dates.len(), 7);
        assert_eq!(folds[1].train_dates[0], index.dates()[0]);
    }

    #[test]
    fn test_zero_step_yields_no_folds() {
        let folds = WalkForward {
            train_window: 5,
            test_window: 2,
            step: 0,
            mode: WindowMode::Rolling,
        }
        .folds(&index_of(10));
        assert!(folds.is_empty());
    }

    #[test]
    fn test_window_mode_parse() {
        assert_eq!("rolling".parse::<WindowMode>().unwrap(), WindowMode::Rolling);
        assert_eq!(
            "Expanding".parse::<WindowMode>().unwrap(),
            WindowMode::Expanding
        );
        assert!("sliding".parse::<WindowMode>().is_err());
    }
}
