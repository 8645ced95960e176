//! Purge and embargo filtering of training positions.
//!
//! A label computed at date position `p` uses prices through position
//! `p + horizon`, so the last `horizon - 1` training positions before a
//! test window would see into it. Purging drops them; the embargo
//! additionally drops positions immediately after the test window when
//! training data from the future of the test period is in play.

/// Default purge width for a label horizon: `horizon - 1` panel dates.
pub const fn default_purge_days(horizon: usize) -> usize {
    horizon.saturating_sub(1)
}

/// Filter training positions against a test window.
///
/// Retains positions strictly before `test_start - purge_days`, plus
/// (when `embargo_days > 0`) positions strictly after
/// `test_end + embargo_days`. Input order is preserved; nothing is
/// mutated. An empty result is valid — the caller skips the fold.
pub fn purge_embargo(
    train_positions: &[usize],
    test_start: usize,
    test_end: usize,
    purge_days: usize,
    embargo_days: usize,
) -> Vec<usize> {
    let cutoff = test_start.saturating_sub(purge_days);
    train_positions
        .iter()
        .copied()
        .filter(|&p| p < cutoff || (embargo_days > 0 && p > test_end + embargo_days))
        .collect()
}
