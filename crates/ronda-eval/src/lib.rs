//! Leakage-safe walk-forward evaluation core.
//!
//! The pipeline is a pure function of its inputs: a feature matrix and a
//! label table go in, per-fold records and an aggregate summary come out.
//!
//! - [`split`] — chronological train/test window generation
//! - [`purge`] — purge and embargo filtering of training positions
//! - [`fold`] — per-fold model training and metric evaluation
//! - [`summary`] — aggregation of completed folds
//! - [`runner`] — the validated configuration surface and the run loop
//! - [`report`] — DataFrame presentation of results
//!
//! Folds advance strictly forward in time; training data is purged so no
//! label computed at a training date can overlap the test window, and an
//! optional embargo drops training dates immediately after it.

pub mod fold;
pub mod metrics;
pub mod purge;
pub mod report;
pub mod runner;
pub mod split;
pub mod summary;

pub use fold::{FoldRecord, FoldSettings, evaluate_fold};
pub use purge::{default_purge_days, purge_embargo};
pub use runner::{BacktestRun, WalkForwardConfig, run_walk_forward};
pub use split::{Fold, WalkForward, WindowMode};
pub use summary::{Summary, summarize};
