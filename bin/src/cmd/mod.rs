//! CLI subcommand modules.

pub(crate) mod backtest;
pub(crate) mod plan;
pub(crate) mod prepare;
