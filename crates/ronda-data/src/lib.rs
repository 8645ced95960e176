//! Edge-validated data layer for the Ronda research pipeline.
//!
//! Schema validation happens at the ingestion boundary: raw price frames
//! are checked against a declared schema once, then converted into the
//! strongly typed panel structures the evaluation core operates on.
//! Polars appears only at the edges; the internal representation is
//! `ndarray` matrices plus plain vectors keyed by `(Symbol, Date)`.

pub mod features;
pub mod io;
pub mod panel;
pub mod schema;
pub mod targets;
pub mod universe;

pub use features::build_features;
pub use io::{load_price_frame, write_csv};
pub use panel::{AlignedPanel, FeatureMatrix, LabelTable, PanelIndex};
pub use schema::validate_price_frame;
pub use targets::build_labels;
pub use universe::{filter_symbols, min_history_days, valid_symbols};
