//! Price table loading and result writing at the filesystem edge.

use std::path::Path;

use polars::prelude::*;
use ronda_traits::Result;
use tracing::info;

/// Load a daily price table from a Parquet file.
///
/// The frame is returned as-is; callers validate it with
/// [`validate_price_frame`](crate::schema::validate_price_frame) before
/// building anything from it.
pub fn load_price_frame(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let df = LazyFrame::scan_parquet(path, ScanArgsParquet::default())?.collect()?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded price table"
    );
    Ok(df)
}

/// Write a DataFrame to a CSV file, creating parent directories as needed.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ronda_traits::RondaError::Other(format!("create {parent:?}: {e}")))?;
    }
    let file = std::fs::File::create(path)
        .map_err(|e| ronda_traits::RondaError::Other(format!("create {path:?}: {e}")))?;
    CsvWriter::new(file).include_header(true).finish(df)?;
    info!(path = %path.display(), rows = df.height(), "wrote table");
    Ok(())
}
