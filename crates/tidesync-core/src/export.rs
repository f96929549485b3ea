use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::error::{PipelineError, Result};

/// ISO-like format used for the timestamp column in exported files.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes the final feature table as a delimited flat file with a header
/// row and no separate index column.
pub fn write_csv(frame: &DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut out = frame.clone();
    CsvWriter::new(file)
        .include_header(true)
        .with_datetime_format(Some(TIMESTAMP_FORMAT.to_string()))
        .finish(&mut out)
        .map_err(|source| PipelineError::Export {
            path: path.to_path_buf(),
            source,
        })
}
