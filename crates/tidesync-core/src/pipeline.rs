use std::path::PathBuf;

use polars::prelude::DataFrame;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ColumnLayout, DatasetConfig};
use crate::error::{PipelineError, Result};
use crate::features::{add_cyclical_features, CYCLICAL_COLUMNS};
use crate::merge::{fill_gaps, merge_resampled};
use crate::source::resample_source;

/// Name of the hourly key column carried through every stage and emitted
/// first in the exported table.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Why a source was excluded from the run. Per-source exclusion is not fatal;
/// the run aborts only when nothing survives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("file not found")]
    FileMissing,
    #[error("file could not be read: {0}")]
    Unreadable(String),
    #[error("timestamp column '{0}' not found")]
    TimestampColumnMissing(String),
    #[error("timestamp column has non-temporal dtype {0}")]
    TimestampNotTemporal(String),
    #[error("none of the declared value columns are present")]
    NoValueColumns,
    #[error("no rows with a parseable timestamp")]
    NoRows,
}

#[derive(Debug, Clone)]
pub enum SourceStatus {
    Resampled { rows: usize, columns: Vec<String> },
    Skipped(SkipReason),
}

/// Structured per-source result, one per configured descriptor, in
/// descriptor order.
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub path: PathBuf,
    pub prefix: String,
    pub status: SourceStatus,
}

#[derive(Debug)]
pub struct AlignmentOutput {
    /// Final feature table: timestamp, value columns, cyclical features,
    /// ordered per the configured layout. No missing values.
    pub frame: DataFrame,
    pub outcomes: Vec<SourceOutcome>,
    /// Merged columns that had no known value at any hour.
    pub dropped_columns: Vec<String>,
}

/// Runs the full alignment pipeline: per-source hourly resampling, outer
/// merge on the hourly timeline, gap filling, cyclical time features, and
/// column ordering.
pub fn run_alignment(config: &DatasetConfig) -> Result<AlignmentOutput> {
    config.validate()?;

    let mut outcomes = Vec::with_capacity(config.sources.len());
    let mut frames = Vec::new();
    let mut value_columns: Vec<String> = Vec::new();

    for spec in &config.sources {
        match resample_source(spec) {
            Ok(frame) => {
                let columns: Vec<String> = frame
                    .get_column_names()
                    .iter()
                    .filter(|name| name.as_str() != TIMESTAMP_COLUMN)
                    .map(|name| name.to_string())
                    .collect();
                info!(
                    source = %spec.path.display(),
                    rows = frame.height(),
                    columns = columns.len(),
                    "resampled source"
                );
                outcomes.push(SourceOutcome {
                    path: spec.path.clone(),
                    prefix: spec.prefix.clone(),
                    status: SourceStatus::Resampled {
                        rows: frame.height(),
                        columns: columns.clone(),
                    },
                });
                value_columns.extend(columns);
                frames.push(frame);
            }
            Err(reason) => {
                warn!(source = %spec.path.display(), %reason, "skipping source");
                outcomes.push(SourceOutcome {
                    path: spec.path.clone(),
                    prefix: spec.prefix.clone(),
                    status: SourceStatus::Skipped(reason),
                });
            }
        }
    }

    if frames.is_empty() {
        return Err(PipelineError::NoUsableSources);
    }

    let merged = merge_resampled(frames)?;
    let (filled, dropped_columns) = fill_gaps(merged, &value_columns)?;
    for name in &dropped_columns {
        warn!(column = %name, "column has no known value at any hour; dropped");
    }

    let value_columns: Vec<String> = value_columns
        .into_iter()
        .filter(|name| !dropped_columns.contains(name))
        .collect();
    if value_columns.is_empty() {
        return Err(PipelineError::NoUsableSources);
    }

    let featured = add_cyclical_features(filled, TIMESTAMP_COLUMN)?;
    let frame = order_columns(featured, &value_columns, config.layout)?;

    Ok(AlignmentOutput {
        frame,
        outcomes,
        dropped_columns,
    })
}

fn order_columns(
    frame: DataFrame,
    value_columns: &[String],
    layout: ColumnLayout,
) -> Result<DataFrame> {
    let mut names: Vec<String> = Vec::with_capacity(1 + value_columns.len() + 4);
    names.push(TIMESTAMP_COLUMN.to_string());
    match layout {
        ColumnLayout::ValuesFirst => {
            names.extend(value_columns.iter().cloned());
            names.extend(CYCLICAL_COLUMNS.iter().map(|name| name.to_string()));
        }
        ColumnLayout::TimeFeaturesFirst => {
            names.extend(CYCLICAL_COLUMNS.iter().map(|name| name.to_string()));
            names.extend(value_columns.iter().cloned());
        }
    }
    Ok(frame.select(names)?)
}
