use polars::prelude::*;

use crate::error::{PipelineError, Result};
use crate::pipeline::TIMESTAMP_COLUMN;

/// Outer-joins the resampled frames on the hourly timestamp. The result has
/// one row per hour present in any source, sorted ascending, with null cells
/// wherever a source has no bucket for that hour.
pub fn merge_resampled(frames: Vec<DataFrame>) -> Result<DataFrame> {
    let mut iter = frames.into_iter();
    let first = iter.next().ok_or(PipelineError::NoUsableSources)?;

    let mut merged = first.lazy();
    for frame in iter {
        merged = merged.join(
            frame.lazy(),
            [col(TIMESTAMP_COLUMN)],
            [col(TIMESTAMP_COLUMN)],
            JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
        );
    }

    Ok(merged
        .sort([TIMESTAMP_COLUMN], SortMultipleOptions::default())
        .collect()?)
}

/// Fills the merged table's gaps column by column: linear interpolation for
/// interior gaps, forward-fill for trailing gaps, backward-fill for leading
/// gaps, in that order. A column with no known value anywhere stays null
/// through all three passes; those are dropped and reported back.
pub fn fill_gaps(merged: DataFrame, value_columns: &[String]) -> Result<(DataFrame, Vec<String>)> {
    let fill_exprs: Vec<Expr> = value_columns
        .iter()
        .map(|name| {
            col(name.as_str())
                .interpolate(InterpolationMethod::Linear)
                .fill_null_with_strategy(FillNullStrategy::Forward(None))
                .fill_null_with_strategy(FillNullStrategy::Backward(None))
        })
        .collect();

    let mut filled = merged.lazy().with_columns(fill_exprs).collect()?;

    let mut dropped = Vec::new();
    for name in value_columns {
        if filled.column(name)?.null_count() == filled.height() {
            dropped.push(name.clone());
        }
    }
    for name in &dropped {
        filled = filled.drop(name)?;
    }

    Ok((filled, dropped))
}
