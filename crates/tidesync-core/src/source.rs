use std::fs::File;

use chrono::{Duration, NaiveDateTime, Utc};
use polars::df;
use polars::prelude::*;
use tracing::warn;

use crate::config::SourceSpec;
use crate::pipeline::{SkipReason, TIMESTAMP_COLUMN};

/// Loads one raw measurement file and produces its hourly-mean resampled
/// frame: a `timestamp` key column plus the prefixed value columns, one row
/// per hour from the source's first hour to its last. Hours with no samples
/// are present but null.
///
/// Anything that prevents this source from contributing is returned as a
/// [`SkipReason`] so the caller can record it and move on.
pub fn resample_source(spec: &SourceSpec) -> Result<DataFrame, SkipReason> {
    let raw = load_frame(spec)?;

    if raw.column(&spec.timestamp_column).is_err() {
        return Err(SkipReason::TimestampColumnMissing(
            spec.timestamp_column.clone(),
        ));
    }

    let mut present: Vec<&str> = Vec::new();
    for name in &spec.value_columns {
        if raw.column(name).is_ok() {
            present.push(name.as_str());
        } else {
            warn!(
                source = %spec.path.display(),
                column = %name,
                "declared value column not found; skipping column"
            );
        }
    }
    if present.is_empty() {
        return Err(SkipReason::NoValueColumns);
    }

    if raw.height() == 0 {
        return Err(SkipReason::NoRows);
    }

    let ts_dtype = raw
        .column(&spec.timestamp_column)
        .map_err(|e| SkipReason::Unreadable(e.to_string()))?
        .dtype()
        .clone();
    let ts_expr = timestamp_expr(&ts_dtype, &spec.timestamp_column)
        .ok_or_else(|| SkipReason::TimestampNotTemporal(format!("{ts_dtype:?}")))?;

    let resampled =
        hourly_mean(raw, spec, ts_expr, &present).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    if resampled.height() == 0 {
        // Every timestamp failed to parse.
        return Err(SkipReason::NoRows);
    }
    Ok(resampled)
}

fn load_frame(spec: &SourceSpec) -> Result<DataFrame, SkipReason> {
    if !spec.path.is_file() {
        return Err(SkipReason::FileMissing);
    }
    let file = File::open(&spec.path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| SkipReason::Unreadable(e.to_string()))
}

/// Expression turning the declared timestamp column into a naive
/// microsecond-precision datetime named [`TIMESTAMP_COLUMN`]. Returns `None`
/// for dtypes that cannot carry a timestamp.
fn timestamp_expr(dtype: &DataType, name: &str) -> Option<Expr> {
    let parsed = match dtype {
        DataType::String => col(name).str().to_datetime(
            Some(TimeUnit::Microseconds),
            None,
            StrptimeOptions {
                strict: false,
                ..Default::default()
            },
            lit("raise"),
        ),
        DataType::Datetime(_, _) | DataType::Date => {
            col(name).cast(DataType::Datetime(TimeUnit::Microseconds, None))
        }
        _ => return None,
    };
    Some(parsed.alias(TIMESTAMP_COLUMN))
}

fn hourly_mean(
    raw: DataFrame,
    spec: &SourceSpec,
    ts_expr: Expr,
    present: &[&str],
) -> PolarsResult<DataFrame> {
    let mut projection = vec![ts_expr];
    for name in present {
        projection.push(
            col(*name)
                .cast(DataType::Float64)
                .alias(format!("{}{}", spec.prefix, name)),
        );
    }

    let out_cols: Vec<String> = present
        .iter()
        .map(|name| format!("{}{}", spec.prefix, name))
        .collect();
    let firsts: Vec<Expr> = out_cols.iter().map(|n| col(n.as_str()).first()).collect();
    let means: Vec<Expr> = out_cols.iter().map(|n| col(n.as_str()).mean()).collect();

    // Sort ascending, keep the first row per exact timestamp, then bucket
    // into hours and mean-aggregate each bucket.
    let resampled = raw
        .lazy()
        .select(projection)
        .drop_nulls(Some(vec![col(TIMESTAMP_COLUMN)]))
        .sort(
            [TIMESTAMP_COLUMN],
            SortMultipleOptions::new().with_maintain_order(true),
        )
        .group_by_stable([col(TIMESTAMP_COLUMN)])
        .agg(firsts)
        .with_column(col(TIMESTAMP_COLUMN).dt().truncate(lit("1h")))
        .group_by_stable([col(TIMESTAMP_COLUMN)])
        .agg(means)
        .collect()?;

    if resampled.height() == 0 {
        return Ok(resampled);
    }

    reindex_hourly(resampled)
}

/// Left-joins the bucketed frame onto the complete hourly grid spanning its
/// own time range, so interior hours with no samples exist as null rows.
fn reindex_hourly(resampled: DataFrame) -> PolarsResult<DataFrame> {
    let timestamps = resampled.column(TIMESTAMP_COLUMN)?.datetime()?;
    let start = timestamps
        .min()
        .ok_or_else(|| polars_err!(ComputeError: "resampled frame has no timestamps"))?;
    let end = timestamps
        .max()
        .ok_or_else(|| polars_err!(ComputeError: "resampled frame has no timestamps"))?;

    let grid = hourly_grid_micros(start, end)?;

    df![TIMESTAMP_COLUMN => grid]?
        .lazy()
        .with_column(col(TIMESTAMP_COLUMN).cast(DataType::Datetime(TimeUnit::Microseconds, None)))
        .join(
            resampled.lazy(),
            [col(TIMESTAMP_COLUMN)],
            [col(TIMESTAMP_COLUMN)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()
}

fn hourly_grid_micros(start: i64, end: i64) -> PolarsResult<Vec<i64>> {
    let mut cursor = naive_from_micros(start)?;
    let stop = naive_from_micros(end)?;

    let mut grid = Vec::new();
    while cursor <= stop {
        grid.push(naive_to_micros(cursor));
        cursor += Duration::hours(1);
    }
    Ok(grid)
}

fn naive_from_micros(value: i64) -> PolarsResult<NaiveDateTime> {
    let secs = value.div_euclid(1_000_000);
    let micros = value.rem_euclid(1_000_000) as u32;
    chrono::DateTime::<Utc>::from_timestamp(secs, micros * 1_000)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| polars_err!(ComputeError: "timestamp out of range: {} micros", value))
}

fn naive_to_micros(value: NaiveDateTime) -> i64 {
    let dt_utc = value.and_utc();
    dt_utc.timestamp() * 1_000_000 + i64::from(dt_utc.timestamp_subsec_nanos() / 1_000)
}
