use std::f64::consts::PI;

use polars::prelude::*;

use crate::error::Result;

/// Names of the derived cyclical columns, in output order.
pub const CYCLICAL_COLUMNS: [&str; 4] = ["hour_sin", "hour_cos", "dayofweek_sin", "dayofweek_cos"];

/// Appends sine/cosine encodings of hour-of-day and day-of-week so the wrap
/// boundaries (23h -> 0h, Sunday -> Monday) stay continuous. Day of week uses
/// the Monday = 0 convention.
pub fn add_cyclical_features(frame: DataFrame, timestamp_column: &str) -> Result<DataFrame> {
    let hour = col(timestamp_column).dt().hour().cast(DataType::Float64);
    // polars weekday() is Monday = 1 .. Sunday = 7.
    let dayofweek = col(timestamp_column).dt().weekday().cast(DataType::Float64) - lit(1.0);

    let hour_angle = hour * lit(2.0 * PI / 24.0);
    let dow_angle = dayofweek * lit(2.0 * PI / 7.0);

    Ok(frame
        .lazy()
        .with_columns([
            hour_angle.clone().sin().alias("hour_sin"),
            hour_angle.cos().alias("hour_cos"),
            dow_angle.clone().sin().alias("dayofweek_sin"),
            dow_angle.cos().alias("dayofweek_cos"),
        ])
        .collect()?)
}
