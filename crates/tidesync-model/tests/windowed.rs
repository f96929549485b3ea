use burn::data::dataset::Dataset;
use polars::df;
use polars::prelude::*;
use tidesync_model::{DatasetError, WindowedDataset};

fn feature_table(rows: usize) -> DataFrame {
    let timestamps: Vec<i64> = (0..rows as i64).map(|i| i * 3_600_000_000).collect();
    let ssh: Vec<f64> = (0..rows).map(|i| i as f64).collect();
    let hs: Vec<f64> = (0..rows).map(|i| 10.0 + i as f64).collect();
    df![
        "timestamp" => timestamps,
        "ssh" => ssh,
        "hs" => hs,
    ]
    .expect("df")
    .lazy()
    .with_column(col("timestamp").cast(DataType::Datetime(TimeUnit::Microseconds, None)))
    .collect()
    .expect("collect")
}

#[test]
fn window_count_is_rows_minus_seq_len() {
    let frame = feature_table(10);
    let dataset = WindowedDataset::from_dataframe(&frame, "timestamp", 4).expect("dataset");
    assert_eq!(dataset.len(), 6);
}

#[test]
fn short_table_yields_empty_dataset() {
    let frame = feature_table(3);
    let dataset = WindowedDataset::from_dataframe(&frame, "timestamp", 5).expect("dataset");
    assert_eq!(dataset.len(), 0);
    assert!(dataset.get(0).is_none());
}

#[test]
fn timestamp_column_is_excluded_from_the_payload() {
    let frame = feature_table(5);
    let dataset = WindowedDataset::from_dataframe(&frame, "timestamp", 2).expect("dataset");
    assert_eq!(dataset.num_features(), 2);
    assert_eq!(dataset.columns(), ["ssh".to_string(), "hs".to_string()]);
}

#[test]
fn samples_are_one_step_ahead_windows() {
    let frame = feature_table(6);
    let dataset = WindowedDataset::from_dataframe(&frame, "timestamp", 3).expect("dataset");

    let sample = dataset.get(1).expect("sample");
    assert_eq!(sample.input.len(), 3);
    for row in &sample.input {
        assert_eq!(row.len(), dataset.num_features());
    }

    // Window starting at row 1 covers rows 1..=3; the target is row 4.
    assert_eq!(sample.input[0], vec![1.0, 11.0]);
    assert_eq!(sample.input[2], vec![3.0, 13.0]);
    assert_eq!(sample.target, vec![4.0, 14.0]);
}

#[test]
fn out_of_range_index_returns_none() {
    let frame = feature_table(6);
    let dataset = WindowedDataset::from_dataframe(&frame, "timestamp", 3).expect("dataset");
    assert!(dataset.get(dataset.len()).is_none());
}

#[test]
fn null_cells_are_refused() {
    let frame = df![
        "timestamp" => [0i64, 3_600_000_000],
        "ssh" => [Some(1.0), None],
    ]
    .expect("df")
    .lazy()
    .with_column(col("timestamp").cast(DataType::Datetime(TimeUnit::Microseconds, None)))
    .collect()
    .expect("collect");

    let err = WindowedDataset::from_dataframe(&frame, "timestamp", 1).expect_err("null cell");
    match err {
        DatasetError::MissingValue { column, row } => {
            assert_eq!(column, "ssh");
            assert_eq!(row, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}
