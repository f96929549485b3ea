//! Windowed view over a synchronized feature table: each item is `seq_len`
//! consecutive rows of every numeric column plus the single next row as a
//! one-step-ahead target. Shuffling and batching belong to the dataloader.

use burn::data::dataset::Dataset;
use polars::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("polars operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("column '{column}' is missing a value at row {row}; fill gaps before windowing")]
    MissingValue { column: String, row: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSample {
    /// `seq_len` rows, each with one value per numeric column.
    pub input: Vec<Vec<f32>>,
    /// The row at `index + seq_len`.
    pub target: Vec<f32>,
}

#[derive(Debug)]
pub struct WindowedDataset {
    rows: Vec<Vec<f32>>,
    columns: Vec<String>,
    seq_len: usize,
}

impl WindowedDataset {
    /// Materializes every column except the timestamp as float rows. The
    /// table must already be gap-free; a null cell is refused rather than
    /// silently encoded as NaN.
    pub fn from_dataframe(
        frame: &DataFrame,
        timestamp_column: &str,
        seq_len: usize,
    ) -> Result<Self, DatasetError> {
        let mut columns: Vec<String> = Vec::new();
        let mut by_column: Vec<Vec<f32>> = Vec::new();

        for column in frame.get_columns() {
            if column.name().as_str() == timestamp_column {
                continue;
            }
            let casted = column.cast(&DataType::Float64)?;
            let values = casted.f64()?;

            let mut out = Vec::with_capacity(values.len());
            for (row, value) in values.into_iter().enumerate() {
                match value {
                    Some(v) => out.push(v as f32),
                    None => {
                        return Err(DatasetError::MissingValue {
                            column: column.name().to_string(),
                            row,
                        })
                    }
                }
            }
            columns.push(column.name().to_string());
            by_column.push(out);
        }

        let height = frame.height();
        let mut rows: Vec<Vec<f32>> = (0..height)
            .map(|_| Vec::with_capacity(by_column.len()))
            .collect();
        for values in &by_column {
            for (row, value) in values.iter().enumerate() {
                rows[row].push(*value);
            }
        }

        Ok(Self {
            rows,
            columns,
            seq_len,
        })
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    pub fn num_features(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Dataset<WindowSample> for WindowedDataset {
    fn get(&self, index: usize) -> Option<WindowSample> {
        if index >= self.len() {
            return None;
        }
        Some(WindowSample {
            input: self.rows[index..index + self.seq_len].to_vec(),
            target: self.rows[index + self.seq_len].clone(),
        })
    }

    fn len(&self) -> usize {
        self.rows.len().saturating_sub(self.seq_len)
    }
}
