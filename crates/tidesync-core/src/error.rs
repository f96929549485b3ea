use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("no source survived processing; nothing to merge")]
    NoUsableSources,

    #[error("failed to write output {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
