pub mod config;
pub mod error;
pub mod export;
pub mod features;
pub mod merge;
pub mod pipeline;
pub mod source;

pub use config::{ColumnLayout, DatasetConfig, SourceSpec};
pub use error::{PipelineError, Result};
pub use pipeline::{run_alignment, AlignmentOutput, SkipReason, SourceOutcome, SourceStatus};
