use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PipelineError, Result};

/// One raw measurement file and the columns to take from it.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub timestamp_column: String,
    pub value_columns: Vec<String>,
    /// Prepended to every retained value column so names stay unique
    /// after merging (e.g. `waves_palm_` + `hs`).
    pub prefix: String,
}

impl SourceSpec {
    pub fn output_columns(&self) -> Vec<String> {
        self.value_columns
            .iter()
            .map(|name| format!("{}{}", self.prefix, name))
            .collect()
    }
}

/// Placement of the value columns relative to the cyclical time features
/// in the exported table. The timestamp column always comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnLayout {
    /// timestamp, value columns, cyclical features.
    #[default]
    ValuesFirst,
    /// timestamp, cyclical features, value columns. Used for
    /// single-series exports where the target sits last.
    TimeFeaturesFirst,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub output_path: PathBuf,
    #[serde(default)]
    pub layout: ColumnLayout,
    pub sources: Vec<SourceSpec>,
}

impl DatasetConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: DatasetConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(PipelineError::Validation(
                "config lists no sources".to_string(),
            ));
        }

        let mut seen: HashSet<String> = HashSet::new();
        for spec in &self.sources {
            if spec.timestamp_column.is_empty() {
                return Err(PipelineError::Validation(format!(
                    "source '{}' has an empty timestamp column name",
                    spec.path.display()
                )));
            }
            if spec.value_columns.is_empty() {
                return Err(PipelineError::Validation(format!(
                    "source '{}' declares no value columns",
                    spec.path.display()
                )));
            }
            for output_name in spec.output_columns() {
                if !seen.insert(output_name.clone()) {
                    return Err(PipelineError::Validation(format!(
                        "output column '{output_name}' is produced by more than one source; \
                         adjust prefixes"
                    )));
                }
            }
        }

        Ok(())
    }
}
