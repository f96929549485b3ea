use std::io::Write;
use std::path::PathBuf;

use tidesync_core::{ColumnLayout, DatasetConfig, PipelineError, SourceSpec};

fn spec(path: &str, prefix: &str, value_columns: &[&str]) -> SourceSpec {
    SourceSpec {
        path: PathBuf::from(path),
        timestamp_column: "datetime".to_string(),
        value_columns: value_columns.iter().map(|s| (*s).to_string()).collect(),
        prefix: prefix.to_string(),
    }
}

#[test]
fn config_loads_from_toml() {
    let raw = r#"
output_path = "psod_hourly.csv"
layout = "time_features_first"

[[sources]]
path = "train/ssh_praticagem.parquet"
timestamp_column = "datetime"
value_columns = ["ssh"]
prefix = "ssh_prat_"
"#;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(raw.as_bytes()).expect("write config");

    let config = DatasetConfig::load(file.path()).expect("load config");
    assert_eq!(config.layout, ColumnLayout::TimeFeaturesFirst);
    assert_eq!(config.sources.len(), 1);
    assert_eq!(config.sources[0].output_columns(), vec!["ssh_prat_ssh"]);
}

#[test]
fn layout_defaults_to_values_first() {
    let raw = r#"
output_path = "out.csv"

[[sources]]
path = "a.parquet"
timestamp_column = "datetime"
value_columns = ["ssh"]
prefix = "a_"
"#;

    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(raw.as_bytes()).expect("write config");

    let config = DatasetConfig::load(file.path()).expect("load config");
    assert_eq!(config.layout, ColumnLayout::ValuesFirst);
}

#[test]
fn empty_source_list_is_rejected() {
    let config = DatasetConfig {
        output_path: PathBuf::from("out.csv"),
        layout: ColumnLayout::default(),
        sources: vec![],
    };
    assert!(matches!(
        config.validate(),
        Err(PipelineError::Validation(_))
    ));
}

#[test]
fn empty_value_columns_are_rejected() {
    let config = DatasetConfig {
        output_path: PathBuf::from("out.csv"),
        layout: ColumnLayout::default(),
        sources: vec![spec("a.parquet", "a_", &[])],
    };
    assert!(matches!(
        config.validate(),
        Err(PipelineError::Validation(_))
    ));
}

#[test]
fn colliding_output_columns_are_rejected() {
    let config = DatasetConfig {
        output_path: PathBuf::from("out.csv"),
        layout: ColumnLayout::default(),
        sources: vec![
            spec("a.parquet", "same_", &["ssh"]),
            spec("b.parquet", "same_", &["ssh"]),
        ],
    };
    let err = config.validate().expect_err("collision");
    match err {
        PipelineError::Validation(message) => assert!(message.contains("same_ssh")),
        other => panic!("unexpected error: {other}"),
    }
}
