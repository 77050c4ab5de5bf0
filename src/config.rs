//! Run configuration: an optional JSON file, overridden by command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// JSON database dump to read records from.
    pub database: Option<PathBuf>,
    /// Directory receiving `<dbId>.json` and `<dbId>.graph.json`.
    pub output_dir: Option<PathBuf>,
    /// Alternative Process schema; the built-in one is used when unset.
    pub schema: Option<PathBuf>,
    /// Alternative trivial-chemicals dictionary.
    pub trivial_chemicals: Option<PathBuf>,
}

impl ConverterConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConvertError> {
        serde_json::from_str(json)
            .map_err(|e| ConvertError::fatal("F005", format!("Invalid configuration: {}", e)))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConvertError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ConvertError::fatal(
                "F005",
                format!("Failed to read configuration {}: {}", path.display(), e),
            )
        })?;
        Self::from_json_str(&json)
    }

    /// Values set in `overrides` replace ours.
    pub fn merge(self, overrides: ConverterConfig) -> Self {
        ConverterConfig {
            database: overrides.database.or(self.database),
            output_dir: overrides.output_dir.or(self.output_dir),
            schema: overrides.schema.or(self.schema),
            trivial_chemicals: overrides.trivial_chemicals.or(self.trivial_chemicals),
        }
    }

    pub fn require_database(&self) -> Result<&Path, ConvertError> {
        self.database
            .as_deref()
            .ok_or_else(|| ConvertError::fatal("F006", "No database dump configured"))
    }

    pub fn require_output_dir(&self) -> Result<&Path, ConvertError> {
        self.output_dir
            .as_deref()
            .ok_or_else(|| ConvertError::fatal("F006", "No output directory configured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_camel_case_fields() {
        let config = ConverterConfig::from_json_str(
            r#"{"database": "db.json", "outputDir": "out", "trivialChemicals": "t.txt"}"#,
        )
        .unwrap();
        assert_eq!(config.database, Some(PathBuf::from("db.json")));
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.schema, None);
        assert_eq!(config.trivial_chemicals, Some(PathBuf::from("t.txt")));
    }

    #[test]
    fn unknown_field_is_fatal() {
        let err = ConverterConfig::from_json_str(r#"{"outputDirectory": "out"}"#).unwrap_err();
        assert!(err.kind.is_fatal());
    }

    #[test]
    fn overrides_win() {
        let file = ConverterConfig {
            database: Some("a.json".into()),
            output_dir: Some("out".into()),
            ..Default::default()
        };
        let cli = ConverterConfig {
            output_dir: Some("elsewhere".into()),
            ..Default::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.database, Some(PathBuf::from("a.json")));
        assert_eq!(merged.output_dir, Some(PathBuf::from("elsewhere")));
        assert!(merged.require_output_dir().is_ok());
    }

    #[test]
    fn missing_database_is_fatal() {
        let err = ConverterConfig::default().require_database().unwrap_err();
        assert_eq!(err.code, "F006");
    }
}
