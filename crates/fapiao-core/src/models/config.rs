//! Configuration structures for the scraping and merge pipeline.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FapiaoError, Result};

/// Main configuration for the fapiao pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FapiaoConfig {
    /// Input, output and log locations.
    pub paths: PathsConfig,

    /// Field extraction keywords and window sizes.
    pub extraction: ExtractionConfig,

    /// Merge step configuration.
    pub merge: MergeConfig,
}

/// Directory layout. Unset directories are resolved by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory scanned for invoice PDFs.
    pub input_dir: Option<PathBuf>,

    /// Directory receiving the merged PDFs.
    pub output_dir: Option<PathBuf>,

    /// Append-only log file.
    pub log_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_dir: None,
            log_file: PathBuf::from("invoice_parser.log"),
        }
    }
}

/// Keywords and context windows used by the receipt layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Primary keywords anchoring the invoice code.
    pub code_keywords: Vec<String>,

    /// Keywords tried when the primary context holds no code.
    pub code_fallback_keywords: Vec<String>,

    /// Keywords anchoring the issue date.
    pub date_keywords: Vec<String>,

    /// Keywords anchoring the payer name.
    pub payer_keywords: Vec<String>,

    /// Label printed in front of the amount in figures.
    pub amount_label: String,

    /// Default context radius in characters.
    pub window_size: usize,

    /// Context radius around payer keywords.
    pub payer_window: usize,

    /// Context radius around the amount label.
    pub amount_window: usize,

    /// Maximum characters of context reported for a missing field.
    pub snippet_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            code_keywords: vec!["发票代码".to_string()],
            code_fallback_keywords: vec!["发票号码".to_string(), "单据编号".to_string()],
            date_keywords: vec!["日期".to_string(), "开票日".to_string()],
            payer_keywords: vec!["交款人".to_string()],
            amount_label: "(小写）".to_string(),
            window_size: 50,
            payer_window: 150,
            amount_window: 100,
            snippet_len: 100,
        }
    }
}

/// Merge step configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// File stem used for invoices without a date.
    pub unknown_date_name: String,

    /// Write `summary.csv` next to the merged files.
    pub write_summary: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            unknown_date_name: "unknown-date".to_string(),
            write_summary: false,
        }
    }
}

impl FapiaoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FapiaoError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| FapiaoError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: FapiaoConfig =
            serde_json::from_str(r#"{"merge": {"unknown_date_name": "undated"}}"#).unwrap();
        assert_eq!(config.merge.unknown_date_name, "undated");
        assert!(!config.merge.write_summary);
        assert_eq!(config.extraction.window_size, 50);
        assert_eq!(config.paths.log_file, PathBuf::from("invoice_parser.log"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FapiaoConfig::default();
        config.paths.input_dir = Some(PathBuf::from("/data/in"));
        config.extraction.payer_window = 80;
        config.save(&path).unwrap();

        let loaded = FapiaoConfig::from_file(&path).unwrap();
        assert_eq!(loaded.paths.input_dir, Some(PathBuf::from("/data/in")));
        assert_eq!(loaded.extraction.payer_window, 80);
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = FapiaoConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, FapiaoError::Config(_)));
    }
}
