//! CLI command implementations.

pub mod config;
pub mod issue;
pub mod merge;
pub mod process;

use std::path::{Path, PathBuf};

use fapiao_core::models::config::FapiaoConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fapiao")
        .join("config.json")
}

/// Load the configuration at `path`, falling back to defaults when the file
/// does not exist and was not asked for explicitly.
pub fn load_config(path: &Path, explicit: bool) -> anyhow::Result<FapiaoConfig> {
    if path.exists() || explicit {
        Ok(FapiaoConfig::from_file(path)?)
    } else {
        Ok(FapiaoConfig::default())
    }
}
