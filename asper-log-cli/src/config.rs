//! Configuration loading and parsing

use anyhow::{Context, Result};
use asper_log_decoder::DecoderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::handler::{Input, REPORT_FILE_NAME};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub decoder: DecoderConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    /// ZIP archives of logger exports
    #[serde(default)]
    pub archives: Vec<PathBuf>,
    /// Standalone logger exports
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub preview_rows: usize,
    #[serde(default)]
    pub preview_format: PreviewFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewFormat {
    #[default]
    Table,
    Json,
}

impl AppConfig {
    /// All inputs, archives first, each list in configured order
    pub fn inputs(&self) -> Vec<Input> {
        self.input
            .archives
            .iter()
            .cloned()
            .map(Input::Archive)
            .chain(self.input.files.iter().cloned().map(Input::DataFile))
            .collect()
    }

    /// Output path, falling back to the default report name
    pub fn output_path(&self) -> PathBuf {
        self.output
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(REPORT_FILE_NAME))
    }
}

/// Load configuration from a TOML file
///
/// Relative input and output paths are resolved against the directory the
/// config file lives in.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if let Some(base) = path.parent() {
        resolve_paths(&mut config, base);
    }

    Ok(config)
}

fn resolve_paths(config: &mut AppConfig, base: &Path) {
    let resolve = |p: &mut PathBuf| {
        if p.is_relative() {
            *p = base.join(&*p);
        }
    };
    config.input.archives.iter_mut().for_each(resolve);
    config.input.files.iter_mut().for_each(resolve);
    config.output.path.iter_mut().for_each(resolve);
}
