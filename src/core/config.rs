//! Configuration management for nb2md.
//!
//! Handles loading configuration from TOML files. Every field has a default,
//! so a missing file behaves exactly like an empty one.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = ".nb2md.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tree conversion settings
    pub convert: ConvertConfig,

    /// Markdown output settings
    pub markdown: MarkdownConfig,
}

/// Tree conversion settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Root of the notebook tree
    pub input_dir: PathBuf,

    /// Root of the mirrored Markdown tree
    pub output_dir: PathBuf,

    /// Whether to wipe the output directory before converting
    pub clean_output: bool,

    /// Notebook file extension, without the leading dot
    pub extension: String,
}

/// Markdown output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Whether to write the YAML front matter for notebooks with a kernelspec
    pub header: bool,

    /// Code fence language when the notebook does not declare one
    pub default_language: String,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.nb2md.toml` in current directory
    /// 2. `~/.config/nb2md/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = Self::config_dir() {
            let global_config = config_dir.join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("nb2md"))
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./notebooks"),
            output_dir: PathBuf::from("./markdown"),
            clean_output: true,
            extension: "ipynb".to_string(),
        }
    }
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { header: true, default_language: "python".to_string() }
    }
}
