use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::merge::{MergeOptions, DEFAULT_MERGE_OUTPUT};
use crate::split::{SplitOptions, DEFAULT_SPLIT_PREFIX};

/// Configuration for docx-splice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub split: SplitConfig,
    pub merge: MergeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Output files are named `<prefix><n>.docx`
    pub prefix: String,
    /// Drop the segment after the last page break when it is empty
    pub skip_empty_trailing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Output file name
    pub output: PathBuf,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            prefix: DEFAULT_SPLIT_PREFIX.to_string(),
            skip_empty_trailing: false,
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            output: PathBuf::from(DEFAULT_MERGE_OUTPUT),
        }
    }
}

impl Config {
    /// Load configuration from the config directory
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }

        // Return defaults if no config found
        Ok(Config::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docx-splice").join("config.toml"))
    }

    pub fn split_options(&self) -> SplitOptions {
        SplitOptions::default()
            .with_prefix(self.split.prefix.clone())
            .skip_empty_trailing(self.split.skip_empty_trailing)
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions::default().with_output(self.merge.output.clone())
    }
}
