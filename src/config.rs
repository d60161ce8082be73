//! Configuration management with YAML support

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ollama::DEFAULT_HOST;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Inference service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_model")]
    pub model: String,
}

// Default value functions
fn default_database_path() -> String {
    "~/.local/share/dittseek/dittseek.db".to_string()
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_model() -> String {
    "deepseek-r1:1.5b".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            model: default_model(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./dittseek.yaml (current directory)
    /// 3. ~/.config/dittseek/dittseek.yaml
    pub fn load(path: &str) -> Result<Self> {
        let search_paths = vec![
            shellexpand::tilde(path).to_string(),
            "dittseek.yaml".to_string(),
            shellexpand::tilde("~/.config/dittseek/dittseek.yaml").to_string(),
        ];

        for search_path in &search_paths {
            if std::path::Path::new(search_path).exists() {
                let content = std::fs::read_to_string(search_path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Get the database path, expanding ~ to home directory
    pub fn database_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.database.path).to_string();
        PathBuf::from(expanded)
    }
}
