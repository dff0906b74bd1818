use crate::chat::ModelSelection;
use crate::core::error::DuochatError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    pub default_model: Option<ModelSelection>,
    #[serde(default)]
    pub openrouter: ProviderConfig,
    #[serde(default)]
    pub gemini: ProviderConfig,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".duochat")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn input_history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    /// Loads the config file, writing a default one on first run. Missing
    /// API keys are fine here; they are only required at call time.
    pub fn load() -> Result<Config, DuochatError> {
        let path = Self::config_path();

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let mut config = serde_yml::from_str::<Config>(&contents)
                .map_err(|e| DuochatError::Config(format!("Parse {}: {}", path.display(), e)))?;
            config.overlay_env(|name| std::env::var(name).ok());
            return Ok(config);
        }

        if let Some(config_dir) = path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
            }
        }

        let mut config = Config::default();
        let _ = config.save();
        config.overlay_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Environment variables win over file values.
    fn overlay_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("OPENROUTER_API_KEY") {
            self.openrouter.api_key = Some(key);
        }
        if let Some(url) = var("OPENROUTER_BASE_URL") {
            self.openrouter.base_url = Some(url);
        }
        if let Some(key) = var("GEMINI_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(url) = var("GEMINI_BASE_URL") {
            self.gemini.base_url = Some(url);
        }
    }

    pub fn save(&self) -> Result<(), DuochatError> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(&path, yaml_content)?;
        Ok(())
    }
}
