//! Configuration management for DevSpark Assist

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ai::simulated::SimulatedDelays;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub assistant: AssistantConfig,
    pub simulated: SimulatedDelays,
    pub ollama: OllamaConfig,
    pub workspace: WorkspaceConfig,
    #[serde(skip)]
    pub verbose: bool,
}

/// Which generation backend handles requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Simulated,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub backend: BackendKind,
    pub max_context_items: usize,
    pub max_recent_actions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub endpoint: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub max_tree_depth: usize,
    pub max_buffer_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assistant: AssistantConfig {
                backend: BackendKind::Simulated,
                max_context_items: crate::ai::context::DEFAULT_MAX_CONTEXT_ITEMS,
                max_recent_actions: crate::workspace::actions::DEFAULT_MAX_RECENT_ACTIONS,
            },
            simulated: SimulatedDelays::default(),
            ollama: OllamaConfig {
                endpoint: "http://localhost:11434".to_string(),
                model: "codellama".to_string(),
            },
            workspace: WorkspaceConfig {
                max_tree_depth: crate::workspace::files::DEFAULT_MAX_TREE_DEPTH,
                max_buffer_chars: crate::workspace::editor::DEFAULT_MAX_BUFFER_CHARS,
            },
            verbose: false,
        }
    }
}

/// Get the configuration file path
fn config_path() -> Result<PathBuf> {
    let config_dir = directories::ProjectDirs::from("com", "devspark", "assist")
        .context("Failed to determine config directory")?
        .config_dir()
        .to_path_buf();

    Ok(config_dir.join("config.toml"))
}

/// Load configuration from file or use defaults
pub fn load_config(custom_path: Option<&str>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        PathBuf::from(p)
    } else {
        config_path()?
    };

    if path.exists() {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

/// Initialize configuration file with defaults
pub fn init_config() -> Result<()> {
    let path = config_path()?;

    if path.exists() {
        println!("Configuration file already exists at {:?}", path);
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {:?}", parent))?;
    }

    let default_config = Config::default();
    let content = toml::to_string_pretty(&default_config)
        .context("Failed to serialize default config")?;

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config to {:?}", path))?;

    println!("Configuration initialized at {:?}", path);
    Ok(())
}

/// Show current configuration
pub fn show_config(config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", content);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.assistant.backend, BackendKind::Simulated);
        assert_eq!(parsed.assistant.max_context_items, 20);
        assert_eq!(parsed.ollama.model, "codellama");
    }

    #[test]
    fn load_config_reads_custom_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.assistant.backend = BackendKind::Ollama;
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = load_config(path.to_str()).unwrap();
        assert_eq!(loaded.assistant.backend, BackendKind::Ollama);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let loaded = load_config(Some("/nonexistent/config.toml")).unwrap();
        assert_eq!(loaded.assistant.max_context_items, 20);
    }
}
