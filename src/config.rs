//! Configuration: YAML at `<config-root>/config.yaml`, with fallback
//! defaults and an auto-migration from the legacy
//! `~/.config/obot/config.json` layout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::RamTier;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    pub ollama: OllamaConfig,
    pub models: HashMap<String, RoleModelConfig>,
    pub context: ContextConfig,
    pub quality: HashMap<String, QualityPreset>,
    pub orchestration: OrchestrationConfig,
}

impl Config {
    /// Fallback chain: explicit path, then a project-local `.obotrc.yaml`,
    /// then `<config-root>/config.yaml` (migrating a legacy JSON config
    /// first if needed), then defaults.
    pub fn load(config_path: Option<&PathBuf>, config_root: &Path) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("failed to load config from {}", path.display()));
        }

        let local = PathBuf::from(".obotrc.yaml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!(error = %e, path = %local.display(), "failed to load local config"),
            }
        }

        Self::migrate_legacy_json(config_root)?;

        let user_config = config_root.join("config.yaml");
        if user_config.exists() {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!(error = %e, path = %user_config.display(), "failed to load user config"),
            }
        }

        tracing::info!("no config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("failed to parse config file")?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Converts a legacy `~/.config/obot/config.json` into the unified
    /// YAML layout and installs a back-compat symlink from the old
    /// `ollamabot` config directory name. A no-op if the legacy file is
    /// absent or the yaml already exists.
    fn migrate_legacy_json(config_root: &Path) -> Result<()> {
        let legacy_path = config_root.join("config.json");
        let yaml_path = config_root.join("config.yaml");
        if yaml_path.exists() || !legacy_path.exists() {
            return Ok(());
        }

        let body = std::fs::read_to_string(&legacy_path).context("failed to read legacy config.json")?;
        let config: Self = serde_json::from_str(&body).context("failed to parse legacy config.json")?;
        std::fs::create_dir_all(config_root).context("failed to create config root")?;
        let yaml = serde_yaml::to_string(&config).context("failed to serialize migrated config")?;
        std::fs::write(&yaml_path, yaml).context("failed to write migrated config.yaml")?;
        tracing::info!(path = %yaml_path.display(), "migrated legacy config.json to config.yaml");

        if let Some(legacy_root) = config_root.parent() {
            let ollamabot_root = legacy_root.join("ollamabot");
            if !ollamabot_root.exists() {
                #[cfg(unix)]
                let _ = std::os::unix::fs::symlink(config_root, &ollamabot_root);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub url: String,
    pub timeout_seconds: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self { url: "http://127.0.0.1:11434".to_string(), timeout_seconds: 120 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleModelConfig {
    pub primary: String,
    pub tier_map: HashMap<RamTier, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub max_tokens: u32,
    pub compression: CompressionConfig,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { max_tokens: 8_192, compression: CompressionConfig::default() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub strategy: String,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self { enabled: true, strategy: "semantic-truncation".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityPreset {
    pub iterations: u32,
    pub verification: bool,
    pub target_time_seconds: u64,
}

impl Default for QualityPreset {
    fn default() -> Self {
        Self { iterations: 3, verification: true, target_time_seconds: 120 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationConfig {
    pub default_mode: String,
    pub schedules: Vec<ScheduleConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub id: u8,
    pub processes: Vec<u8>,
    pub model: Option<String>,
}

/// Resolve the platform-appropriate configuration root, honoring the
/// `OBOT_CONFIG_DIR` override used by tests.
pub fn config_root() -> PathBuf {
    if let Ok(dir) = std::env::var("OBOT_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("obot")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_has_ollama_defaults() {
        let config = Config::default();
        assert_eq!(config.ollama.url, "http://127.0.0.1:11434");
        assert_eq!(config.context.max_tokens, 8_192);
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_unspecified_fields() {
        let yaml = "ollama:\n  url: http://localhost:9999\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.ollama.url, "http://localhost:9999");
        assert_eq!(config.ollama.timeout_seconds, 120);
    }

    #[test]
    fn legacy_json_migrates_to_yaml() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("obot");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("config.json"), r#"{"version":"0.9"}"#).unwrap();

        Config::migrate_legacy_json(&root).unwrap();
        assert!(root.join("config.yaml").is_file());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(None, &dir.path().join("obot")).unwrap();
        assert_eq!(config.version, "");
    }
}
