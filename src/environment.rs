//! Environment: the bootstrapped ambient state every run needs — loaded
//! config, parsed project rules, and the detected RAM tier — assembled
//! once at startup and threaded through the rest of the core.

use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use tracing::info;

use crate::config::{config_root, Config};
use crate::domain::RamTier;
use crate::model::detect_ram_tier;
use crate::rules::ProjectRules;

pub struct Environment {
    pub config: Config,
    pub rules: ProjectRules,
    pub ram_tier: RamTier,
    pub workspace_root: PathBuf,
    pub config_root: PathBuf,
}

impl Environment {
    pub fn bootstrap(workspace_root: impl Into<PathBuf>, config_path: Option<&PathBuf>) -> Result<Self> {
        let workspace_root = workspace_root.into();
        let config_root = config_root();
        let config = Config::load(config_path, &config_root).context("failed to load configuration")?;
        let rules = ProjectRules::load(&workspace_root);
        let ram_tier = detect_ram_tier();

        info!(?ram_tier, workspace = %workspace_root.display(), "environment bootstrapped");
        Ok(Self { config, rules, ram_tier, workspace_root, config_root })
    }
}

/// Sets up the `tracing` subscriber: a log directory under the platform
/// data dir plus an env-filter defaulting to `info`.
pub fn init_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("obot").join("logs");
    std::fs::create_dir_all(&log_dir).context("failed to create log directory")?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!(log_dir = %log_dir.display(), "logging initialized");
    Ok(())
}

pub fn default_workspace_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf())
}
