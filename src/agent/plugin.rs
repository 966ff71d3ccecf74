//! Plugin: lifecycle hooks invoked before/after each action and each
//! process execution. Registration is ordered and respected at dispatch
//! time.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::Action;
use crate::error::Result;

#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// Errors here abort the action before dispatch.
    async fn on_before_action(&self, _action: &Action) -> Result<()> {
        Ok(())
    }

    /// Errors here are non-fatal; logged and ignored.
    async fn on_after_action(&self, _action: &Action) -> Result<()> {
        Ok(())
    }

    async fn on_before_execute(&self, _phase_id: u8, _process_id: u8) -> Result<()> {
        Ok(())
    }

    async fn on_after_execute(&self, _phase_id: u8, _process_id: u8) -> Result<()> {
        Ok(())
    }
}

/// An ordered set of registered plugins.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub async fn before_action(&self, action: &Action) -> Result<()> {
        for plugin in &self.plugins {
            plugin.on_before_action(action).await?;
        }
        Ok(())
    }

    pub async fn after_action(&self, action: &Action) {
        for plugin in &self.plugins {
            if let Err(e) = plugin.on_after_action(action).await {
                debug!(plugin = plugin.name(), error = %e, "plugin on_after_action failed (non-fatal)");
            }
        }
    }

    pub async fn before_execute(&self, phase_id: u8, process_id: u8) -> Result<()> {
        for plugin in &self.plugins {
            plugin.on_before_execute(phase_id, process_id).await?;
        }
        Ok(())
    }

    pub async fn after_execute(&self, phase_id: u8, process_id: u8) {
        for plugin in &self.plugins {
            if let Err(e) = plugin.on_after_execute(phase_id, process_id).await {
                debug!(plugin = plugin.name(), error = %e, "plugin on_after_execute failed (non-fatal)");
            }
        }
    }
}

/// Logs every hook invocation at `debug!`; registered ahead of user plugins
/// by default.
pub struct LoggingPlugin;

#[async_trait]
impl Plugin for LoggingPlugin {
    fn name(&self) -> &str {
        "logging"
    }

    async fn on_before_action(&self, action: &Action) -> Result<()> {
        debug!(action_id = %action.id, kind = action.kind.name(), "on_before_action");
        Ok(())
    }

    async fn on_after_action(&self, action: &Action) -> Result<()> {
        debug!(action_id = %action.id, status = ?action.metadata.status, "on_after_action");
        Ok(())
    }
}
