//! The Agent Executor (C5): receives typed Action requests, validates
//! inputs, invokes the action handler, stamps metadata, records to the
//! audit log, and invokes plugin hooks around each action and each process
//! execution.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::domain::{Action, ActionKind, ActionStatus};
use crate::error::{ObotError, Result};

use super::delegator::{Delegator, UnavailableDelegator};
use super::handlers;
use super::log::ActionLog;
use super::plugin::{LoggingPlugin, PluginRegistry};
use super::validation::validate_action;

pub type ActionCallback = Box<dyn Fn(&Action) + Send + Sync>;

pub struct Agent {
    root: PathBuf,
    plugins: PluginRegistry,
    delegator: Arc<dyn Delegator>,
    log: ActionLog,
    executing: Option<(u8, u8)>,
    next_ordinal: u64,
    action_callback: Option<ActionCallback>,
}

impl Agent {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut plugins = PluginRegistry::new();
        plugins.register(Box::new(LoggingPlugin));
        Self {
            root: root.into(),
            plugins,
            delegator: Arc::new(UnavailableDelegator),
            log: ActionLog::new(),
            executing: None,
            next_ordinal: 0,
            action_callback: None,
        }
    }

    pub fn with_delegator(mut self, delegator: Arc<dyn Delegator>) -> Self {
        self.delegator = delegator;
        self
    }

    pub fn register_plugin(&mut self, plugin: Box<dyn super::plugin::Plugin>) {
        self.plugins.register(plugin);
    }

    pub fn on_action(&mut self, callback: ActionCallback) {
        self.action_callback = Some(callback);
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn is_executing(&self) -> bool {
        self.executing.is_some()
    }

    /// Fires `OnBeforeExecute`; must be paired with `end_execute`.
    pub async fn begin_execute(&mut self, phase_id: u8, process_id: u8) -> Result<()> {
        if self.executing.is_some() {
            return Err(ObotError::Validation("agent is already executing a process".into()));
        }
        self.plugins.before_execute(phase_id, process_id).await?;
        self.executing = Some((phase_id, process_id));
        Ok(())
    }

    /// Fires `OnAfterExecute`; clears the executing state regardless of
    /// whether hooks succeed.
    pub async fn end_execute(&mut self) {
        if let Some((phase_id, process_id)) = self.executing.take() {
            self.plugins.after_execute(phase_id, process_id).await;
        }
    }

    /// The single internal dispatch path: validate, handle, stamp metadata,
    /// record to the audit log, run plugin hooks.
    pub async fn dispatch(&mut self, kind: ActionKind) -> Result<Action> {
        let (phase_id, process_id) = self
            .executing
            .ok_or_else(|| ObotError::Validation("dispatch called outside of an executing state".into()))?;

        self.next_ordinal += 1;
        let model = None; // set by the caller via with_model() in a future extension point.
        let mut action = Action::new(self.next_ordinal, kind, phase_id, process_id, model);
        debug!(action_id = %action.id, kind = action.kind.name(), "agent::dispatch");

        self.plugins.before_action(&action).await?;

        let started = Instant::now();

        if let Err(e) = validate_action(&action.kind) {
            action.metadata.status = Some(ActionStatus::Failed);
            action.metadata.error = Some(e.to_string());
            self.finish(&mut action, started).await;
            return Err(e);
        }

        let outcome = handlers::dispatch(&self.root, &action.kind, self.delegator.as_ref()).await;

        let failure = match outcome {
            Ok(o) => {
                action.output = o.output;
                action.diff = o.diff;
                action.metadata.file = o.file;
                action.metadata.exit_code = o.exit_code;
                action.metadata.entry_count = o.entry_count;
                action.metadata.delegation_role = o.delegation_role;
                action.metadata.delegation_tokens = o.delegation_tokens;
                action.metadata.delegation_success = o.delegation_role.map(|_| true);
                action.metadata.status = Some(ActionStatus::Success);
                if matches!(action.kind, ActionKind::ProcessCompleted) {
                    action.metadata.completed_at = Some(chrono::Utc::now());
                }
                None
            }
            Err(e) => {
                action.metadata.status = Some(ActionStatus::Failed);
                action.metadata.error = Some(e.to_string());
                Some(e)
            }
        };

        self.finish(&mut action, started).await;

        match failure {
            Some(e) => Err(e),
            None => Ok(action),
        }
    }

    async fn finish(&mut self, action: &mut Action, started: Instant) {
        action.metadata.duration_ms = Some(started.elapsed().as_millis() as u64);
        if let Some(cb) = &self.action_callback {
            cb(action);
        }
        self.plugins.after_action(action).await;
        self.log.record(action.clone());
    }
}
