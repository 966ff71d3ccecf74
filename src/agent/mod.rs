//! The Agent Executor (component C5): a typed-action dispatcher with
//! lifecycle hooks, validation, metadata, and plugin points.

mod core;
mod delegator;
mod handlers;
mod log;
mod plugin;
mod validation;

pub use core::{Agent, ActionCallback};
pub use delegator::{DelegationOutcome, Delegator, UnavailableDelegator};
pub use log::ActionLog;
pub use plugin::{LoggingPlugin, Plugin, PluginRegistry};
pub use validation::{validate_action, validate_path};
