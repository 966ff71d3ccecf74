//! obot - local-first agentic orchestrator
//!
//! Drives a fixed five-phase, three-process pipeline: an Orchestrator state
//! machine validates navigation and produces an auditable flow code, an
//! Agent Executor dispatches typed actions against the workspace, a Model
//! Coordinator resolves roles to concrete model ids over the host's RAM
//! tier, a Context Manager assembles token-budgeted prompts, and a Session
//! Store persists the whole traversal as a portable, checkpointable record.
//!
//! # Modules
//!
//! - [`domain`] - the vocabulary: phases, processes, flow codes, actions, sessions
//! - [`cli`] - command-line argument definitions for the `obot` binary
//! - [`orchestrator`] - the state machine and navigation rule table
//! - [`agent`] - the typed-action dispatcher and plugin hooks
//! - [`model`] - intent routing, RAM-tier detection, model coordination
//! - [`backend`] - the `LlmClient` seam to an actual inference process
//! - [`context`] - token-budgeted prompt assembly
//! - [`store`] - session and checkpoint persistence
//! - [`config`] - configuration types and loading
//! - [`rules`] - `.obotrules` project-rule parsing
//! - [`environment`] - bootstrapped ambient state (config, rules, RAM tier)
//! - [`error`] - the crate-wide error taxonomy

pub mod agent;
pub mod backend;
pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod environment;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod rules;
pub mod store;

pub use config::Config;
pub use domain::{
    consultation_for, Action, ActionKind, ActionMetadata, ActionStatus, Checkpoint, ConsultationKind,
    ContextSection, ContextSectionKind, ConversationTurn, DelegateRequest, Edit, FileModification, FlowCode,
    FlowToken, Intent, ModelPool, ModelRole, Note, NoteSource, OrchestrationStateRecord, OrchestratorState, Phase,
    Process, RamTier, Session, SessionStats, SourcePlatform, Task, TaskStatus, Workspace, USF_VERSION,
};
pub use environment::Environment;
pub use error::{NavigationError, ObotError, Result};
pub use orchestrator::{Executor, Orchestrator, Policy};
pub use store::PersistenceActor;
