//! The data model shared by every component: Phase/Process, the flow code,
//! typed Actions, Notes, Sessions and Checkpoints, and the model-selection
//! vocabulary (ModelRole, RamTier, Intent).

mod action;
mod context_section;
mod flow_code;
mod model;
mod note;
mod orchestrator_state;
mod phase;
mod process;
mod session;

pub use action::{
    Action, ActionKind, ActionMetadata, ActionStatus, DelegateRequest, DiffLine, DiffSummary, Edit, EditKind,
    FileMetadata, LineRange,
};
pub use context_section::{ContextSection, ContextSectionKind};
pub use flow_code::{FlowCode, FlowToken};
pub use model::{Intent, ModelPool, ModelRole, RamTier};
pub use note::{Note, NoteSource};
pub use orchestrator_state::OrchestratorState;
pub use phase::Phase;
pub use process::{consultation_for, ConsultationKind, Process};
pub use session::{
    Checkpoint, ConversationTurn, FileModification, OrchestrationStateRecord, Session, SessionStats,
    SourcePlatform, Task, TaskStatus, Workspace, USF_VERSION,
};
