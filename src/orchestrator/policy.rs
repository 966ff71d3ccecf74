//! Policy and Executor contracts. Phase/process selection and action
//! execution are each a small trait rather than a callback closure, making
//! heuristic/LLM substitution trivial and the orchestrator unit-testable
//! with a fake policy.

use async_trait::async_trait;

use crate::domain::{FlowCode, Note};
use crate::error::Result;

/// What the phase-selection half of a policy needs to see.
pub struct PhaseSelectionContext<'a> {
    pub phase_history: &'a [u8],
    pub phase_counts: &'a std::collections::HashMap<u8, u32>,
    pub unreviewed_notes: &'a [Note],
    pub flow_code: &'a FlowCode,
    pub task: &'a str,
}

/// The pluggable decision-maker for phase/process selection. May be
/// LLM-backed (prompting the Orchestrator role) or heuristic.
#[async_trait]
pub trait Policy: Send + Sync {
    /// Pick the next phase. Returning `0` requests prompt termination.
    async fn select_phase(&self, ctx: &PhaseSelectionContext<'_>) -> Result<u8>;

    /// Pick the next process given the current phase and the last process
    /// id entered (`0` if none yet this phase). `(process_id, end_phase)`;
    /// `end_phase = true` requests phase termination instead of a new process.
    async fn select_process(&self, phase_id: u8, last_process: u8) -> Result<(u8, bool)>;
}

/// The per-process callable the orchestrator invokes between
/// `SelectProcess` and `TerminateProcess`; typically calls the Agent.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, phase_id: u8, process_id: u8) -> Result<()>;
}
