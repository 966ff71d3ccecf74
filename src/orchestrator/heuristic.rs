//! The deterministic fallback policy: used when no LLM-backed policy is
//! configured, or when the LLM returns an unparseable response. Guarantees
//! termination in finite steps and always leaves every phase entered at
//! least once with Production terminated last.

use async_trait::async_trait;

use super::policy::{Executor, PhaseSelectionContext, Policy};
use crate::domain::Phase;
use crate::error::Result;

#[derive(Debug, Default)]
pub struct HeuristicPolicy;

#[async_trait]
impl Policy for HeuristicPolicy {
    /// Pick the lowest-indexed phase whose count is 0; if all phases have
    /// run at least once, pick Production.
    async fn select_phase(&self, ctx: &PhaseSelectionContext<'_>) -> Result<u8> {
        for phase in Phase::ALL {
            if ctx.phase_counts.get(&phase.id()).copied().unwrap_or(0) == 0 {
                return Ok(phase.id());
            }
        }
        Ok(Phase::Production.id())
    }

    /// Strict linear `0 -> 1 -> 2 -> 3 -> end-phase`.
    async fn select_process(&self, _phase_id: u8, last_process: u8) -> Result<(u8, bool)> {
        match last_process {
            0 => Ok((1, false)),
            1 => Ok((2, false)),
            2 => Ok((3, false)),
            _ => Ok((0, true)),
        }
    }
}

/// An `Executor` that merely marks every process complete; used when the
/// orchestrator is wired to a heuristic policy for demonstration/testing
/// without a real Agent Executor behind it.
#[derive(Debug, Default)]
pub struct NoopExecutor;

#[async_trait]
impl Executor for NoopExecutor {
    async fn execute(&self, _phase_id: u8, _process_id: u8) -> Result<()> {
        Ok(())
    }
}
