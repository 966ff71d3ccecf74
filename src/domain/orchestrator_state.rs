//! OrchestratorState: the coarse lifecycle state of the orchestrator itself,
//! distinct from the flow code (which records phase/process history).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrchestratorState {
    Begin,
    Selecting,
    Active,
    Suspended,
    PromptTerminated,
}

impl OrchestratorState {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrchestratorState::PromptTerminated)
    }
}

impl std::fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrchestratorState::Begin => "Begin",
            OrchestratorState::Selecting => "Selecting",
            OrchestratorState::Active => "Active",
            OrchestratorState::Suspended => "Suspended",
            OrchestratorState::PromptTerminated => "PromptTerminated",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_prompt_terminated_is_terminal() {
        assert!(OrchestratorState::PromptTerminated.is_terminal());
        assert!(!OrchestratorState::Active.is_terminal());
        assert!(!OrchestratorState::Suspended.is_terminal());
    }
}
