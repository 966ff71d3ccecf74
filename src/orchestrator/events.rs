//! Orchestrator events, broadcast to external observers (UI/telemetry) so
//! they never need to reach into mutable state.

use crate::domain::FlowCode;

#[derive(Debug, Clone)]
pub enum OrchestratorEvent {
    ScheduleStart { phase_id: u8 },
    ScheduleEnd { phase_id: u8 },
    ProcessStart { phase_id: u8, process_id: u8 },
    ProcessEnd { phase_id: u8, process_id: u8 },
    Error { flow_code: FlowCode },
}

/// Default channel capacity for the orchestrator's event broadcast. Slow
/// subscribers drop events rather than blocking the orchestrator loop.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
