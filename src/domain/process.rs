//! Process: one of the three ordered steps inside a phase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::Phase;

/// Whether a process requires stopping for a human before continuing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationKind {
    None,
    Optional,
    Mandatory,
}

/// The consultation policy for a given (phase, process) pair.
pub fn consultation_for(phase: Phase, process_id: u8) -> (ConsultationKind, Option<u64>, Option<&'static str>) {
    match (phase, process_id) {
        (Phase::Plan, 2) => (ConsultationKind::Optional, Some(60), Some("assume best practice")),
        (Phase::Implement, 3) => (ConsultationKind::Mandatory, Some(300), Some("assume approval")),
        _ => (ConsultationKind::None, None, None),
    }
}

/// One of the three ordered steps inside a phase. Created when
/// `SelectSchedule` initializes the phase; `start_time` set on
/// `SelectProcess`; `completed`/`terminated` flip as the orchestrator drives
/// the process through its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub id: u8,
    pub phase: Phase,
    pub name: &'static str,
    pub consultation: ConsultationKind,
    pub consultation_timeout_secs: Option<u64>,
    pub consultation_fallback: Option<&'static str>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub completed: bool,
    pub terminated: bool,
}

impl Process {
    /// Build the three processes for a freshly-selected phase, with
    /// consultation kinds precomputed.
    pub fn schedule_for(phase: Phase) -> [Process; 3] {
        let names = phase.process_names();
        std::array::from_fn(|i| {
            let id = (i + 1) as u8;
            let (consultation, timeout, fallback) = consultation_for(phase, id);
            Process {
                id,
                phase,
                name: names[i],
                consultation,
                consultation_timeout_secs: timeout,
                consultation_fallback: fallback,
                start_time: None,
                end_time: None,
                completed: false,
                terminated: false,
            }
        })
    }

    pub fn start(&mut self) {
        self.start_time = Some(Utc::now());
    }

    pub fn complete(&mut self) {
        self.completed = true;
    }

    pub fn terminate(&mut self) {
        self.terminated = true;
        self.end_time = Some(Utc::now());
    }
}
