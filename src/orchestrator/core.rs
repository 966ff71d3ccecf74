//! The Orchestrator: drives the 5x3 state machine, validates every
//! transition, produces an auditable flow code, gates termination, and owns
//! session notes.

use std::collections::HashMap;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::domain::{ConsultationKind, FlowCode, Note, NoteSource, OrchestratorState, Phase, Process};
use crate::error::{ObotError, Result};

use super::events::{OrchestratorEvent, EVENT_CHANNEL_CAPACITY};
use super::navigation::{can_terminate_phase, validate_transition};
use super::policy::{Executor, PhaseSelectionContext, Policy};

/// An immutable view of the orchestrator's counters, safe to hand to
/// external readers without exposing mutable state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub total_tokens: u64,
    pub actions_recorded: u64,
    pub phase_counts: HashMap<u8, u32>,
    pub completed_phases: Vec<u8>,
}

struct Schedule {
    phase: Phase,
    processes: [Process; 3],
    /// The last process id terminated within this schedule; 0 before any
    /// process has terminated. This is the "from" side of the Navigation
    /// Rule Table for the next `SelectProcess` call.
    last_terminated: u8,
    active: Option<u8>,
}

pub struct Orchestrator {
    state: OrchestratorState,
    task: Option<String>,
    flow_code: FlowCode,
    phase_history: Vec<u8>,
    phase_counts: HashMap<u8, u32>,
    completed_phases: Vec<u8>,
    most_recently_terminated_phase: Option<u8>,
    schedule: Option<Schedule>,
    notes: Vec<Note>,
    total_tokens: u64,
    actions_recorded: u64,
    next_note_ordinal: u64,
    events_tx: broadcast::Sender<OrchestratorEvent>,
}

impl Orchestrator {
    pub fn new() -> Self {
        let (events_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: OrchestratorState::Begin,
            task: None,
            flow_code: FlowCode::new(),
            phase_history: Vec::new(),
            phase_counts: HashMap::new(),
            completed_phases: Vec::new(),
            most_recently_terminated_phase: None,
            schedule: None,
            notes: Vec::new(),
            total_tokens: 0,
            actions_recorded: 0,
            next_note_ordinal: 0,
            events_tx,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.events_tx.subscribe()
    }

    pub fn set_task(&mut self, text: impl Into<String>) {
        self.task = Some(text.into());
    }

    pub fn task(&self) -> Option<&str> {
        self.task.as_deref()
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn flow_code(&self) -> &FlowCode {
        &self.flow_code
    }

    pub fn stats(&self) -> Snapshot {
        Snapshot {
            total_tokens: self.total_tokens,
            actions_recorded: self.actions_recorded,
            phase_counts: self.phase_counts.clone(),
            completed_phases: self.completed_phases.clone(),
        }
    }

    pub fn record_tokens(&mut self, n: u64) {
        self.total_tokens += n;
    }

    pub fn record_actions(&mut self, n: u64) {
        self.actions_recorded += n;
    }

    pub fn add_note(&mut self, content: impl Into<String>, source: NoteSource) {
        let id = format!("N{}", self.next_note_ordinal);
        self.next_note_ordinal += 1;
        self.notes.push(Note::new(id, content, source));
    }

    pub fn unreviewed_notes(&self) -> Vec<&Note> {
        self.notes.iter().filter(|n| !n.reviewed).collect()
    }

    pub fn mark_notes_reviewed(&mut self) {
        for note in &mut self.notes {
            note.reviewed = true;
        }
    }

    /// Enter a phase. Fails when the id is outside 1..5. On success:
    /// allocates a schedule of three processes, appends `S<id>` to the flow
    /// code, increments per-phase counts, records start time, and fires
    /// `ScheduleStart`.
    pub fn select_schedule(&mut self, phase_id: u8) -> Result<()> {
        let phase = Phase::from_id(phase_id)
            .ok_or_else(|| ObotError::Validation(format!("phase id out of range 1..5: {phase_id}")))?;
        debug!(phase_id, "Orchestrator::select_schedule");
        self.schedule = Some(Schedule { phase, processes: Process::schedule_for(phase), last_terminated: 0, active: None });
        self.flow_code.append_phase(phase_id);
        self.phase_history.push(phase_id);
        *self.phase_counts.entry(phase_id).or_insert(0) += 1;
        let _ = self.events_tx.send(OrchestratorEvent::ScheduleStart { phase_id });
        Ok(())
    }

    /// Enter a process. Fails when no phase is active, id not in {1,2,3},
    /// or the transition violates the Navigation Rule Table.
    pub fn select_process(&mut self, process_id: u8) -> Result<()> {
        if !(1..=3).contains(&process_id) {
            return Err(ObotError::Validation(format!("process id out of range 1..3: {process_id}")));
        }
        let schedule = self.schedule.as_mut().ok_or_else(|| ObotError::Validation("no phase is active".into()))?;
        let phase_id = schedule.phase.id();
        validate_transition(schedule.last_terminated, process_id, phase_id)?;
        debug!(phase_id, process_id, "Orchestrator::select_process");
        schedule.processes[(process_id - 1) as usize].start();
        schedule.active = Some(process_id);
        self.flow_code.append_process(process_id);
        let _ = self.events_tx.send(OrchestratorEvent::ProcessStart { phase_id, process_id });
        Ok(())
    }

    pub fn complete_process(&mut self) -> Result<()> {
        let schedule = self.schedule.as_mut().ok_or_else(|| ObotError::Validation("no phase is active".into()))?;
        let active = schedule.active.ok_or_else(|| ObotError::Validation("no process is active".into()))?;
        schedule.processes[(active - 1) as usize].complete();
        Ok(())
    }

    pub fn terminate_process(&mut self) -> Result<()> {
        let phase_id;
        let process_id;
        {
            let schedule = self.schedule.as_mut().ok_or_else(|| ObotError::Validation("no phase is active".into()))?;
            let active = schedule.active.take().ok_or_else(|| ObotError::Validation("no process is active".into()))?;
            schedule.processes[(active - 1) as usize].terminate();
            schedule.last_terminated = active;
            phase_id = schedule.phase.id();
            process_id = active;
        }
        let _ = self.events_tx.send(OrchestratorEvent::ProcessEnd { phase_id, process_id });
        Ok(())
    }

    /// Permitted iff the most recent terminated process was P3.
    pub fn can_terminate_schedule(&self) -> bool {
        self.schedule.as_ref().is_some_and(|s| can_terminate_phase(s.last_terminated))
    }

    pub fn terminate_schedule(&mut self) -> Result<()> {
        if !self.can_terminate_schedule() {
            return Err(ObotError::Validation("schedule can only terminate from P3".into()));
        }
        let phase_id = self.schedule.as_ref().unwrap().phase.id();
        self.completed_phases.push(phase_id);
        self.most_recently_terminated_phase = Some(phase_id);
        self.schedule = None;
        info!(phase_id, "Orchestrator::terminate_schedule");
        let _ = self.events_tx.send(OrchestratorEvent::ScheduleEnd { phase_id });
        Ok(())
    }

    /// Every phase has been entered at least once *and* the most recently
    /// terminated phase is Production.
    pub fn can_terminate_prompt(&self) -> bool {
        let all_entered = (1..=5u8).all(|id| self.phase_history.contains(&id));
        all_entered && self.most_recently_terminated_phase == Some(Phase::Production.id())
    }

    pub fn terminate_prompt(&mut self) -> Result<()> {
        if !self.can_terminate_prompt() {
            return Err(ObotError::Validation(
                "prompt cannot terminate: not every phase has been entered, or Production was not the most recently terminated phase".into(),
            ));
        }
        self.state = OrchestratorState::PromptTerminated;
        Ok(())
    }

    pub fn mark_error(&mut self) {
        self.flow_code.append_error();
        warn!(flow_code = %self.flow_code, "Orchestrator::mark_error");
        let _ = self.events_tx.send(OrchestratorEvent::Error { flow_code: self.flow_code.clone() });
    }

    /// The consultation policy for the currently active process, if any.
    pub fn active_consultation(&self) -> Option<(ConsultationKind, Option<u64>, Option<&'static str>)> {
        let schedule = self.schedule.as_ref()?;
        let active = schedule.active?;
        Some(crate::domain::consultation_for(schedule.phase, active))
    }

    /// The main loop: drives phase/process selection via `policy` and
    /// hands execution of each process to `executor`, until the prompt
    /// terminates or the executor returns an unrecoverable error.
    pub async fn run(&mut self, policy: &dyn Policy, executor: &dyn Executor) -> Result<()> {
        while self.state != OrchestratorState::PromptTerminated {
            self.state = OrchestratorState::Selecting;
            let phase_id = {
                let ctx = PhaseSelectionContext {
                    phase_history: &self.phase_history,
                    phase_counts: &self.phase_counts,
                    unreviewed_notes: &self.notes,
                    flow_code: &self.flow_code,
                    task: self.task.as_deref().unwrap_or(""),
                };
                policy.select_phase(&ctx).await?
            };

            if phase_id == 0 {
                if self.can_terminate_prompt() {
                    self.terminate_prompt()?;
                    return Ok(());
                }
                return Err(ObotError::Validation(
                    "policy requested prompt termination but not every phase has been entered and terminated at Production".into(),
                ));
            }

            self.select_schedule(phase_id)?;
            self.state = OrchestratorState::Active;
            let mut last_proc = 0u8;

            loop {
                let (proc_id, end_phase) = policy.select_process(phase_id, last_proc).await?;
                if end_phase {
                    self.terminate_schedule()?;
                    break;
                }

                if let Err(e) = self.select_process(proc_id) {
                    self.mark_error();
                    self.state = OrchestratorState::Suspended;
                    return Err(e);
                }

                match executor.execute(phase_id, proc_id).await {
                    Ok(()) => {}
                    Err(e) => {
                        self.mark_error();
                        self.state = OrchestratorState::Suspended;
                        return Err(e);
                    }
                }

                self.complete_process()?;
                self.terminate_process()?;
                self.mark_notes_reviewed();
                last_proc = proc_id;
            }
        }
        Ok(())
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}
