//! End-to-end scenarios exercising the orchestrator, agent executor, and
//! session store together, plus property tests over random transition
//! sequences, arbitrary action metadata, and USF round-trips.

use obot::agent::Agent;
use obot::domain::{ActionKind, ActionStatus, NoteSource, Session};
use obot::orchestrator::{Executor, HeuristicPolicy, Orchestrator, OrchestratorEvent};
use obot::{ObotError, OrchestratorState, PersistenceActor};
use tempfile::tempdir;

struct NoopExecutor;

#[async_trait::async_trait]
impl Executor for NoopExecutor {
    async fn execute(&self, _phase_id: u8, _process_id: u8) -> Result<(), ObotError> {
        Ok(())
    }
}

/// S1 - Canonical happy path: every phase runs P1-P2-P3 once, in order,
/// and the prompt terminates cleanly with all five phases completed.
#[tokio::test]
async fn s1_canonical_happy_path() {
    let mut orchestrator = Orchestrator::new();
    orchestrator.set_task("Add a greeting function to pkg/util.go");
    let mut events = orchestrator.subscribe();

    orchestrator.run(&HeuristicPolicy, &NoopExecutor).await.unwrap();

    assert_eq!(orchestrator.state(), OrchestratorState::PromptTerminated);
    assert_eq!(orchestrator.flow_code().as_str(), "S1P1P2P3S2P1P2P3S3P1P2P3S4P1P2P3S5P1P2P3");
    assert_eq!(orchestrator.stats().completed_phases, vec![1, 2, 3, 4, 5]);

    let mut process_ends = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, OrchestratorEvent::ProcessEnd { .. }) {
            process_ends += 1;
        }
    }
    assert_eq!(process_ends, 15);
}

/// S2 - Revisit within a phase: Verify (P2) is re-entered from P3 before
/// the schedule terminates.
#[test]
fn s2_revisit_within_a_phase() {
    let mut orchestrator = Orchestrator::new();
    orchestrator.select_schedule(3).unwrap();
    for proc in [1u8, 2, 3, 2, 3] {
        orchestrator.select_process(proc).unwrap();
        orchestrator.complete_process().unwrap();
        orchestrator.terminate_process().unwrap();
    }
    assert_eq!(orchestrator.flow_code().as_str(), "S3P1P2P3P2P3");
    assert!(orchestrator.terminate_schedule().is_ok());
}

/// S3 - Illegal jump: P3 requested directly from P1 is rejected with a
/// navigation error citing the permitted set, and the orchestrator cannot
/// terminate the prompt afterward since not every phase has run to
/// completion.
#[test]
fn s3_illegal_jump_rejected_and_blocks_termination() {
    let mut orchestrator = Orchestrator::new();
    orchestrator.select_schedule(1).unwrap();
    orchestrator.select_process(1).unwrap();
    orchestrator.complete_process().unwrap();
    orchestrator.terminate_process().unwrap();

    let err = orchestrator.select_process(3).unwrap_err();
    assert_eq!(err.kind(), "navigation");
    assert!(err.to_string().contains("from P1 allowed: {P1, P2}"));

    orchestrator.mark_error();
    assert!(orchestrator.flow_code().as_str().ends_with('X'));
    assert!(orchestrator.terminate_prompt().is_err());
}

/// S4 - Premature prompt termination: only Knowledge and Plan have run;
/// `TerminatePrompt` must reject and leave the flow code unchanged.
#[test]
fn s4_premature_termination_rejected() {
    let mut orchestrator = Orchestrator::new();
    for phase in [1u8, 2] {
        orchestrator.select_schedule(phase).unwrap();
        for proc in [1u8, 2, 3] {
            orchestrator.select_process(proc).unwrap();
            orchestrator.complete_process().unwrap();
            orchestrator.terminate_process().unwrap();
        }
        orchestrator.terminate_schedule().unwrap();
    }

    let flow_before = orchestrator.flow_code().as_str().to_string();
    assert!(!orchestrator.can_terminate_prompt());
    assert!(orchestrator.terminate_prompt().is_err());
    assert_eq!(orchestrator.flow_code().as_str(), flow_before);
}

/// S5 - Agent failure recovery: a failing `RunCommand` is recorded as a
/// failed action with an error, the orchestrator marks the flow code, and
/// the process is retried and this time succeeds.
#[tokio::test]
async fn s5_agent_failure_then_retry_succeeds() {
    let temp = tempdir().unwrap();
    let mut agent = Agent::new(temp.path());
    let mut orchestrator = Orchestrator::new();
    orchestrator.select_schedule(3).unwrap(); // Implement
    orchestrator.select_process(1).unwrap();

    agent.begin_execute(3, 1).await.unwrap();
    let failure = agent.dispatch(ActionKind::run_command("exit 3")).await;
    assert!(failure.is_err());
    agent.end_execute().await;

    assert_eq!(agent.log().actions().len(), 1);
    let failed = &agent.log().actions()[0];
    assert_eq!(failed.metadata.status, Some(ActionStatus::Failed));
    assert!(failed.metadata.error.is_some());

    orchestrator.mark_error();
    orchestrator.add_note("RunCommand failed: test exited non-zero", NoteSource::System);
    orchestrator.terminate_process().unwrap();

    // Policy observes the failure note and repeats P1.
    assert_eq!(orchestrator.unreviewed_notes().len(), 1);
    orchestrator.select_process(1).unwrap();

    agent.begin_execute(3, 1).await.unwrap();
    let retry = agent.dispatch(ActionKind::run_command("exit 0")).await;
    assert!(retry.is_ok());
    agent.end_execute().await;

    assert_eq!(agent.log().actions().len(), 2);
    assert_eq!(agent.log().actions()[1].metadata.status, Some(ActionStatus::Success));
    orchestrator.complete_process().unwrap();
    orchestrator.terminate_process().unwrap();
    orchestrator.mark_notes_reviewed();
    assert!(orchestrator.unreviewed_notes().is_empty());
}

/// S6 - Session portability: persist mid-traversal, reload, and keep
/// driving the same orchestrator state forward.
#[tokio::test]
async fn s6_session_portability_across_reload() {
    let config_root = tempdir().unwrap();
    let persistence = PersistenceActor::spawn(config_root.path());

    let mut orchestrator = Orchestrator::new();
    orchestrator.select_schedule(1).unwrap();
    orchestrator.select_process(1).unwrap();
    orchestrator.complete_process().unwrap();
    orchestrator.terminate_process().unwrap();
    orchestrator.select_process(2).unwrap();
    orchestrator.complete_process().unwrap();
    orchestrator.terminate_process().unwrap();
    orchestrator.select_process(3).unwrap();
    orchestrator.complete_process().unwrap();
    orchestrator.terminate_process().unwrap();
    orchestrator.terminate_schedule().unwrap();
    orchestrator.select_schedule(2).unwrap();
    orchestrator.select_process(1).unwrap();
    orchestrator.complete_process().unwrap();
    orchestrator.terminate_process().unwrap();
    assert_eq!(orchestrator.flow_code().as_str(), "S1P1P2P3S2P1");

    let mut session = Session::new("sess-portable", "add a greeting function", "/work");
    session.orchestration_state.flow_code = orchestrator.flow_code().clone();
    session.stats.total_tokens = 120;
    persistence.save(session).await.unwrap();

    let reloaded = persistence.load("sess-portable").await.unwrap();
    assert_eq!(reloaded.orchestration_state.flow_code.as_str(), "S1P1P2P3S2P1");
    assert_eq!(reloaded.stats.total_tokens, 120);

    // Resume driving the same traversal forward to S3.
    orchestrator.select_process(2).unwrap();
    orchestrator.complete_process().unwrap();
    orchestrator.terminate_process().unwrap();
    orchestrator.select_process(3).unwrap();
    orchestrator.complete_process().unwrap();
    orchestrator.terminate_process().unwrap();
    orchestrator.terminate_schedule().unwrap();
    orchestrator.select_schedule(3).unwrap();
    assert!(orchestrator.flow_code().as_str().starts_with("S1P1P2P3S2P1P2P3S3"));

    let mut resumed = reloaded;
    resumed.orchestration_state.flow_code = orchestrator.flow_code().clone();
    resumed.stats.total_tokens += 30;
    persistence.save(resumed).await.unwrap();

    let final_session = persistence.load("sess-portable").await.unwrap();
    assert_eq!(final_session.stats.total_tokens, 150);
    assert!(final_session.orchestration_state.flow_code.as_str().starts_with("S1P1P2P3S2P1P2P3S3"));
}

mod proptests {
    use obot::domain::{Action, ActionKind, ActionStatus, Session};
    use obot::orchestrator::{can_terminate_phase, is_valid_navigation, permitted_next};
    use proptest::prelude::*;

    /// A random valid transition sequence of at most 30 steps: at each
    /// step, pick uniformly among the permitted next process ids from the
    /// last one (starting from 0).
    fn valid_transition_sequence() -> impl Strategy<Value = Vec<u8>> {
        (0usize..30).prop_flat_map(|len| {
            let mut strategy = Just(Vec::<u8>::new()).boxed();
            for _ in 0..len {
                strategy = strategy
                    .prop_flat_map(|seq: Vec<u8>| {
                        let last = *seq.last().unwrap_or(&0u8);
                        let choices = permitted_next(last).to_vec();
                        prop::sample::select(choices).prop_map(move |next| {
                            let mut seq = seq.clone();
                            seq.push(next);
                            seq
                        })
                    })
                    .boxed();
            }
            strategy
        })
    }

    proptest! {
        #[test]
        fn random_valid_sequences_never_violate_navigation(seq in valid_transition_sequence()) {
            let mut last = 0u8;
            for &step in &seq {
                prop_assert!(is_valid_navigation(last, step));
                last = step;
            }
            if last == 3 {
                prop_assert!(can_terminate_phase(last));
            }
        }

        #[test]
        fn arbitrary_action_metadata_always_present_after_dispatch(
            ordinal in 1u64..10_000,
            phase in 1u8..=5,
            process in 1u8..=3,
            succeed in any::<bool>(),
        ) {
            let kind = if succeed { ActionKind::complete_process() } else { ActionKind::create_file("../escape.txt", "x") };
            let mut action = Action::new(ordinal, kind, phase, process, None);
            action.metadata.status = Some(if succeed { ActionStatus::Success } else { ActionStatus::Failed });
            action.metadata.duration_ms = Some(0);
            prop_assert!(action.metadata.duration_ms.is_some());
            prop_assert!(action.metadata.status.is_some());
            prop_assert!(action.id.starts_with('A'));
        }

        #[test]
        fn random_usf_records_round_trip(
            description in "[a-zA-Z0-9 ]{1,40}",
            workspace in "[a-zA-Z0-9/_-]{1,20}",
            tokens in 0u64..1_000_000,
        ) {
            let mut session = Session::new("sess-prop", description, workspace);
            session.stats.total_tokens = tokens;
            let json = serde_json::to_string(&session).unwrap();
            let reloaded: Session = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(reloaded.session_id, session.session_id);
            prop_assert_eq!(reloaded.task.description, session.task.description);
            prop_assert_eq!(reloaded.workspace.path, session.workspace.path);
            prop_assert_eq!(reloaded.stats.total_tokens, session.stats.total_tokens);
        }
    }
}
