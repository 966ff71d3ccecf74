//! obot CLI entry point. Thin by design: parses arguments, bootstraps the
//! environment, wires the core components together, and renders results.
//! The core itself never prints (see `obot::error`).

use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tokio::sync::Mutex;
use tracing::info;

use obot::backend::OllamaClient;
use obot::cli::{Cli, Command, SessionCommand};
use obot::config::RoleModelConfig;
use obot::domain::{ActionKind, ModelPool, ModelRole, Phase, Session};
use obot::model::ModelCoordinator;
use obot::orchestrator::{Executor, HeuristicPolicy, Orchestrator};
use obot::{agent::Agent, environment, Environment, PersistenceActor};

/// Adapts the Agent Executor to the orchestrator's `Executor` contract: each
/// driven process delegates the task to the phase's model role, then marks
/// the process complete.
struct AgentExecutor {
    agent: Mutex<Agent>,
    task: String,
}

#[async_trait::async_trait]
impl Executor for AgentExecutor {
    async fn execute(&self, phase_id: u8, process_id: u8) -> Result<(), obot::ObotError> {
        let phase = Phase::from_id(phase_id)
            .ok_or_else(|| obot::ObotError::Validation(format!("unknown phase id {phase_id}")))?;
        let kind = match obot::model::role_for_phase(phase) {
            ModelRole::Researcher => ActionKind::delegate_to_researcher(self.task.clone()),
            _ => ActionKind::delegate_to_coder(self.task.clone()),
        };

        let mut agent = self.agent.lock().await;
        agent.begin_execute(phase_id, process_id).await?;
        let result = agent.dispatch(kind).await;
        agent.end_execute().await;
        result.map(|_| ())
    }
}

fn role_from_key(key: &str) -> Option<ModelRole> {
    match key.to_lowercase().as_str() {
        "orchestrator" => Some(ModelRole::Orchestrator),
        "coder" => Some(ModelRole::Coder),
        "researcher" => Some(ModelRole::Researcher),
        "vision" => Some(ModelRole::Vision),
        _ => None,
    }
}

fn build_pools(models: &std::collections::HashMap<String, RoleModelConfig>) -> std::collections::HashMap<ModelRole, ModelPool> {
    let mut pools = std::collections::HashMap::new();
    for (key, cfg) in models {
        match role_from_key(key) {
            Some(role) => {
                pools.insert(role, ModelPool { primary: cfg.primary.clone(), tier_map: cfg.tier_map.clone() });
            }
            None => tracing::warn!(role = %key, "ignoring unrecognized model role in configuration"),
        }
    }
    pools
}

fn coordinator_for(env: &Environment) -> ModelCoordinator {
    let pools = build_pools(&env.config.models);
    let backend = Arc::new(OllamaClient::new(env.config.ollama.url.clone()));
    ModelCoordinator::new(pools, env.ram_tier, backend)
}

#[tokio::main]
async fn main() -> Result<()> {
    environment::init_logging().context("failed to initialize logging")?;

    let cli = Cli::parse();
    let workspace_root = cli.workspace.clone().unwrap_or_else(environment::default_workspace_root);
    let env = Environment::bootstrap(workspace_root.clone(), cli.config.as_ref())
        .context("failed to bootstrap environment")?;
    let persistence = PersistenceActor::spawn(env.config_root.clone());

    match cli.command {
        Command::Run { task, session } => run_task(env, persistence, task, session).await?,
        Command::Sessions { action } => match action {
            SessionCommand::List => {
                for id in persistence.list().await? {
                    let info = persistence.get_info(&id).await?;
                    println!("{}\t{}\t{} steps\t{}", info.id, info.description, info.step_count, info.format);
                }
            }
            SessionCommand::Show { id } => {
                let session = persistence.load(&id).await?;
                println!("session:     {}", session.session_id);
                println!("task:        {}", session.task.description);
                println!("workspace:   {}", session.workspace.path);
                println!("flow code:   {}", session.orchestration_state.flow_code);
                println!("checkpoints: {}", session.checkpoints.len());
            }
        },
        Command::Checkpoint { session, name, revision } => {
            let loaded = persistence.load(&session).await?;
            let (checkpoint_id, _session) = persistence.add_checkpoint(loaded, name, revision).await?;
            println!("{checkpoint_id}");
        }
        Command::Config => {
            println!("{}", serde_yaml::to_string(&env.config)?);
        }
    }

    Ok(())
}

async fn run_task(env: Environment, persistence: PersistenceActor, task: String, session_id: Option<String>) -> Result<()> {
    let mut session = match session_id {
        Some(id) => persistence.load(&id).await?,
        None => {
            let id = format!("sess-{}", uuid::Uuid::now_v7());
            Session::new(id, task.clone(), env.workspace_root.display().to_string())
        }
    };

    let coordinator = coordinator_for(&env);
    let agent = Agent::new(&env.workspace_root).with_delegator(Arc::new(coordinator));
    let executor = AgentExecutor { agent: Mutex::new(agent), task: task.clone() };

    let mut orchestrator = Orchestrator::new();
    orchestrator.set_task(task);
    let policy = HeuristicPolicy;
    orchestrator.run(&policy, &executor).await.context("orchestrator run failed")?;

    session.orchestration_state.flow_code = orchestrator.flow_code().clone();
    session.orchestration_state.completed_schedules = orchestrator.stats().completed_phases;
    session.task.status = obot::domain::TaskStatus::Completed;

    let session_id = session.session_id.clone();
    let flow_code = orchestrator.flow_code().clone();
    persistence.save(session).await?;

    info!(session_id = %session_id, flow_code = %flow_code, "run complete");
    println!("session:   {session_id}");
    println!("flow code: {flow_code}");
    Ok(())
}
