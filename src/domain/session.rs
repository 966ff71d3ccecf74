//! Session: the Unified Session Format (USF) record — the serialization
//! contract that makes a traversal portable and checkpointable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::flow_code::FlowCode;
use super::model::Intent;

pub const USF_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourcePlatform {
    Cli,
    Ide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    pub intent: Option<Intent>,
    pub quality_preset: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationStateRecord {
    pub flow_code: FlowCode,
    pub current_schedule: u8,
    pub current_process: u8,
    pub completed_schedules: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_tokens: u64,
    pub time_elapsed_seconds: u64,
    pub tools_executed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost_saved: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileModification {
    pub path: String,
    pub action: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub flow_code: FlowCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<String>,
    /// Checkpoints hold a session id, not a session reference, to avoid an
    /// orchestrator<->session<->checkpoint reference cycle.
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub version: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub source_platform: SourcePlatform,
    pub task: Task,
    pub workspace: Workspace,
    pub orchestration_state: OrchestrationStateRecord,
    pub conversation_history: Vec<ConversationTurn>,
    pub files_modified: Vec<FileModification>,
    pub checkpoints: Vec<Checkpoint>,
    pub stats: SessionStats,
}

impl Session {
    pub fn new(session_id: impl Into<String>, description: impl Into<String>, workspace_path: impl Into<String>) -> Self {
        let now = Utc::now();
        Session {
            version: USF_VERSION.to_string(),
            session_id: session_id.into(),
            created_at: now,
            updated_at: now,
            source_platform: SourcePlatform::Cli,
            task: Task {
                description: description.into(),
                intent: None,
                quality_preset: "balanced".to_string(),
                status: TaskStatus::Pending,
            },
            workspace: Workspace { path: workspace_path.into(), git_branch: None, git_status: None },
            orchestration_state: OrchestrationStateRecord {
                flow_code: FlowCode::new(),
                current_schedule: 0,
                current_process: 0,
                completed_schedules: Vec::new(),
            },
            conversation_history: Vec::new(),
            files_modified: Vec::new(),
            checkpoints: Vec::new(),
            stats: SessionStats::default(),
        }
    }

    /// Called after each process termination and once more at PromptTerminated.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_usf_version_and_pending_task() {
        let s = Session::new("sess-1", "add a greeting function", "/tmp/work");
        assert_eq!(s.version, USF_VERSION);
        assert_eq!(s.task.status, TaskStatus::Pending);
        assert!(s.checkpoints.is_empty());
    }

    #[test]
    fn touch_bumps_updated_at() {
        let mut s = Session::new("sess-1", "task", "/tmp");
        let before = s.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        s.touch();
        assert!(s.updated_at >= before);
    }

    #[test]
    fn serializes_with_usf_field_names() {
        let s = Session::new("sess-1", "task", "/tmp");
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"session_id\""));
        assert!(json.contains("\"orchestration_state\""));
    }
}
