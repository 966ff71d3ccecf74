//! Checkpoint Store (C8): `AddCheckpoint` persists a checkpoint both inline
//! on the session and as its own record under
//! `<config-root>/checkpoints/<project-hash>/`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use tracing::debug;

use crate::domain::{Checkpoint, Session};
use crate::error::{ObotError, Result};

pub struct CheckpointStore {
    root: PathBuf,
}

fn project_hash(workspace_path: &str) -> String {
    let mut hasher = DefaultHasher::new();
    workspace_path.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

fn checkpoint_id(name: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    let hex_prefix = &uuid.to_string()[..6];
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    format!("ckpt-{hex_prefix}-{slug}")
}

impl CheckpointStore {
    pub fn new(config_root: impl Into<PathBuf>) -> Self {
        Self { root: config_root.into().join("checkpoints") }
    }

    fn dir_for(&self, workspace_path: &str) -> PathBuf {
        self.root.join(project_hash(workspace_path))
    }

    /// Appends a checkpoint to the session (in-memory) and writes an
    /// independent copy into the checkpoint directory. Returns the new
    /// checkpoint's id. Caller is responsible for re-saving the session via
    /// the Session Store.
    pub async fn add_checkpoint(
        &self,
        session: &mut Session,
        name: impl Into<String>,
        vcs_revision: Option<String>,
    ) -> Result<String> {
        let name = name.into();
        let id = checkpoint_id(&name);
        let checkpoint = Checkpoint {
            id: id.clone(),
            name,
            timestamp: chrono::Utc::now(),
            flow_code: session.orchestration_state.flow_code.clone(),
            git_commit: vcs_revision,
            session_id: session.session_id.clone(),
        };

        let dir = self.dir_for(&session.workspace.path);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| ObotError::io(&dir, e))?;
        let path = dir.join(format!("{id}.json"));
        let body = serde_json::to_string_pretty(&checkpoint).map_err(|e| ObotError::Parse(e.to_string()))?;
        tokio::fs::write(&path, body).await.map_err(|e| ObotError::io(&path, e))?;

        debug!(checkpoint_id = %id, session_id = %session.session_id, "CheckpointStore::add_checkpoint");
        session.checkpoints.push(checkpoint);
        session.touch();
        Ok(id)
    }
}
