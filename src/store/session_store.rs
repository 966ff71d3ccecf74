//! Session Store (C7): persists USF records to `<config-root>/sessions/`,
//! atomic write via temp-file + rename, with legacy single-file-directory
//! migration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Session, SourcePlatform};
use crate::error::{ObotError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub description: String,
    pub platform: SourcePlatform,
    pub step_count: usize,
    pub format: &'static str,
}

pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    pub fn new(config_root: impl Into<PathBuf>) -> Self {
        Self { root: config_root.into().join("sessions") }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn legacy_dir_for(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Atomic write: serialize to a temp sibling, then rename over the
    /// final path. `updated_at` is stamped immediately before the write.
    pub async fn save(&self, session: &mut Session) -> Result<()> {
        session.touch();
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| ObotError::io(&self.root, e))?;

        let path = self.path_for(&session.session_id);
        let tmp_path = self.root.join(format!(".{}.tmp", session.session_id));
        let body = serde_json::to_string_pretty(session).map_err(|e| ObotError::Parse(e.to_string()))?;

        tokio::fs::write(&tmp_path, body).await.map_err(|e| ObotError::io(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &path).await.map_err(|e| ObotError::io(&path, e))?;
        debug!(session_id = %session.session_id, path = %path.display(), "SessionStore::save");
        Ok(())
    }

    /// Load by id; transparently migrates a legacy single-file directory
    /// layout first if no flat JSON record exists yet.
    pub async fn load(&self, id: &str) -> Result<Session> {
        let path = self.path_for(id);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) && self.legacy_dir_for(id).is_dir() {
            self.migrate(id).await?;
        }

        let body = tokio::fs::read_to_string(&path).await.map_err(|e| ObotError::io(&path, e))?;
        serde_json::from_str(&body).map_err(|e| ObotError::corruption(&path, e.to_string()))
    }

    pub async fn list(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        if !self.root.is_dir() {
            return Ok(ids);
        }
        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(|e| ObotError::io(&self.root, e))?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| ObotError::io(&self.root, e))? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    pub async fn get_info(&self, id: &str) -> Result<SessionInfo> {
        let session = self.load(id).await?;
        Ok(SessionInfo {
            id: session.session_id.clone(),
            description: session.task.description.clone(),
            platform: session.source_platform,
            step_count: session.conversation_history.len(),
            format: "usf-1.0",
        })
    }

    /// Convert a legacy `<id>/session.usf` directory into a flat JSON
    /// record; the legacy directory is renamed `.migrated_<id>`, never
    /// deleted.
    pub async fn migrate(&self, id: &str) -> Result<()> {
        let legacy_dir = self.legacy_dir_for(id);
        let legacy_file = legacy_dir.join("session.usf");
        let body = tokio::fs::read_to_string(&legacy_file).await.map_err(|e| ObotError::io(&legacy_file, e))?;
        let session: Session = serde_json::from_str(&body).map_err(|e| ObotError::corruption(&legacy_file, e.to_string()))?;

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| ObotError::io(&self.root, e))?;
        let path = self.path_for(id);
        let pretty = serde_json::to_string_pretty(&session).map_err(|e| ObotError::Parse(e.to_string()))?;
        tokio::fs::write(&path, pretty).await.map_err(|e| ObotError::io(&path, e))?;

        let migrated_marker = self.root.join(format!(".migrated_{id}"));
        tokio::fs::rename(&legacy_dir, &migrated_marker).await.map_err(|e| ObotError::io(&legacy_dir, e))?;
        info!(%id, "SessionStore::migrate: legacy directory migrated");
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
