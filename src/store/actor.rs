//! PersistenceActor: a single task owning the Session Store and Checkpoint
//! Store, reachable through a cheaply-`Clone`-able handle that sends
//! commands over an `mpsc` channel and awaits a `oneshot` reply. The
//! command/actor-loop split mirrors `StateManager`, adapted from its
//! SQLite-backed store to a flat-JSON session file layout.

use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::domain::Session;
use crate::error::Result;

use super::checkpoint_store::CheckpointStore;
use super::session_store::{SessionInfo, SessionStore};

const COMMAND_CHANNEL_CAPACITY: usize = 256;

enum Command {
    Save { session: Box<Session>, reply: oneshot::Sender<Result<()>> },
    Load { id: String, reply: oneshot::Sender<Result<Session>> },
    List { reply: oneshot::Sender<Result<Vec<String>>> },
    GetInfo { id: String, reply: oneshot::Sender<Result<SessionInfo>> },
    Migrate { id: String, reply: oneshot::Sender<Result<()>> },
    AddCheckpoint {
        session: Box<Session>,
        name: String,
        vcs_revision: Option<String>,
        reply: oneshot::Sender<Result<(String, Session)>>,
    },
}

#[derive(Clone)]
pub struct PersistenceActor {
    tx: mpsc::Sender<Command>,
}

impl PersistenceActor {
    pub fn spawn(config_root: impl Into<PathBuf>) -> Self {
        let config_root = config_root.into();
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        tokio::spawn(actor_loop(config_root, rx));
        Self { tx }
    }

    pub async fn save(&self, session: Session) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Save { session: Box::new(session), reply }, rx).await
    }

    pub async fn load(&self, id: impl Into<String>) -> Result<Session> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Load { id: id.into(), reply }, rx).await
    }

    pub async fn list(&self) -> Result<Vec<String>> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::List { reply }, rx).await
    }

    pub async fn get_info(&self, id: impl Into<String>) -> Result<SessionInfo> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::GetInfo { id: id.into(), reply }, rx).await
    }

    pub async fn migrate(&self, id: impl Into<String>) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Migrate { id: id.into(), reply }, rx).await
    }

    /// Returns the new checkpoint id and the session with the checkpoint
    /// already appended and persisted.
    pub async fn add_checkpoint(
        &self,
        session: Session,
        name: impl Into<String>,
        vcs_revision: Option<String>,
    ) -> Result<(String, Session)> {
        let (reply, rx) = oneshot::channel();
        self.send(
            Command::AddCheckpoint { session: Box::new(session), name: name.into(), vcs_revision, reply },
            rx,
        )
        .await
    }

    async fn send<T>(&self, command: Command, rx: oneshot::Receiver<Result<T>>) -> Result<T> {
        self.tx.send(command).await.map_err(|_| crate::error::ObotError::Cancellation)?;
        rx.await.map_err(|_| crate::error::ObotError::Cancellation)?
    }
}

async fn actor_loop(config_root: PathBuf, mut rx: mpsc::Receiver<Command>) {
    let session_store = SessionStore::new(&config_root);
    let checkpoint_store = CheckpointStore::new(&config_root);

    while let Some(command) = rx.recv().await {
        match command {
            Command::Save { mut session, reply } => {
                debug!(session_id = %session.session_id, "PersistenceActor: Save");
                let _ = reply.send(session_store.save(&mut session).await);
            }
            Command::Load { id, reply } => {
                debug!(%id, "PersistenceActor: Load");
                let _ = reply.send(session_store.load(&id).await);
            }
            Command::List { reply } => {
                let _ = reply.send(session_store.list().await);
            }
            Command::GetInfo { id, reply } => {
                let _ = reply.send(session_store.get_info(&id).await);
            }
            Command::Migrate { id, reply } => {
                let _ = reply.send(session_store.migrate(&id).await);
            }
            Command::AddCheckpoint { mut session, name, vcs_revision, reply } => {
                let outcome = async {
                    let id = checkpoint_store.add_checkpoint(&mut session, name, vcs_revision).await?;
                    session_store.save(&mut session).await?;
                    Ok((id, *session))
                }
                .await;
                let _ = reply.send(outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn save_load_list_round_trip() {
        let dir = tempdir().unwrap();
        let actor = PersistenceActor::spawn(dir.path());
        let session = Session::new("sess-1", "a task", "/work");
        actor.save(session).await.unwrap();

        let loaded = actor.load("sess-1").await.unwrap();
        assert_eq!(loaded.session_id, "sess-1");
        assert_eq!(actor.list().await.unwrap(), vec!["sess-1".to_string()]);
    }

    #[tokio::test]
    async fn add_checkpoint_persists_through_actor() {
        let dir = tempdir().unwrap();
        let actor = PersistenceActor::spawn(dir.path());
        let session = Session::new("sess-2", "a task", "/work");
        let (id, session) = actor.add_checkpoint(session, "first checkpoint", None).await.unwrap();
        assert_eq!(session.checkpoints.len(), 1);

        let reloaded = actor.load("sess-2").await.unwrap();
        assert_eq!(reloaded.checkpoints[0].id, id);
    }
}
