//! Note: a piece of out-of-band commentary the orchestrator carries between
//! policy calls (e.g. a human consultation answer, or a planner aside).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteSource {
    User,
    AiSubstitute,
    Planner,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub source: NoteSource,
    pub reviewed: bool,
}

impl Note {
    pub fn new(id: impl Into<String>, content: impl Into<String>, source: NoteSource) -> Self {
        Self { id: id.into(), timestamp: Utc::now(), content: content.into(), source, reviewed: false }
    }
}
