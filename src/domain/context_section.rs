//! ContextSection: one of the eight budget classes the Context Manager
//! assembles a prompt from.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextSectionKind {
    SystemPrompt,
    ProjectRules,
    TaskDescription,
    FileContent,
    ProjectStructure,
    ConversationHistory,
    MemoryPatterns,
    ErrorWarnings,
}

impl ContextSectionKind {
    pub const ALL: [ContextSectionKind; 8] = [
        ContextSectionKind::SystemPrompt,
        ContextSectionKind::ProjectRules,
        ContextSectionKind::TaskDescription,
        ContextSectionKind::FileContent,
        ContextSectionKind::ProjectStructure,
        ContextSectionKind::ConversationHistory,
        ContextSectionKind::MemoryPatterns,
        ContextSectionKind::ErrorWarnings,
    ];

    /// Fixed proportional share of the global token budget. Sums to 1.00.
    pub fn share(self) -> f64 {
        match self {
            ContextSectionKind::SystemPrompt => 0.07,
            ContextSectionKind::ProjectRules => 0.04,
            ContextSectionKind::TaskDescription => 0.14,
            ContextSectionKind::FileContent => 0.42,
            ContextSectionKind::ProjectStructure => 0.10,
            ContextSectionKind::ConversationHistory => 0.14,
            ContextSectionKind::MemoryPatterns => 0.05,
            ContextSectionKind::ErrorWarnings => 0.04,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSection {
    pub kind: ContextSectionKind,
    pub content: String,
    pub token_count: u32,
}
