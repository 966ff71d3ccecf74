//! The Context Manager (C4): `BuildContext` assembles the eight section
//! classes within a token budget, applying semantic truncation per class.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{ContextSection, ContextSectionKind, ConversationTurn};

use super::budget::Budget;
use super::error_store::ErrorStore;
use super::history::prune_history;
use super::project_cache::ProjectCache;
use super::tokenizer::{ApproxTokenizer, Tokenizer};
use super::truncation::truncate_file_content;

/// The inputs `BuildContext` is given: a task description, selected file
/// contents, and conversation history. Project structure, memory patterns,
/// and error warnings are drawn from the manager's own caches.
pub struct BuildContextInput<'a> {
    pub system_prompt: &'a str,
    pub project_rules: &'a str,
    pub task_description: &'a str,
    pub selected_files: &'a [(String, String)],
    pub history: &'a [ConversationTurn],
    pub memory_patterns: &'a [String],
    pub current_file: Option<&'a str>,
}

pub struct ContextManager {
    tokenizer: Box<dyn Tokenizer>,
    budget: Budget,
    error_store: ErrorStore,
    project_cache: Option<ProjectCache>,
}

impl ContextManager {
    pub fn new(total_token_budget: u32) -> Self {
        Self {
            tokenizer: Box::new(ApproxTokenizer),
            budget: Budget::new(total_token_budget),
            error_store: ErrorStore::new(64),
            project_cache: None,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn record_error(&mut self, text: impl Into<String>, context: impl Into<String>) {
        self.error_store.record(text, context);
    }

    pub fn update_project_cache(&mut self, root: impl Into<std::path::PathBuf>) -> crate::error::Result<()> {
        self.project_cache = Some(ProjectCache::update(root, 4_000)?);
        Ok(())
    }

    pub fn prune_history(&self, history: &[ConversationTurn]) -> Vec<ConversationTurn> {
        prune_history(history, self.tokenizer.as_ref(), self.budget.allotment(ContextSectionKind::ConversationHistory))
    }

    /// `BuildContext(task, workspace, selectedFiles, history)`: an ordered
    /// list of sections whose summed token count stays within budget.
    pub fn build_context(&self, input: &BuildContextInput<'_>) -> Vec<ContextSection> {
        debug!(task_len = input.task_description.len(), files = input.selected_files.len(), "build_context");
        let mut sections = Vec::with_capacity(8);

        sections.push(self.bounded_section(ContextSectionKind::SystemPrompt, input.system_prompt));
        sections.push(self.bounded_section(ContextSectionKind::ProjectRules, input.project_rules));
        sections.push(self.bounded_section(ContextSectionKind::TaskDescription, input.task_description));

        let file_budget = self.budget.allotment(ContextSectionKind::FileContent);
        let per_file_budget = if input.selected_files.is_empty() {
            file_budget
        } else {
            file_budget / input.selected_files.len() as u32
        };
        let mut file_content = String::new();
        for (path, content) in input.selected_files {
            let truncated = truncate_file_content(content, self.tokenizer.as_ref(), per_file_budget);
            file_content.push_str(&format!("--- {path} ---\n{truncated}\n"));
        }
        sections.push(self.section(ContextSectionKind::FileContent, file_content));

        let structure_budget = self.budget.allotment(ContextSectionKind::ProjectStructure);
        let structure = self
            .project_cache
            .as_ref()
            .map(|cache| cache.render(input.current_file, self.tokenizer.as_ref(), structure_budget))
            .unwrap_or_default();
        sections.push(self.section(ContextSectionKind::ProjectStructure, structure));

        let pruned_history = self.prune_history(input.history);
        let rendered_history =
            pruned_history.iter().map(|t| format!("{}: {}", t.role, t.content)).collect::<Vec<_>>().join("\n");
        sections.push(self.section(ContextSectionKind::ConversationHistory, rendered_history));

        let memory_budget = self.budget.allotment(ContextSectionKind::MemoryPatterns);
        let memory = self.bounded_section_from_lines(input.memory_patterns, memory_budget);
        sections.push(self.section(ContextSectionKind::MemoryPatterns, memory));

        let error_budget = self.budget.allotment(ContextSectionKind::ErrorWarnings);
        let error_lines: Vec<String> = self.error_store.recent().map(|e| format!("{}: {}", e.context, e.text)).collect();
        let errors = self.bounded_section_from_lines(&error_lines, error_budget);
        sections.push(self.section(ContextSectionKind::ErrorWarnings, errors));

        sections
    }

    fn bounded_section(&self, kind: ContextSectionKind, content: &str) -> ContextSection {
        let limit = self.budget.allotment(kind);
        let truncated = truncate_file_content(content, self.tokenizer.as_ref(), limit);
        self.section(kind, truncated)
    }

    fn bounded_section_from_lines(&self, lines: &[String], limit: u32) -> String {
        let mut used = 0u32;
        let mut kept = Vec::new();
        for line in lines {
            let cost = self.tokenizer.count(line);
            if used + cost > limit {
                break;
            }
            used += cost;
            kept.push(line.clone());
        }
        kept.join("\n")
    }

    fn section(&self, kind: ContextSectionKind, content: String) -> ContextSection {
        let token_count = self.tokenizer.count(&content);
        ContextSection { kind, content, token_count }
    }

    pub fn per_class_usage(&self, sections: &[ContextSection]) -> HashMap<ContextSectionKind, u32> {
        sections.iter().map(|s| (s.kind, s.token_count)).collect()
    }
}
