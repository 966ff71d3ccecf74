//! The action log: records all actions, per-path edit history, commands,
//! creations, deletions, directory operations, and delegations. Produces a
//! human-readable rendering and, for a given path, a unified-diff rendering
//! built from the recorded edits.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::{Action, ActionKind, DiffSummary};

#[derive(Default)]
pub struct ActionLog {
    actions: Vec<Action>,
    edits_by_path: HashMap<PathBuf, Vec<usize>>,
    commands: Vec<usize>,
    creations: Vec<usize>,
    deletions: Vec<usize>,
    directory_ops: Vec<usize>,
    delegations: Vec<usize>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, action: Action) {
        let idx = self.actions.len();
        match &action.kind {
            ActionKind::EditFile { path, .. } => self.edits_by_path.entry(path.clone()).or_default().push(idx),
            ActionKind::CreateFile { path, .. } => {
                self.creations.push(idx);
                self.edits_by_path.entry(path.clone()).or_default().push(idx);
            }
            ActionKind::DeleteFile { path } => {
                self.deletions.push(idx);
                self.edits_by_path.entry(path.clone()).or_default().push(idx);
            }
            ActionKind::RunCommand { .. } => self.commands.push(idx),
            ActionKind::CreateDir { .. }
            | ActionKind::DeleteDir { .. }
            | ActionKind::RenameDir { .. }
            | ActionKind::MoveDir { .. }
            | ActionKind::CopyDir { .. } => self.directory_ops.push(idx),
            ActionKind::Delegate(_) => self.delegations.push(idx),
            _ => {}
        }
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn edits_for(&self, path: &Path) -> Vec<&Action> {
        self.edits_by_path.get(path).map(|idxs| idxs.iter().map(|&i| &self.actions[i]).collect()).unwrap_or_default()
    }

    pub fn commands(&self) -> Vec<&Action> {
        self.commands.iter().map(|&i| &self.actions[i]).collect()
    }

    pub fn creations(&self) -> Vec<&Action> {
        self.creations.iter().map(|&i| &self.actions[i]).collect()
    }

    pub fn deletions(&self) -> Vec<&Action> {
        self.deletions.iter().map(|&i| &self.actions[i]).collect()
    }

    pub fn directory_ops(&self) -> Vec<&Action> {
        self.directory_ops.iter().map(|&i| &self.actions[i]).collect()
    }

    pub fn delegations(&self) -> Vec<&Action> {
        self.delegations.iter().map(|&i| &self.actions[i]).collect()
    }

    /// A human-readable rendering of the whole log, one line per action.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for action in &self.actions {
            let status = action.metadata.status.map(|s| format!("{s:?}")).unwrap_or_else(|| "pending".into());
            out.push_str(&format!("[{}] {} ({})\n", action.id, action.kind.name(), status));
        }
        out
    }

    /// A unified-diff-style rendering built from the recorded edits for a
    /// given path, newest edit last.
    pub fn render_diff(&self, path: &Path) -> Option<String> {
        let edits = self.edits_for(path);
        if edits.is_empty() {
            return None;
        }
        let mut out = format!("--- {}\n", path.display());
        for action in edits {
            if let Some(diff) = &action.diff {
                out.push_str(&render_diff_summary(diff));
            }
        }
        Some(out)
    }
}

fn render_diff_summary(diff: &DiffSummary) -> String {
    let mut out = String::new();
    for line in &diff.lines {
        let marker = match line.kind {
            crate::domain::EditKind::Add => '+',
            crate::domain::EditKind::Delete => '-',
            crate::domain::EditKind::Context => ' ',
        };
        out.push_str(&format!("{marker}{}\n", line.content));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_creations_and_path_history() {
        let mut log = ActionLog::new();
        let a = Action::new(1, ActionKind::CreateFile { path: "a.txt".into(), content: "hi".into() }, 1, 1, None);
        log.record(a);
        assert_eq!(log.creations().len(), 1);
        assert_eq!(log.edits_for(Path::new("a.txt")).len(), 1);
    }

    #[test]
    fn render_contains_action_ids() {
        let mut log = ActionLog::new();
        log.record(Action::new(1, ActionKind::ProcessCompleted, 1, 1, None));
        let rendered = log.render();
        assert!(rendered.contains("A1"));
    }

    #[test]
    fn diff_render_none_when_no_edits() {
        let log = ActionLog::new();
        assert!(log.render_diff(Path::new("nope.txt")).is_none());
    }
}
