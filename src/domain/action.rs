//! Action: the typed operation the agent performs — the only path by which
//! the core mutates the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::model::ModelRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    Add,
    Delete,
    Context,
}

/// A single line of a unified-diff-style rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffLine {
    pub line_number: u64,
    pub content: String,
    pub kind: EditKind,
}

/// Additions, deletions, context lines, and the interleaved lines that make
/// up a rendered diff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    pub additions: u64,
    pub deletions: u64,
    pub context: u64,
    pub lines: Vec<DiffLine>,
}

impl DiffSummary {
    pub fn push(&mut self, line_number: u64, content: impl Into<String>, kind: EditKind) {
        match kind {
            EditKind::Add => self.additions += 1,
            EditKind::Delete => self.deletions += 1,
            EditKind::Context => self.context += 1,
        }
        self.lines.push(DiffLine { line_number, content: content.into(), kind });
    }

    pub fn total(&self) -> u64 {
        self.additions + self.deletions + self.context
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u64,
    pub end: u64,
}

/// A single line-range patch: reserved for a future `EditFile` list-apply
/// path. Content replacement ships first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edit {
    pub start_line: u64,
    pub end_line: u64,
    pub old_content: String,
    pub new_content: String,
}

/// A request to delegate work to another role, modeled as a tagged variant
/// rather than stringly-typed JSON sniffing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegateRequest {
    pub role: ModelRole,
    pub task: String,
    pub context: Option<String>,
    pub system_prompt: Option<String>,
}

impl DelegateRequest {
    /// Accept a bare task string, defaulting the role to Researcher.
    pub fn from_task(task: impl Into<String>) -> Self {
        Self { role: ModelRole::Researcher, task: task.into(), context: None, system_prompt: None }
    }
}

/// The 17 typed action variants over {CreateFile, DeleteFile, ..., ProcessCompleted}.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ActionKind {
    CreateFile { path: PathBuf, content: String },
    DeleteFile { path: PathBuf },
    EditFile { path: PathBuf, content: Option<String>, edits: Vec<Edit> },
    RenameFile { from: PathBuf, to: PathBuf },
    MoveFile { from: PathBuf, to: PathBuf },
    CopyFile { from: PathBuf, to: PathBuf },
    CreateDir { path: PathBuf },
    DeleteDir { path: PathBuf },
    RenameDir { from: PathBuf, to: PathBuf },
    MoveDir { from: PathBuf, to: PathBuf },
    CopyDir { from: PathBuf, to: PathBuf },
    RunCommand { command: String },
    ReadFile { path: PathBuf },
    SearchFiles { pattern: String, root: PathBuf },
    ListDirectory { path: PathBuf },
    Delegate(DelegateRequest),
    Lint { path: PathBuf },
    Format { path: PathBuf },
    Test { path: PathBuf },
    ProcessCompleted,
}

impl ActionKind {
    /// Every path carried by this action, for the path-safety validation
    /// pass.
    pub fn paths(&self) -> Vec<&PathBuf> {
        match self {
            ActionKind::CreateFile { path, .. }
            | ActionKind::DeleteFile { path }
            | ActionKind::EditFile { path, .. }
            | ActionKind::CreateDir { path }
            | ActionKind::DeleteDir { path }
            | ActionKind::ReadFile { path }
            | ActionKind::ListDirectory { path }
            | ActionKind::Lint { path }
            | ActionKind::Format { path }
            | ActionKind::Test { path } => vec![path],
            ActionKind::RenameFile { from, to }
            | ActionKind::MoveFile { from, to }
            | ActionKind::CopyFile { from, to }
            | ActionKind::RenameDir { from, to }
            | ActionKind::MoveDir { from, to }
            | ActionKind::CopyDir { from, to } => vec![from, to],
            ActionKind::SearchFiles { root, .. } => vec![root],
            ActionKind::RunCommand { .. } | ActionKind::Delegate(_) | ActionKind::ProcessCompleted => vec![],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::CreateFile { .. } => "CreateFile",
            ActionKind::DeleteFile { .. } => "DeleteFile",
            ActionKind::EditFile { .. } => "EditFile",
            ActionKind::RenameFile { .. } => "RenameFile",
            ActionKind::MoveFile { .. } => "MoveFile",
            ActionKind::CopyFile { .. } => "CopyFile",
            ActionKind::CreateDir { .. } => "CreateDir",
            ActionKind::DeleteDir { .. } => "DeleteDir",
            ActionKind::RenameDir { .. } => "RenameDir",
            ActionKind::MoveDir { .. } => "MoveDir",
            ActionKind::CopyDir { .. } => "CopyDir",
            ActionKind::RunCommand { .. } => "RunCommand",
            ActionKind::ReadFile { .. } => "ReadFile",
            ActionKind::SearchFiles { .. } => "SearchFiles",
            ActionKind::ListDirectory { .. } => "ListDirectory",
            ActionKind::Delegate(_) => "Delegate",
            ActionKind::Lint { .. } => "Lint",
            ActionKind::Format { .. } => "Format",
            ActionKind::Test { .. } => "Test",
            ActionKind::ProcessCompleted => "ProcessCompleted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Failed,
}

/// File metadata attached on success for filesystem-mutating actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    pub size: u64,
    pub mode: u32,
    pub mtime: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionMetadata {
    pub start_time: Option<DateTime<Utc>>,
    pub duration_ms: Option<u64>,
    pub status: Option<ActionStatus>,
    pub phase: Option<u8>,
    pub process: Option<u8>,
    pub model: Option<String>,
    pub error: Option<String>,
    pub file: Option<FileMetadata>,
    pub exit_code: Option<i32>,
    pub entry_count: Option<u64>,
    pub delegation_role: Option<ModelRole>,
    pub delegation_tokens: Option<u64>,
    pub delegation_success: Option<bool>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A single recorded action. Synthesized by the agent, recorded once,
/// immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: ActionKind,
    pub output: String,
    pub diff: Option<DiffSummary>,
    pub metadata: ActionMetadata,
}

impl Action {
    /// `id = A<ordinal>`, a monotonically increasing timestamp, metadata
    /// seeded with `{start_time, phase, process, model}`: the minimum
    /// required fields before dispatch even runs.
    pub fn new(ordinal: u64, kind: ActionKind, phase: u8, process: u8, model: Option<String>) -> Self {
        let now = Utc::now();
        Action {
            id: format!("A{ordinal}"),
            timestamp: now,
            kind,
            output: String::new(),
            diff: None,
            metadata: ActionMetadata {
                start_time: Some(now),
                phase: Some(phase),
                process: Some(process),
                model,
                ..Default::default()
            },
        }
    }
}

/// One constructor per variant, for ergonomics.
impl ActionKind {
    pub fn create_file(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        ActionKind::CreateFile { path: path.into(), content: content.into() }
    }
    pub fn delete_file(path: impl Into<PathBuf>) -> Self {
        ActionKind::DeleteFile { path: path.into() }
    }
    pub fn edit_file(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        ActionKind::EditFile { path: path.into(), content: Some(content.into()), edits: Vec::new() }
    }
    pub fn rename_file(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        ActionKind::RenameFile { from: from.into(), to: to.into() }
    }
    pub fn move_file(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        ActionKind::MoveFile { from: from.into(), to: to.into() }
    }
    pub fn copy_file(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        ActionKind::CopyFile { from: from.into(), to: to.into() }
    }
    pub fn create_dir(path: impl Into<PathBuf>) -> Self {
        ActionKind::CreateDir { path: path.into() }
    }
    pub fn delete_dir(path: impl Into<PathBuf>) -> Self {
        ActionKind::DeleteDir { path: path.into() }
    }
    pub fn rename_dir(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        ActionKind::RenameDir { from: from.into(), to: to.into() }
    }
    pub fn move_dir(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        ActionKind::MoveDir { from: from.into(), to: to.into() }
    }
    pub fn copy_dir(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        ActionKind::CopyDir { from: from.into(), to: to.into() }
    }
    pub fn run_command(command: impl Into<String>) -> Self {
        ActionKind::RunCommand { command: command.into() }
    }
    pub fn read_file(path: impl Into<PathBuf>) -> Self {
        ActionKind::ReadFile { path: path.into() }
    }
    pub fn search_files(pattern: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        ActionKind::SearchFiles { pattern: pattern.into(), root: root.into() }
    }
    pub fn list_directory(path: impl Into<PathBuf>) -> Self {
        ActionKind::ListDirectory { path: path.into() }
    }
    pub fn delegate_to_coder(task: impl Into<String>) -> Self {
        ActionKind::Delegate(DelegateRequest { role: ModelRole::Coder, task: task.into(), context: None, system_prompt: None })
    }
    pub fn delegate_to_researcher(task: impl Into<String>) -> Self {
        ActionKind::Delegate(DelegateRequest { role: ModelRole::Researcher, task: task.into(), context: None, system_prompt: None })
    }
    pub fn delegate_to_vision(task: impl Into<String>) -> Self {
        ActionKind::Delegate(DelegateRequest { role: ModelRole::Vision, task: task.into(), context: None, system_prompt: None })
    }
    pub fn lint(path: impl Into<PathBuf>) -> Self {
        ActionKind::Lint { path: path.into() }
    }
    pub fn format(path: impl Into<PathBuf>) -> Self {
        ActionKind::Format { path: path.into() }
    }
    pub fn test(path: impl Into<PathBuf>) -> Self {
        ActionKind::Test { path: path.into() }
    }
    pub fn complete_process() -> Self {
        ActionKind::ProcessCompleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_action_seeds_required_metadata() {
        let a = Action::new(1, ActionKind::ProcessCompleted, 3, 1, Some("coder-model".into()));
        assert_eq!(a.id, "A1");
        assert!(a.metadata.start_time.is_some());
        assert_eq!(a.metadata.phase, Some(3));
        assert_eq!(a.metadata.process, Some(1));
    }

    #[test]
    fn paths_extracts_both_sides_of_two_path_actions() {
        let k = ActionKind::MoveFile { from: "a.txt".into(), to: "b.txt".into() };
        assert_eq!(k.paths().len(), 2);
    }

    #[test]
    fn run_command_has_no_paths() {
        let k = ActionKind::RunCommand { command: "go test ./...".into() };
        assert!(k.paths().is_empty());
    }

    #[test]
    fn delegate_request_defaults_to_researcher() {
        let req = DelegateRequest::from_task("summarize this repo");
        assert_eq!(req.role, ModelRole::Researcher);
    }

    #[test]
    fn diff_summary_tracks_totals() {
        let mut d = DiffSummary::default();
        d.push(1, "+foo", EditKind::Add);
        d.push(2, "-bar", EditKind::Delete);
        d.push(3, "baz", EditKind::Context);
        assert_eq!(d.total(), 3);
        assert_eq!(d.additions, 1);
    }
}
