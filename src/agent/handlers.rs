//! Handler semantics for each action variant: one function per `ActionKind`,
//! each producing an `Outcome` or a typed error. Mirrors a builtin file-tool
//! dispatch idiom, generalized from JSON-tool-call dispatch to a fixed
//! typed-Action dispatcher.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use crate::domain::{ActionKind, DiffSummary, Edit, EditKind, FileMetadata};
use crate::error::{ObotError, Result};

use super::delegator::Delegator;

/// What a handler produced, folded back into the action's metadata/output
/// by the dispatcher.
#[derive(Default)]
pub struct Outcome {
    pub output: String,
    pub diff: Option<DiffSummary>,
    pub file: Option<FileMetadata>,
    pub exit_code: Option<i32>,
    pub entry_count: Option<u64>,
    pub delegation_role: Option<crate::domain::ModelRole>,
    pub delegation_tokens: Option<u64>,
}

fn metadata_of(meta: &std::fs::Metadata) -> FileMetadata {
    use std::os::unix::fs::PermissionsExt;
    FileMetadata {
        size: meta.len(),
        mode: meta.permissions().mode(),
        mtime: meta.modified().map(chrono::DateTime::<chrono::Utc>::from).unwrap_or_else(chrono::Utc::now),
    }
}

fn diff_for_replace(old: &str, new: &str) -> DiffSummary {
    let mut diff = DiffSummary::default();
    for (i, line) in old.lines().enumerate() {
        diff.push((i + 1) as u64, line, EditKind::Delete);
    }
    for (i, line) in new.lines().enumerate() {
        diff.push((i + 1) as u64, line, EditKind::Add);
    }
    diff
}

async fn create_file(root: &Path, path: &Path, content: &str) -> Result<Outcome> {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| ObotError::io(parent, e))?;
    }
    tokio::fs::write(&full, content).await.map_err(|e| ObotError::io(&full, e))?;
    let meta = tokio::fs::metadata(&full).await.map_err(|e| ObotError::io(&full, e))?;
    Ok(Outcome {
        output: format!("wrote {} bytes to {}", content.len(), path.display()),
        file: Some(metadata_of(&meta)),
        ..Default::default()
    })
}

async fn delete_file(root: &Path, path: &Path) -> Result<Outcome> {
    let full = root.join(path);
    match tokio::fs::remove_file(&full).await {
        Ok(()) => Ok(Outcome { output: format!("deleted {}", path.display()), ..Default::default() }),
        // IsNotExist is idempotent success.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(Outcome { output: format!("{} did not exist", path.display()), ..Default::default() })
        }
        Err(e) => Err(ObotError::io(&full, e)),
    }
}

async fn edit_file(root: &Path, path: &Path, content: &Option<String>, edits: &[Edit]) -> Result<Outcome> {
    let full = root.join(path);
    let old = tokio::fs::read_to_string(&full).await.map_err(|e| ObotError::io(&full, e))?;

    let new_content = match content {
        Some(c) => c.clone(),
        None => {
            // Reserved for future line-range patching.
            if edits.is_empty() {
                return Err(ObotError::Validation("EditFile requires either content or a non-empty edit list".into()));
            }
            return Err(ObotError::Validation("line-range patch application is not yet implemented".into()));
        }
    };

    tokio::fs::write(&full, &new_content).await.map_err(|e| ObotError::io(&full, e))?;
    let diff = diff_for_replace(&old, &new_content);
    Ok(Outcome { output: format!("edited {}", path.display()), diff: Some(diff), ..Default::default() })
}

async fn rename_file(root: &Path, from: &Path, to: &Path) -> Result<Outcome> {
    let (full_from, full_to) = (root.join(from), root.join(to));
    tokio::fs::rename(&full_from, &full_to).await.map_err(|e| ObotError::io(&full_from, e))?;
    Ok(Outcome { output: format!("renamed {} to {}", from.display(), to.display()), ..Default::default() })
}

async fn move_file(root: &Path, from: &Path, to: &Path) -> Result<Outcome> {
    let full_to = root.join(to);
    if let Some(parent) = full_to.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| ObotError::io(parent, e))?;
    }
    rename_file(root, from, to).await
}

async fn copy_file(root: &Path, from: &Path, to: &Path) -> Result<Outcome> {
    let (full_from, full_to) = (root.join(from), root.join(to));
    tokio::fs::copy(&full_from, &full_to).await.map_err(|e| ObotError::io(&full_from, e))?;
    Ok(Outcome { output: format!("copied {} to {}", from.display(), to.display()), ..Default::default() })
}

async fn create_dir(root: &Path, path: &Path) -> Result<Outcome> {
    let full = root.join(path);
    tokio::fs::create_dir_all(&full).await.map_err(|e| ObotError::io(&full, e))?;
    Ok(Outcome { output: format!("created directory {}", path.display()), ..Default::default() })
}

async fn delete_dir(root: &Path, path: &Path) -> Result<Outcome> {
    let full = root.join(path);
    match tokio::fs::remove_dir_all(&full).await {
        Ok(()) => Ok(Outcome { output: format!("deleted directory {}", path.display()), ..Default::default() }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(Outcome { output: format!("{} did not exist", path.display()), ..Default::default() })
        }
        Err(e) => Err(ObotError::io(&full, e)),
    }
}

async fn copy_dir(root: &Path, from: &Path, to: &Path) -> Result<Outcome> {
    let (full_from, full_to) = (root.join(from), root.join(to));
    let mut count = 0u64;
    for entry in walkdir::WalkDir::new(&full_from) {
        let entry = entry.map_err(|e| ObotError::Validation(e.to_string()))?;
        let rel = entry.path().strip_prefix(&full_from).unwrap();
        let dest = full_to.join(rel);
        if entry.file_type().is_dir() {
            tokio::fs::create_dir_all(&dest).await.map_err(|e| ObotError::io(&dest, e))?;
        } else {
            if let Some(parent) = dest.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| ObotError::io(parent, e))?;
            }
            tokio::fs::copy(entry.path(), &dest).await.map_err(|e| ObotError::io(&dest, e))?;
            count += 1;
        }
    }
    Ok(Outcome { output: format!("copied {count} files from {} to {}", from.display(), to.display()), ..Default::default() })
}

async fn run_command(root: &Path, command: &str) -> Result<Outcome> {
    debug!(command, "agent::handlers::run_command");
    let output = Command::new("sh").arg("-c").arg(command).current_dir(root).output().await.map_err(|e| ObotError::io(root, e))?;
    let combined = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let exit_code = output.status.code().unwrap_or(-1);
    if !output.status.success() {
        return Err(ObotError::Backend(format!("command exited with status {exit_code}: {combined}")));
    }
    Ok(Outcome { output: combined, exit_code: Some(exit_code), ..Default::default() })
}

async fn read_file(root: &Path, path: &Path) -> Result<Outcome> {
    let full = root.join(path);
    let content = tokio::fs::read_to_string(&full).await.map_err(|e| ObotError::io(&full, e))?;
    let meta = tokio::fs::metadata(&full).await.map_err(|e| ObotError::io(&full, e))?;
    Ok(Outcome { output: content, file: Some(metadata_of(&meta)), ..Default::default() })
}

/// Ripgrep-style search first; on unavailability, a manual walk with a
/// 1 MiB per-file skip and literal substring matching.
async fn search_files(root: &Path, search_root: &Path, pattern: &str) -> Result<Outcome> {
    let full_root = root.join(search_root);
    let pattern = pattern.to_string();
    let matches = tokio::task::spawn_blocking(move || ripgrep_style_search(&full_root, &pattern))
        .await
        .map_err(|e| ObotError::Backend(e.to_string()))??;
    Ok(Outcome { output: matches.join("\n"), ..Default::default() })
}

fn ripgrep_style_search(root: &Path, pattern: &str) -> Result<Vec<String>> {
    use grep_matcher::Matcher;
    use grep_regex::RegexMatcher;
    use grep_searcher::{sinks::UTF8, Searcher};

    const MAX_FILE_BYTES: u64 = 1024 * 1024;
    let matcher = match RegexMatcher::new(&regex::escape(pattern)) {
        Ok(m) => m,
        Err(_) => return Ok(Vec::new()),
    };
    let mut results = Vec::new();
    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.metadata().map(|m| m.len()).unwrap_or(0) > MAX_FILE_BYTES {
            continue;
        }
        let path = entry.path().to_path_buf();
        let mut searcher = Searcher::new();
        let _ = searcher.search_path(
            &matcher,
            &path,
            UTF8(|lnum, line| {
                if matcher.find(line.as_bytes())?.is_some() {
                    results.push(format!("{}:{}:{}", path.display(), lnum, line.trim_end()));
                }
                Ok(true)
            }),
        );
    }
    Ok(results)
}

async fn list_directory(root: &Path, path: &Path) -> Result<Outcome> {
    let full = root.join(path);
    let mut entries = tokio::fs::read_dir(&full).await.map_err(|e| ObotError::io(&full, e))?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| ObotError::io(&full, e))? {
        let file_type = entry.file_type().await.map_err(|e| ObotError::io(&full, e))?;
        let mut name = entry.file_name().to_string_lossy().to_string();
        if file_type.is_dir() {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();
    let count = names.len() as u64;
    Ok(Outcome { output: names.join("\n"), entry_count: Some(count), ..Default::default() })
}

fn language_for(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("go") => Some("go"),
        Some("py") => Some("python"),
        Some("ts") | Some("tsx") => Some("typescript"),
        Some("js") | Some("jsx") => Some("javascript"),
        _ => None,
    }
}

fn canonical_command(language: &str, verb: &str, path: &Path) -> String {
    let file = path.display();
    match (language, verb) {
        ("go", "lint") => "go vet ./...".to_string(),
        ("go", "format") => format!("gofmt -w {file}"),
        ("go", "test") => "go test ./...".to_string(),
        ("python", "lint") => format!("ruff check {file}"),
        ("python", "format") => format!("black {file}"),
        ("python", "test") => "pytest".to_string(),
        ("typescript", "lint") | ("javascript", "lint") => "eslint .".to_string(),
        ("typescript", "format") | ("javascript", "format") => format!("prettier --write {file}"),
        ("typescript", "test") | ("javascript", "test") => "npm test".to_string(),
        _ => unreachable!("language already validated"),
    }
}

async fn lint_format_test(root: &Path, path: &Path, verb: &str) -> Result<Outcome> {
    let language = language_for(path)
        .ok_or_else(|| ObotError::Validation(format!("unsupported-language: {}", path.display())))?;
    let command = canonical_command(language, verb, path);
    run_command(root, &command).await
}

async fn delegate(delegator: &dyn Delegator, request: &crate::domain::DelegateRequest) -> Result<Outcome> {
    let outcome = delegator.delegate(request).await?;
    Ok(Outcome {
        output: outcome.output,
        delegation_role: Some(request.role),
        delegation_tokens: Some(outcome.tokens),
        ..Default::default()
    })
}

/// Dispatch a validated action kind to its handler.
pub async fn dispatch(root: &Path, kind: &ActionKind, delegator: &dyn Delegator) -> Result<Outcome> {
    match kind {
        ActionKind::CreateFile { path, content } => create_file(root, path, content).await,
        ActionKind::DeleteFile { path } => delete_file(root, path).await,
        ActionKind::EditFile { path, content, edits } => edit_file(root, path, content, edits).await,
        ActionKind::RenameFile { from, to } => rename_file(root, from, to).await,
        ActionKind::MoveFile { from, to } => move_file(root, from, to).await,
        ActionKind::CopyFile { from, to } => copy_file(root, from, to).await,
        ActionKind::CreateDir { path } => create_dir(root, path).await,
        ActionKind::DeleteDir { path } => delete_dir(root, path).await,
        ActionKind::RenameDir { from, to } => rename_file(root, from, to).await,
        ActionKind::MoveDir { from, to } => move_file(root, from, to).await,
        ActionKind::CopyDir { from, to } => copy_dir(root, from, to).await,
        ActionKind::RunCommand { command } => run_command(root, command).await,
        ActionKind::ReadFile { path } => read_file(root, path).await,
        ActionKind::SearchFiles { pattern, root: search_root } => search_files(root, search_root, pattern).await,
        ActionKind::ListDirectory { path } => list_directory(root, path).await,
        ActionKind::Delegate(request) => delegate(delegator, request).await,
        ActionKind::Lint { path } => lint_format_test(root, path, "lint").await,
        ActionKind::Format { path } => lint_format_test(root, path, "format").await,
        ActionKind::Test { path } => lint_format_test(root, path, "test").await,
        ActionKind::ProcessCompleted => Ok(Outcome { output: "process completed".into(), ..Default::default() }),
    }
}

#[allow(dead_code)]
pub(crate) fn full_path(root: &Path, path: &Path) -> PathBuf {
    root.join(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::delegator::UnavailableDelegator;
    use tempfile::tempdir;

    #[tokio::test]
    async fn create_file_writes_content_and_attaches_metadata() {
        let temp = tempdir().unwrap();
        let outcome = create_file(temp.path(), Path::new("a/b.txt"), "hello").await.unwrap();
        assert!(outcome.file.is_some());
        let written = tokio::fs::read_to_string(temp.path().join("a/b.txt")).await.unwrap();
        assert_eq!(written, "hello");
    }

    #[tokio::test]
    async fn empty_content_creates_empty_file_as_success() {
        let temp = tempdir().unwrap();
        let outcome = create_file(temp.path(), Path::new("empty.txt"), "").await.unwrap();
        assert!(outcome.file.unwrap().size == 0);
    }

    #[tokio::test]
    async fn delete_missing_file_is_idempotent_success() {
        let temp = tempdir().unwrap();
        let outcome = delete_file(temp.path(), Path::new("nope.txt")).await.unwrap();
        assert!(outcome.output.contains("did not exist"));
    }

    #[tokio::test]
    async fn run_command_failure_is_a_backend_error() {
        let temp = tempdir().unwrap();
        let err = run_command(temp.path(), "exit 7").await.unwrap_err();
        assert_eq!(err.kind(), "backend");
    }

    #[tokio::test]
    async fn lint_unsupported_language_errors() {
        let temp = tempdir().unwrap();
        let err = lint_format_test(temp.path(), Path::new("file.rs"), "lint").await.unwrap_err();
        assert!(err.to_string().contains("unsupported-language"));
    }

    #[tokio::test]
    async fn list_directory_counts_entries() {
        let temp = tempdir().unwrap();
        tokio::fs::write(temp.path().join("a.txt"), "x").await.unwrap();
        tokio::fs::create_dir(temp.path().join("sub")).await.unwrap();
        let outcome = list_directory(temp.path(), Path::new(".")).await.unwrap();
        assert_eq!(outcome.entry_count, Some(2));
        assert!(outcome.output.contains("sub/"));
    }

    #[tokio::test]
    async fn delegate_without_coordinator_errors() {
        let req = crate::domain::DelegateRequest::from_task("summarize");
        let err = delegate(&UnavailableDelegator, &req).await.unwrap_err();
        assert_eq!(err.kind(), "backend");
    }
}
