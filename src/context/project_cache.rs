//! `UpdateProjectCache`: a directory tree snapshot backing the Project
//! structure context class, truncated depth-first and favoring the current
//! file's ancestor directories when it overflows its budget.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

use super::tokenizer::Tokenizer;

const ELISION_MARKER: &str = "... (truncated)";

pub struct ProjectCache {
    root: PathBuf,
    paths: Vec<String>,
}

impl ProjectCache {
    /// Walk `root`, recording every regular file's path relative to it.
    /// `max_entries` bounds the walk so a huge repository does not blow the
    /// cache; entries beyond the cap are dropped, deepest-first.
    pub fn update(root: impl Into<PathBuf>, max_entries: usize) -> Result<Self> {
        let root = root.into();
        let mut paths = Vec::new();
        for entry in WalkDir::new(&root).into_iter().filter_map(std::result::Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&root) else { continue };
            paths.push(rel.to_string_lossy().replace('\\', "/"));
        }
        paths.sort();
        if paths.len() > max_entries {
            paths.truncate(max_entries);
        }
        Ok(Self { root, paths })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Render the cached tree as a newline-separated list, favoring entries
    /// that share an ancestor directory with `current_file` when the
    /// rendering must be truncated to fit `max_tokens`.
    pub fn render(&self, current_file: Option<&str>, tokenizer: &dyn Tokenizer, max_tokens: u32) -> String {
        let mut ordered: Vec<&String> = self.paths.iter().collect();
        if let Some(current) = current_file {
            let ancestor = Path::new(current).parent().map(|p| p.to_string_lossy().to_string()).unwrap_or_default();
            ordered.sort_by_key(|p| {
                let shares_ancestor = !ancestor.is_empty() && p.starts_with(&ancestor);
                (!shares_ancestor, (*p).clone())
            });
        }

        let mut rendered = Vec::new();
        let mut used = 0u32;
        let marker_cost = tokenizer.count(ELISION_MARKER);
        for path in ordered {
            let cost = tokenizer.count(path);
            if used + cost + marker_cost > max_tokens {
                rendered.push(ELISION_MARKER.to_string());
                break;
            }
            used += cost;
            rendered.push(path.clone());
        }
        rendered.sort();
        rendered.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tokenizer::ApproxTokenizer;
    use tempfile::tempdir;

    #[test]
    fn walks_and_caches_files() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.rs"), "fn a() {}").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.rs"), "fn b() {}").unwrap();

        let cache = ProjectCache::update(dir.path(), 100).unwrap();
        assert_eq!(cache.paths().len(), 2);
    }

    #[test]
    fn render_truncates_with_marker() {
        let dir = tempdir().unwrap();
        for i in 0..50 {
            std::fs::write(dir.path().join(format!("f{i}.rs")), "x").unwrap();
        }
        let cache = ProjectCache::update(dir.path(), 100).unwrap();
        let rendered = cache.render(None, &ApproxTokenizer, 5);
        assert!(rendered.contains("truncated"));
    }
}
