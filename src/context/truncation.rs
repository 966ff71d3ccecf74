//! Semantic truncation for the File content class: keep top-of-file
//! import/export/declaration lines, collapse interior bodies into elision
//! markers, stop once the token budget for the class is spent.

use super::tokenizer::Tokenizer;

const ELISION_MARKER: &str = "// ... elided ...";

fn is_declaration_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("use ")
        || trimmed.starts_with("import ")
        || trimmed.starts_with("from ")
        || trimmed.starts_with("export ")
        || trimmed.starts_with("mod ")
        || trimmed.starts_with("pub mod ")
        || trimmed.starts_with("package ")
        || trimmed.starts_with("#include")
        || trimmed.starts_with("//!")
        || trimmed.starts_with("///")
}

/// Truncate a single file's content to fit within `max_tokens`. Declaration
/// lines at the top of the file are never dropped; once the budget is
/// exhausted the remaining body collapses behind one elision marker.
pub fn truncate_file_content(content: &str, tokenizer: &dyn Tokenizer, max_tokens: u32) -> String {
    if tokenizer.count(content) <= max_tokens {
        return content.to_string();
    }

    let lines: Vec<&str> = content.lines().collect();
    let mut header_end = 0;
    while header_end < lines.len() && (is_declaration_line(lines[header_end]) || lines[header_end].trim().is_empty()) {
        header_end += 1;
    }

    let mut kept = Vec::new();
    let mut used = 0u32;
    for line in &lines[..header_end] {
        used += tokenizer.count(line);
        kept.push(*line);
    }

    let marker_cost = tokenizer.count(ELISION_MARKER);
    let mut reached_limit = false;
    for line in &lines[header_end..] {
        let cost = tokenizer.count(line);
        if used + cost + marker_cost > max_tokens {
            reached_limit = true;
            break;
        }
        used += cost;
        kept.push(*line);
    }

    if reached_limit {
        kept.push(ELISION_MARKER);
    }

    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tokenizer::ApproxTokenizer;

    #[test]
    fn short_content_is_untouched() {
        let content = "use std::fmt;\nfn main() {}\n";
        assert_eq!(truncate_file_content(content, &ApproxTokenizer, 1_000), content);
    }

    #[test]
    fn declarations_survive_truncation() {
        let mut content = String::from("use std::fmt;\nuse std::io;\n\n");
        for i in 0..200 {
            content.push_str(&format!("fn body_line_{i}() {{ do_work(); }}\n"));
        }
        let truncated = truncate_file_content(&content, &ApproxTokenizer, 40);
        assert!(truncated.starts_with("use std::fmt;"));
        assert!(truncated.contains(ELISION_MARKER));
    }
}
