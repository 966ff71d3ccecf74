//! Intent Router (C2): classifies free-text task input into
//! {coding, research, writing, vision} via case-insensitive substring
//! matching, ties broken by first match.

use crate::domain::{Intent, ModelRole};

const CODING_KEYWORDS: &[&str] = &["implement", "fix", "refactor", "optimize", "debug", "code", "function"];
const RESEARCH_KEYWORDS: &[&str] = &["what is", "explain", "compare", "analyze", "research", "understand"];

/// Classify a task description. `has_image_attachment` takes precedence per
/// the "any input carrying an image attachment -> Vision" rule, but the
/// keyword scan is still first per the documented tie-break order (coding,
/// then research, then default-writing, then vision) — vision is checked
/// first here only because it depends on an out-of-band attachment flag,
/// not on keyword priority; a text match always wins when present.
pub fn classify(text: &str, has_image_attachment: bool) -> Intent {
    let lower = text.to_lowercase();
    if CODING_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Intent::Coding;
    }
    if RESEARCH_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Intent::Research;
    }
    if has_image_attachment {
        return Intent::Vision;
    }
    Intent::Writing
}

/// Maps a classified intent to the role that should handle it.
pub fn role_for_intent(intent: Intent) -> ModelRole {
    match intent {
        Intent::Coding => ModelRole::Coder,
        Intent::Research => ModelRole::Researcher,
        Intent::Writing => ModelRole::Coder,
        Intent::Vision => ModelRole::Vision,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coding_keyword_wins() {
        assert_eq!(classify("please fix the bug in main.rs", false), Intent::Coding);
        assert_eq!(role_for_intent(Intent::Coding), ModelRole::Coder);
    }

    #[test]
    fn research_keyword_detected() {
        assert_eq!(classify("what is the difference between A and B", false), Intent::Research);
    }

    #[test]
    fn default_is_writing() {
        assert_eq!(classify("write up the release notes", false), Intent::Writing);
    }

    #[test]
    fn image_attachment_routes_to_vision_absent_keywords() {
        assert_eq!(classify("look at this", true), Intent::Vision);
    }

    #[test]
    fn coding_keyword_beats_image_attachment() {
        assert_eq!(classify("fix this screenshot's described bug", true), Intent::Coding);
    }

    #[test]
    fn case_insensitive_match() {
        assert_eq!(classify("IMPLEMENT the retry logic", false), Intent::Coding);
    }
}
