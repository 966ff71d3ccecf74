//! `.obotrules`: a workspace-root text file parsed into a system prompt
//! fragment, a constraints list, ignore globs, and `quality`/`model`
//! overrides. A missing file is equivalent to "no rules".

use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRules {
    pub system_prompt: String,
    pub constraints: Vec<String>,
    pub ignore: Vec<String>,
    pub quality_preset: Option<String>,
    pub model_override: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    SystemPrompt,
    Constraints,
    Ignore,
}

impl ProjectRules {
    pub fn load(workspace_root: &Path) -> Self {
        let path = workspace_root.join(".obotrules");
        match std::fs::read_to_string(&path) {
            Ok(body) => Self::parse(&body),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(body: &str) -> Self {
        let mut rules = ProjectRules::default();
        let mut section = Section::None;
        let mut system_prompt_lines = Vec::new();

        for raw_line in body.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(heading) = line.strip_prefix('#') {
                section = match heading.trim() {
                    "System Prompt" => Section::SystemPrompt,
                    "Constraints" => Section::Constraints,
                    "Ignore" => Section::Ignore,
                    _ => Section::None,
                };
                continue;
            }

            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim();
                let value = value.trim();
                match key {
                    "quality" => {
                        rules.quality_preset = Some(value.to_string());
                        continue;
                    }
                    "model" => {
                        rules.model_override = Some(value.to_string());
                        continue;
                    }
                    _ => {}
                }
            }

            match section {
                Section::SystemPrompt => system_prompt_lines.push(line.to_string()),
                Section::Constraints => rules.constraints.push(line.trim_start_matches('-').trim().to_string()),
                Section::Ignore => rules.ignore.push(line.trim_start_matches('-').trim().to_string()),
                Section::None => {}
            }
        }

        rules.system_prompt = system_prompt_lines.join("\n");
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_rules() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(ProjectRules::load(dir.path()), ProjectRules::default());
    }

    #[test]
    fn parses_all_sections_and_overrides() {
        let body = "\
# System Prompt
You are a careful Rust engineer.

# Constraints
- never use unwrap in library code
- keep functions under 40 lines

# Ignore
- target/
- *.lock

quality: thorough
model: coder-large
";
        let rules = ProjectRules::parse(body);
        assert_eq!(rules.system_prompt, "You are a careful Rust engineer.");
        assert_eq!(rules.constraints, vec!["never use unwrap in library code", "keep functions under 40 lines"]);
        assert_eq!(rules.ignore, vec!["target/", "*.lock"]);
        assert_eq!(rules.quality_preset.as_deref(), Some("thorough"));
        assert_eq!(rules.model_override.as_deref(), Some("coder-large"));
    }

    #[test]
    fn unrecognized_heading_is_ignored_section() {
        let body = "# Notes\nthis goes nowhere\n";
        let rules = ProjectRules::parse(body);
        assert!(rules.system_prompt.is_empty());
        assert!(rules.constraints.is_empty());
    }
}
