use crate::config::Settings;
use crate::error::Result;
use std::fs;

/// Built-in prompt used when no template file is configured
pub const DEFAULT_TEMPLATE: &str = "\
You are a concise technical writer. Summarize this repository for a personal site or resume.

Constraints:
- 3-5 lines (60-120 words total).
- Explain WHAT it does, HOW at a high level, and key TECH.
- Neutral technical tone. No hype, emojis or markdown.

Repository name: {repo_name}
Existing one-line description (may be empty): {description}

Text:
{text}
";

/// Plain-text prompt template with `{repo_name}`, `{description}` and
/// `{text}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Load the template configured in settings, falling back to the
    /// built-in one when no file is configured or the file is absent
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        match settings.prompt_template_file.as_deref() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading prompt template");
                Ok(Self::new(fs::read_to_string(path)?))
            }
            _ => Ok(Self::new(DEFAULT_TEMPLATE)),
        }
    }

    /// Substitute the placeholders and return the rendered prompt
    pub fn render(&self, repo_name: &str, description: &str, text: &str) -> String {
        self.text
            .replace("{repo_name}", repo_name)
            .replace("{description}", description)
            .replace("{text}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_template_has_placeholders() {
        assert!(DEFAULT_TEMPLATE.contains("{repo_name}"));
        assert!(DEFAULT_TEMPLATE.contains("{description}"));
        assert!(DEFAULT_TEMPLATE.contains("{text}"));
    }

    #[test]
    fn test_render_substitutes_all_placeholders() {
        let template = PromptTemplate::new("name={repo_name} desc={description} body={text}");
        let rendered = template.render("ghsum", "a summarizer", "README body");
        assert_eq!(rendered, "name=ghsum desc=a summarizer body=README body");
    }

    #[test]
    fn test_render_with_empty_description() {
        let template = PromptTemplate::new("[{description}]");
        assert_eq!(template.render("x", "", "y"), "[]");
    }

    #[test]
    fn test_from_settings_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "custom: {{repo_name}}").unwrap();

        let settings = Settings {
            prompt_template_file: Some(file.path().to_path_buf()),
            ..Settings::default()
        };
        let template = PromptTemplate::from_settings(&settings).unwrap();
        assert_eq!(template.render("r", "", ""), "custom: r");
    }

    #[test]
    fn test_from_settings_missing_file_falls_back() {
        let settings = Settings {
            prompt_template_file: Some(PathBuf::from("/nonexistent/template.txt")),
            ..Settings::default()
        };
        let template = PromptTemplate::from_settings(&settings).unwrap();
        let rendered = template.render("r", "d", "t");
        assert!(rendered.contains("Repository name: r"));
    }
}
