pub mod basic;
pub mod ollama;
pub mod prompt;

use crate::config::{Settings, SummarizerKind};
use crate::error::Result;
use crate::github::RepoRecord;
use async_trait::async_trait;

/// Cap on text handed to a summarizer, to keep latency reasonable
pub const MAX_INPUT_CHARS: usize = 12_000;

const TRUNCATION_MARKER: &str = "\n[...truncated...]";

/// A repository name paired with its generated summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub name: String,
    pub summary: String,
}

impl SummaryResult {
    pub fn new(name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: summary.into(),
        }
    }
}

/// Strategy that turns README/description text into a short summary.
///
/// Input text is expected to be cleaned of markup before it gets here.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, repo: &RepoRecord, text: &str) -> Result<String>;

    /// Engine name for logging
    fn name(&self) -> &'static str;
}

/// Build the summarizer selected by the resolved settings.
///
/// Unrecognized kind strings are rejected earlier, when the settings are
/// resolved, so no network client is ever constructed for a bad kind.
pub fn get_summarizer(settings: &Settings) -> Result<Box<dyn Summarizer>> {
    match settings.summarizer_kind {
        SummarizerKind::Basic => Ok(Box::new(basic::BasicSummarizer::new())),
        SummarizerKind::Ollama => Ok(Box::new(ollama::OllamaSummarizer::from_settings(settings)?)),
    }
}

/// Cap overly long inputs, appending a marker when text was dropped
pub fn cap(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        return text.to_string();
    }
    let mut end = max_chars;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &text[..end], TRUNCATION_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_short_input_untouched() {
        assert_eq!(cap("short", 100), "short");
    }

    #[test]
    fn test_cap_long_input_marked() {
        let long = "a".repeat(200);
        let capped = cap(&long, 100);
        assert!(capped.starts_with(&"a".repeat(100)));
        assert!(capped.ends_with("[...truncated...]"));
    }

    #[test]
    fn test_cap_respects_char_boundaries() {
        // 'é' is two bytes; a cut at byte 3 must back up to a boundary
        let capped = cap("ééé", 3);
        assert!(capped.starts_with("é"));
        assert!(capped.ends_with("[...truncated...]"));
    }

    #[test]
    fn test_factory_returns_basic_by_default() {
        let settings = Settings::default();
        let summarizer = get_summarizer(&settings).unwrap();
        assert_eq!(summarizer.name(), "basic");
    }

    #[test]
    fn test_factory_returns_ollama() {
        let settings = Settings {
            summarizer_kind: crate::config::SummarizerKind::Ollama,
            ..Settings::default()
        };
        let summarizer = get_summarizer(&settings).unwrap();
        assert_eq!(summarizer.name(), "ollama");
    }

    #[test]
    fn test_summary_result_fields() {
        let result = SummaryResult::new("repo", "a summary");
        assert_eq!(result.name, "repo");
        assert_eq!(result.summary, "a summary");
    }
}
