use super::Summarizer;
use crate::error::Result;
use crate::github::RepoRecord;
use async_trait::async_trait;
use regex::Regex;

/// Word cap for basic summaries
pub const DEFAULT_MAX_WORDS: usize = 90;

/// Deterministic, offline summarizer.
///
/// Extracts the first real paragraph of the cleaned text and caps it to a
/// bounded number of words. Same input, same output; no network.
pub struct BasicSummarizer {
    max_words: usize,
}

impl BasicSummarizer {
    pub fn new() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
        }
    }

    /// Override the word cap
    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }
}

impl Default for BasicSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Summarizer for BasicSummarizer {
    async fn summarize(&self, repo: &RepoRecord, text: &str) -> Result<String> {
        basic_summary(&repo.name, text, &repo.description, self.max_words)
    }

    fn name(&self) -> &'static str {
        "basic"
    }
}

/// Strip markdown noise: code fences, image/badge lines, heading lines,
/// link syntax and inline code markers.
pub fn clean_markdown(text: &str) -> Result<String> {
    // fences first so heading-like lines inside code blocks go with them
    let fences = Regex::new(r"(?s)```.*?```")?;
    let without_fences = fences.replace_all(text, "");

    let image_line = Regex::new(r"!\[.*\]\(.*\)")?;
    let kept: Vec<&str> = without_fences
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.starts_with('#') && !image_line.is_match(line)
        })
        .collect();
    let joined = kept.join("\n");

    // [text](url) -> text
    let links = Regex::new(r"\[([^\]]*)\]\([^)]*\)")?;
    let unlinked = links.replace_all(&joined, "$1");

    let inline_code = Regex::new(r"`([^`]+)`")?;
    let plain = inline_code.replace_all(&unlinked, "$1");

    Ok(plain.trim().to_string())
}

/// First run of consecutive non-empty lines, joined with spaces
pub fn first_paragraph(text: &str) -> Option<String> {
    let mut para: Vec<&str> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            para.push(trimmed);
        } else if !para.is_empty() {
            break;
        }
    }
    if para.is_empty() {
        None
    } else {
        Some(para.join(" "))
    }
}

/// Cap text at `max_words` whitespace-separated words
pub fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short excerpt of already-cleaned text: first real paragraph, capped
/// to `word_limit` words. Falls back to the whole text when no paragraph
/// boundary exists.
pub fn excerpt(cleaned: &str, word_limit: usize) -> String {
    let raw = match first_paragraph(cleaned) {
        Some(para) => para,
        None => cleaned.to_string(),
    };
    truncate_words(&raw, word_limit)
}

/// Heuristic summary: first paragraph of the cleaned text, word-capped.
///
/// Falls back to the description and finally the repository name when the
/// text cleans down to nothing, so the result is never empty.
pub fn basic_summary(
    repo_name: &str,
    text: &str,
    description: &str,
    max_words: usize,
) -> Result<String> {
    for source in [text, description] {
        if source.trim().is_empty() {
            continue;
        }
        let cleaned = clean_markdown(source)?;
        let raw = match first_paragraph(&cleaned) {
            Some(para) => para,
            None => cleaned,
        };
        let summary = truncate_words(&raw, max_words);
        if !summary.is_empty() {
            return Ok(summary);
        }
    }
    Ok(repo_name.to_string())
}
