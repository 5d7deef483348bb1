use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One repository's summary as it appears in the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Render items as a pretty-printed JSON array
pub fn to_json(items: &[RepoSummary]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// Render items as a Markdown bullet list:
/// `- [name](url) — _primary_language_ : summary`
pub fn to_markdown(items: &[RepoSummary]) -> String {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let mut line = format!("- [{}]({})", item.name, item.url);
        if let Some(primary) = item.languages.first() {
            line.push_str(&format!(" — _{}_", primary));
        }
        let tail = item
            .summary
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(item.description.as_str()).filter(|d| !d.is_empty()));
        if let Some(tail) = tail {
            line.push_str(&format!(" : {}", tail));
        }
        lines.push(line);
    }
    lines.join("\n")
}
