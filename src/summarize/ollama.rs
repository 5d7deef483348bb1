use super::prompt::PromptTemplate;
use super::{cap, Summarizer, MAX_INPUT_CHARS};
use crate::config::Settings;
use crate::error::{GhsumError, Result};
use crate::github::RepoRecord;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Summarizer backed by a local Ollama server's generate API
pub struct OllamaSummarizer {
    client: Client,
    base_url: String,
    model: String,
    num_ctx: u32,
    template: PromptTemplate,
}

impl OllamaSummarizer {
    /// Build a summarizer from resolved settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let template = PromptTemplate::from_settings(settings)?;

        Ok(Self {
            client,
            base_url: settings.ollama_base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            num_ctx: settings.num_ctx,
            template,
        })
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(&self, repo: &RepoRecord, text: &str) -> Result<String> {
        let prompt = self
            .template
            .render(&repo.name, &repo.description, &cap(text, MAX_INPUT_CHARS));

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_ctx: self.num_ctx,
                temperature: 0.0,
            },
        };

        let url = format!("{}/api/generate", self.base_url);
        tracing::debug!(%url, model = %self.model, repo = %repo.name, "ollama request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                GhsumError::summarizer(format!("could not reach Ollama at {}: {}", self.base_url, e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GhsumError::summarizer(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GhsumError::summarizer(format!("invalid Ollama response: {}", e)))?;

        Ok(generated.response.trim().to_string())
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_ctx: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings_strips_trailing_slash() {
        let settings = Settings {
            ollama_base_url: "http://localhost:11434/".to_string(),
            ..Settings::default()
        };
        let summarizer = OllamaSummarizer::from_settings(&settings).unwrap();
        assert_eq!(summarizer.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_generate_request_shape() {
        let request = GenerateRequest {
            model: "llama3.2:3b",
            prompt: "Summarize: hello".to_string(),
            stream: false,
            options: GenerateOptions {
                num_ctx: 8192,
                temperature: 0.0,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama3.2:3b");
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["num_ctx"], 8192);
    }

    #[test]
    fn test_generate_response_parse() {
        let json = r#"{"model":"llama3.2:3b","response":"  A summary.  ","done":true}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.response.trim(), "A summary.");
    }
}
