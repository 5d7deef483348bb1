use crate::error::{GhsumError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const GH_API: &str = "https://api.github.com";
const GH_API_VERSION: &str = "2022-11-28";
const PER_PAGE: u32 = 100;

/// The fields of one GitHub repository relevant to summarization
#[derive(Debug, Clone)]
pub struct RepoRecord {
    /// Repository name (non-empty, API-provided)
    pub name: String,
    /// Browser URL of the repository
    pub url: String,
    /// One-line description, empty when unset
    pub description: String,
    /// Fork flag
    pub fork: bool,
    /// Archived flag
    pub archived: bool,
    /// Top languages, ordered by byte count descending
    pub languages: Vec<String>,
}

/// Repository metadata as returned by the GitHub REST API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRepo {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
}

impl ApiRepo {
    fn into_record(self) -> RepoRecord {
        RepoRecord {
            name: self.name,
            url: self.html_url,
            description: self.description.unwrap_or_default(),
            fork: self.fork,
            archived: self.archived,
            languages: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReadmePayload {
    encoding: Option<String>,
    content: Option<String>,
}

/// Thin client over the GitHub REST API
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Create a new client with an optional bearer token
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GH_API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("ghsum/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| GhsumError::config("GITHUB_TOKEN contains invalid characters"))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: GH_API.to_string(),
        })
    }

    /// List repositories owned by `username`.
    ///
    /// Follows pagination until an empty page, preserves API ordering and
    /// drops forks and archived repositories per the flags.
    pub async fn list_user_repos(
        &self,
        username: &str,
        include_forks: bool,
        include_archived: bool,
    ) -> Result<Vec<RepoRecord>> {
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            let url = format!("{}/users/{}/repos", self.base_url, username);
            tracing::debug!(%url, page, "fetching repo page");
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("per_page", PER_PAGE.to_string()),
                    ("page", page.to_string()),
                    ("type", "owner".to_string()),
                    ("sort", "updated".to_string()),
                ])
                .send()
                .await?;

            let response = check_status(response, &format!("user '{}'", username)).await?;
            let batch: Vec<ApiRepo> = response.json().await?;
            if batch.is_empty() {
                break;
            }

            for repo in batch {
                if should_include(&repo, include_forks, include_archived) {
                    records.push(repo.into_record());
                }
            }
            page += 1;
        }

        tracing::debug!(count = records.len(), "repo listing complete");
        Ok(records)
    }

    /// Fetch the language breakdown (bytes per language) for a repository
    pub async fn get_languages(&self, owner: &str, repo: &str) -> Result<HashMap<String, u64>> {
        let url = format!("{}/repos/{}/{}/languages", self.base_url, owner, repo);
        let response = self.client.get(&url).send().await?;
        let response = check_status(response, &format!("repo '{}/{}'", owner, repo)).await?;
        Ok(response.json().await?)
    }

    /// Fetch README content as text.
    ///
    /// A missing README is not an error; it degrades to `None`.
    pub async fn get_readme(&self, owner: &str, repo: &str) -> Result<Option<String>> {
        let url = format!("{}/repos/{}/{}/readme", self.base_url, owner, repo);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(owner, repo, "no README");
            return Ok(None);
        }
        let response = check_status(response, &format!("repo '{}/{}'", owner, repo)).await?;
        let payload: ReadmePayload = response.json().await?;
        Ok(decode_readme(&payload))
    }
}

/// Map GitHub error statuses onto the error taxonomy
async fn check_status(response: Response, resource: &str) -> Result<Response> {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            let message = response.text().await.unwrap_or_default();
            Err(GhsumError::Auth {
                status: status.as_u16(),
                message,
            })
        }
        StatusCode::NOT_FOUND => Err(GhsumError::NotFound(resource.to_string())),
        _ => Ok(response.error_for_status()?),
    }
}

/// Repo-list filter: forks and archived repos are dropped unless requested
pub fn should_include(repo: &ApiRepo, include_forks: bool, include_archived: bool) -> bool {
    if repo.fork && !include_forks {
        return false;
    }
    if repo.archived && !include_archived {
        return false;
    }
    true
}

/// Decode the base64 README payload the API returns.
///
/// GitHub inserts newlines into the encoded content, so whitespace is
/// stripped before decoding; invalid UTF-8 is replaced rather than fatal.
fn decode_readme(payload: &ReadmePayload) -> Option<String> {
    let content = payload.content.as_deref()?;
    if payload.encoding.as_deref() != Some("base64") {
        return None;
    }
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Top `k` language names ordered by byte count descending, name
/// ascending on ties, so output is deterministic
pub fn top_languages(lang_bytes: &HashMap<String, u64>, k: usize) -> Vec<String> {
    let mut pairs: Vec<(&String, &u64)> = lang_bytes.iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    pairs.into_iter().take(k).map(|(name, _)| name.clone()).collect()
}
