use crate::cli::ReadmeMode;
use crate::config::Settings;
use crate::error::Result;
use crate::github::{top_languages, GitHubClient, RepoRecord};
use crate::output::RepoSummary;
use crate::summarize::basic::{clean_markdown, excerpt};
use crate::summarize::{get_summarizer, Summarizer, SummaryResult};

/// Languages reported per repository
const TOP_LANGUAGES: usize = 3;

/// Word cap for README excerpts
const EXCERPT_WORDS: usize = 500;

/// Coordinates the per-repository pipeline: languages, README, summary
pub struct Orchestrator {
    settings: Settings,
    github: GitHubClient,
    summarizer: Box<dyn Summarizer>,
}

impl Orchestrator {
    /// Create a new orchestrator from resolved settings
    pub fn new(settings: Settings) -> Result<Self> {
        let github = GitHubClient::new(settings.github_token.as_deref())?;
        let summarizer = get_summarizer(&settings)?;
        tracing::debug!(
            engine = summarizer.name(),
            model = %settings.model,
            prompt_version = %settings.prompt_version,
            cache_dir = %settings.cache_dir,
            "summarizer selected"
        );

        Ok(Self {
            settings,
            github,
            summarizer,
        })
    }

    /// Fetch the user's repositories, filtered per settings
    pub async fn list_repos(&self, username: &str) -> Result<Vec<RepoRecord>> {
        self.github
            .list_user_repos(
                username,
                self.settings.include_forks,
                self.settings.include_archived,
            )
            .await
    }

    /// Produce the output item for one repository.
    ///
    /// Sequential per-resource fetches, no retries: languages when
    /// requested, README per mode, then the summary when any base text
    /// exists. README text is cleaned before it reaches the summarizer.
    pub async fn summarize_repo(
        &self,
        owner: &str,
        record: &RepoRecord,
        include_langs: bool,
        readme_mode: ReadmeMode,
    ) -> Result<RepoSummary> {
        let mut record = record.clone();
        tracing::debug!(
            repo = %record.name,
            fork = record.fork,
            archived = record.archived,
            "summarizing"
        );

        if include_langs {
            let lang_bytes = self.github.get_languages(owner, &record.name).await?;
            record.languages = top_languages(&lang_bytes, TOP_LANGUAGES);
        }

        let mut readme_excerpt = None;
        let mut readme_full = None;
        let mut base_text = String::new();

        if readme_mode != ReadmeMode::None {
            if let Some(raw) = self.github.get_readme(owner, &record.name).await? {
                let cleaned = clean_markdown(&raw)?;
                match readme_mode {
                    ReadmeMode::Full => {
                        base_text = cleaned.clone();
                        readme_full = Some(cleaned);
                    }
                    ReadmeMode::Excerpt => {
                        let text = excerpt(&cleaned, EXCERPT_WORDS);
                        base_text = text.clone();
                        readme_excerpt = Some(text);
                    }
                    ReadmeMode::None => unreachable!(),
                }
            }
        }

        let summary = if !base_text.is_empty() || !record.description.is_empty() {
            let text = self.summarizer.summarize(&record, &base_text).await?;
            Some(SummaryResult::new(&record.name, text))
        } else {
            tracing::debug!(repo = %record.name, "no text to summarize");
            None
        };

        Ok(RepoSummary {
            name: record.name,
            url: record.url,
            description: record.description,
            languages: record.languages,
            readme_excerpt,
            readme: readme_full,
            summary: summary.map(|s| s.summary),
        })
    }

    /// Get a reference to the settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
