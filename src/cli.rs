use crate::config::CliOverrides;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ghsum")]
#[command(version)]
#[command(
    about = "Summarize a GitHub profile's repos",
    long_about = "ghsum fetches a GitHub user's repositories and produces short summaries \
                  of each one, either with a fast deterministic heuristic or with a local \
                  Ollama model. Output is JSON or Markdown, to stdout or a file."
)]
pub struct Cli {
    /// GitHub username (owner)
    pub username: String,

    /// Include languages and a README excerpt
    #[arg(long)]
    pub full: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write to file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Include forked repos
    #[arg(long)]
    pub include_forks: bool,

    /// Include archived repos
    #[arg(long)]
    pub include_archived: bool,

    /// How much README to fetch (defaults to 'excerpt' with --full, 'none' otherwise)
    #[arg(long, value_enum, value_name = "MODE")]
    pub readme: Option<ReadmeMode>,

    /// Summary engine: 'basic' (no LLM) or 'ollama' (local)
    #[arg(long, value_name = "KIND")]
    pub summarizer: Option<String>,

    /// Model name for ollama (ignored for basic)
    #[arg(long, value_name = "NAME")]
    pub model: Option<String>,

    /// Path to config.toml (defaults to ./config.toml if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Md,
}

/// How much README text is fetched and passed to the summarizer
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadmeMode {
    /// Skip the README entirely
    None,
    /// First real paragraph, word-capped
    Excerpt,
    /// Full cleaned README text
    Full,
}

impl Cli {
    /// Effective README mode: an explicit flag wins, otherwise `--full`
    /// implies an excerpt
    pub fn readme_mode(&self) -> ReadmeMode {
        match self.readme {
            Some(mode) => mode,
            None if self.full => ReadmeMode::Excerpt,
            None => ReadmeMode::None,
        }
    }

    /// The CLI layer of the settings merge
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            summarizer: self.summarizer.clone(),
            model: self.model.clone(),
            include_forks: self.include_forks,
            include_archived: self.include_archived,
        }
    }
}
