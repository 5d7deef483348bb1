use crate::error::{GhsumError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Which summary engine to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizerKind {
    /// Deterministic text extraction, no network
    Basic,
    /// Local Ollama LLM endpoint
    Ollama,
}

impl SummarizerKind {
    /// Parse a kind string, naming the offending key on failure so the
    /// error points at the layer it came from (file key, env var or flag).
    pub fn parse(value: &str, key: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "ollama" => Ok(Self::Ollama),
            other => Err(GhsumError::config(format!(
                "invalid value for {}: '{}' (expected 'basic' or 'ollama')",
                key, other
            ))),
        }
    }
}

/// Resolved configuration snapshot for one invocation.
///
/// Built once at startup and passed through the pipeline; precedence is
/// CLI flag > environment variable > config file > built-in default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub summarizer_kind: SummarizerKind,
    pub model: String,
    pub num_ctx: u32,
    pub ollama_base_url: String,
    pub prompt_template_file: Option<PathBuf>,
    pub prompt_version: String,
    pub cache_dir: String,
    pub include_forks: bool,
    pub include_archived: bool,
    pub github_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            summarizer_kind: SummarizerKind::Basic,
            model: String::from("llama3.2:3b"),
            num_ctx: 8192,
            ollama_base_url: String::from("http://localhost:11434"),
            prompt_template_file: None,
            prompt_version: String::from("v1"),
            cache_dir: String::from(".cache"),
            include_forks: false,
            include_archived: false,
            github_token: None,
        }
    }
}

/// On-disk config file shape; every field optional so a sparse file
/// overlays only the keys it sets
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub summarizer: SummarizerSection,
    #[serde(default)]
    pub prompt: PromptSection,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub github: GithubSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummarizerSection {
    pub kind: Option<String>,
    pub model: Option<String>,
    pub num_ctx: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptSection {
    pub template_file: Option<PathBuf>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSection {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubSection {
    pub include_forks: Option<bool>,
    pub include_archived: Option<bool>,
}

/// Environment layer, restricted to a fixed enumerated set of variables.
///
/// Modeled as a plain struct so the merge stays pure and tests can build
/// a layer without touching the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub github_token: Option<String>,
    pub ollama_base_url: Option<String>,
    pub summarizer: Option<String>,
    pub model: Option<String>,
    pub num_ctx: Option<String>,
}

impl EnvOverrides {
    /// Capture the recognized variables from the process environment
    pub fn from_env() -> Self {
        Self {
            github_token: env::var("GITHUB_TOKEN").ok(),
            ollama_base_url: env::var("OLLAMA_BASE_URL").ok(),
            summarizer: env::var("SUMMARIZER").ok(),
            model: env::var("SUMMARY_MODEL").ok(),
            num_ctx: env::var("SUMMARY_NUM_CTX").ok(),
        }
    }
}

/// CLI layer; flags the user did not pass stay `None`/`false` and leave
/// the lower layers untouched
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub summarizer: Option<String>,
    pub model: Option<String>,
    pub include_forks: bool,
    pub include_archived: bool,
}

/// Merge all layers into a `Settings` snapshot.
///
/// Strictly layered: defaults, then file, then environment, then CLI.
/// An invalid enumerated value in any layer fails the whole resolution
/// with a ConfigError naming the offending key; no partial application.
pub fn resolve(file: &FileConfig, env: &EnvOverrides, cli: &CliOverrides) -> Result<Settings> {
    let mut s = Settings::default();

    // file layer
    if let Some(ref kind) = file.summarizer.kind {
        s.summarizer_kind = SummarizerKind::parse(kind, "summarizer.kind")?;
    }
    if let Some(ref model) = file.summarizer.model {
        s.model = model.clone();
    }
    if let Some(num_ctx) = file.summarizer.num_ctx {
        s.num_ctx = num_ctx;
    }
    if let Some(ref path) = file.prompt.template_file {
        s.prompt_template_file = Some(path.clone());
    }
    if let Some(ref version) = file.prompt.version {
        s.prompt_version = version.clone();
    }
    if let Some(ref dir) = file.cache.dir {
        s.cache_dir = dir.clone();
    }
    if let Some(include_forks) = file.github.include_forks {
        s.include_forks = include_forks;
    }
    if let Some(include_archived) = file.github.include_archived {
        s.include_archived = include_archived;
    }

    // environment layer
    if let Some(ref token) = env.github_token {
        s.github_token = Some(token.clone());
    }
    if let Some(ref url) = env.ollama_base_url {
        s.ollama_base_url = url.clone();
    }
    if let Some(ref kind) = env.summarizer {
        s.summarizer_kind = SummarizerKind::parse(kind, "SUMMARIZER")?;
    }
    if let Some(ref model) = env.model {
        s.model = model.clone();
    }
    if let Some(ref num_ctx) = env.num_ctx {
        s.num_ctx = num_ctx.parse().map_err(|_| {
            GhsumError::config(format!(
                "invalid value for SUMMARY_NUM_CTX: '{}' (expected an integer)",
                num_ctx
            ))
        })?;
    }

    // CLI layer wins
    if let Some(ref kind) = cli.summarizer {
        s.summarizer_kind = SummarizerKind::parse(kind, "--summarizer")?;
    }
    if let Some(ref model) = cli.model {
        s.model = model.clone();
    }
    if cli.include_forks {
        s.include_forks = true;
    }
    if cli.include_archived {
        s.include_archived = true;
    }

    Ok(s)
}

/// Load and resolve settings for one invocation.
///
/// An explicitly given config path must exist; without one, `./config.toml`
/// and `~/.config/ghsum/config.toml` are tried in order and the run falls
/// back silently to defaults when neither is present.
pub fn load_settings(config_path: Option<&Path>, cli: &CliOverrides) -> Result<Settings> {
    let file = match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(GhsumError::config(format!(
                    "config file not found at: {}",
                    path.display()
                )));
            }
            parse_file(path)?
        }
        None => match find_default_config() {
            Some(path) => parse_file(&path)?,
            None => FileConfig::default(),
        },
    };

    resolve(&file, &EnvOverrides::from_env(), cli)
}

fn parse_file(path: &Path) -> Result<FileConfig> {
    tracing::debug!(path = %path.display(), "loading config file");
    let contents = fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&contents)?;
    Ok(config)
}

fn find_default_config() -> Option<PathBuf> {
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    let home = dirs::home_dir()?
        .join(".config")
        .join("ghsum")
        .join(DEFAULT_CONFIG_FILE);
    home.exists().then_some(home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_settings_defaults() {
        let s = Settings::default();
        assert_eq!(s.summarizer_kind, SummarizerKind::Basic);
        assert_eq!(s.model, "llama3.2:3b");
        assert_eq!(s.num_ctx, 8192);
        assert_eq!(s.ollama_base_url, "http://localhost:11434");
        assert_eq!(s.cache_dir, ".cache");
        assert!(!s.include_forks);
        assert!(!s.include_archived);
        assert!(s.github_token.is_none());
    }

    #[test]
    fn test_file_layer_overlays_defaults() {
        let file: FileConfig = toml::from_str(
            r#"
            [summarizer]
            kind = "ollama"
            model = "qwen2.5:7b"
            num_ctx = 4096

            [prompt]
            template_file = "prompts/summary.txt"
            version = "v2"

            [cache]
            dir = "/tmp/ghsum-cache"

            [github]
            include_forks = true
            include_archived = true
            "#,
        )
        .unwrap();

        let s = resolve(&file, &EnvOverrides::default(), &CliOverrides::default()).unwrap();
        assert_eq!(s.summarizer_kind, SummarizerKind::Ollama);
        assert_eq!(s.model, "qwen2.5:7b");
        assert_eq!(s.num_ctx, 4096);
        assert_eq!(
            s.prompt_template_file,
            Some(PathBuf::from("prompts/summary.txt"))
        );
        assert_eq!(s.prompt_version, "v2");
        assert_eq!(s.cache_dir, "/tmp/ghsum-cache");
        assert!(s.include_forks);
        assert!(s.include_archived);
    }

    #[test]
    fn test_sparse_file_keeps_defaults() {
        let file: FileConfig = toml::from_str(
            r#"
            [summarizer]
            model = "mistral:7b"
            "#,
        )
        .unwrap();

        let s = resolve(&file, &EnvOverrides::default(), &CliOverrides::default()).unwrap();
        assert_eq!(s.summarizer_kind, SummarizerKind::Basic);
        assert_eq!(s.model, "mistral:7b");
        assert_eq!(s.num_ctx, 8192);
    }

    #[test]
    fn test_env_overrides_file() {
        let file: FileConfig = toml::from_str(
            r#"
            [summarizer]
            model = "from-file"
            "#,
        )
        .unwrap();
        let env = EnvOverrides {
            model: Some("from-env".to_string()),
            github_token: Some("ghp_test".to_string()),
            ..Default::default()
        };

        let s = resolve(&file, &env, &CliOverrides::default()).unwrap();
        assert_eq!(s.model, "from-env");
        assert_eq!(s.github_token, Some("ghp_test".to_string()));
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        // Three conflicting sources for the same key
        let file: FileConfig = toml::from_str(
            r#"
            [summarizer]
            model = "from-file"
            "#,
        )
        .unwrap();
        let env = EnvOverrides {
            model: Some("from-env".to_string()),
            ..Default::default()
        };
        let cli = CliOverrides {
            model: Some("from-cli".to_string()),
            ..Default::default()
        };

        let s = resolve(&file, &env, &cli).unwrap();
        assert_eq!(s.model, "from-cli");

        // Without the CLI layer the environment wins
        let s = resolve(&file, &env, &CliOverrides::default()).unwrap();
        assert_eq!(s.model, "from-env");

        // Without either, the file wins over the default
        let s = resolve(&file, &EnvOverrides::default(), &CliOverrides::default()).unwrap();
        assert_eq!(s.model, "from-file");
    }

    #[test]
    fn test_invalid_kind_names_file_key() {
        let file: FileConfig = toml::from_str(
            r#"
            [summarizer]
            kind = "foo"
            "#,
        )
        .unwrap();
        let err = resolve(&file, &EnvOverrides::default(), &CliOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("summarizer.kind"));
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn test_invalid_kind_names_env_var() {
        let env = EnvOverrides {
            summarizer: Some("gpt".to_string()),
            ..Default::default()
        };
        let err = resolve(&FileConfig::default(), &env, &CliOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("SUMMARIZER"));
    }

    #[test]
    fn test_invalid_kind_names_cli_flag() {
        let cli = CliOverrides {
            summarizer: Some("foo".to_string()),
            ..Default::default()
        };
        let err = resolve(&FileConfig::default(), &EnvOverrides::default(), &cli).unwrap_err();
        assert!(err.to_string().contains("--summarizer"));
    }

    #[test]
    fn test_invalid_num_ctx_env() {
        let env = EnvOverrides {
            num_ctx: Some("lots".to_string()),
            ..Default::default()
        };
        let err = resolve(&FileConfig::default(), &env, &CliOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("SUMMARY_NUM_CTX"));
    }

    #[test]
    fn test_kind_parse_case_insensitive() {
        assert_eq!(
            SummarizerKind::parse("OLLAMA", "--summarizer").unwrap(),
            SummarizerKind::Ollama
        );
        assert_eq!(
            SummarizerKind::parse("Basic", "--summarizer").unwrap(),
            SummarizerKind::Basic
        );
    }

    #[test]
    fn test_load_settings_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[summarizer]\nkind = \"ollama\"").unwrap();

        let s = load_settings(Some(file.path()), &CliOverrides::default()).unwrap();
        assert_eq!(s.summarizer_kind, SummarizerKind::Ollama);
    }

    #[test]
    fn test_load_settings_missing_explicit_path() {
        let err = load_settings(
            Some(Path::new("/nonexistent/ghsum-config.toml")),
            &CliOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GhsumError::Config(_)));
    }

    #[test]
    fn test_load_settings_malformed_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[summarizer\nkind = ").unwrap();

        let err = load_settings(Some(file.path()), &CliOverrides::default()).unwrap_err();
        assert!(matches!(err, GhsumError::TomlParse(_)));
    }
}
