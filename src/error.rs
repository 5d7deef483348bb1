use thiserror::Error;

/// Main error type for ghsum
#[derive(Error, Debug)]
pub enum GhsumError {
    /// Configuration errors (malformed file, invalid enumerated value)
    #[error("Configuration error: {0}")]
    Config(String),

    /// GitHub rejected the token (401/403)
    #[error("GitHub authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// User or repository does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic HTTP transport errors
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// LLM endpoint unreachable or returned an error
    #[error("Summarizer error: {0}")]
    Summarizer(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Result type alias for ghsum operations
pub type Result<T> = std::result::Result<T, GhsumError>;

impl GhsumError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new summarizer error
    pub fn summarizer<S: Into<String>>(msg: S) -> Self {
        Self::Summarizer(msg.into())
    }
}
