pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Failure of a single phase calculator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("{phase} analysis is malformed: {reason}")]
    Malformed { phase: &'static str, reason: String },

    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },

    #[error("{phase} analysis unavailable: {reason}")]
    Unavailable { phase: &'static str, reason: String },
}

impl ScoringError {
    pub fn malformed(phase: &'static str, err: impl std::fmt::Display) -> Self {
        ScoringError::Malformed {
            phase,
            reason: err.to_string(),
        }
    }

    pub fn unavailable(phase: &'static str, err: impl std::fmt::Display) -> Self {
        ScoringError::Unavailable {
            phase,
            reason: err.to_string(),
        }
    }
}
