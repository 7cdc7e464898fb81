use thiserror::Error;

/// Main error type for the prediction service
#[derive(Error, Debug)]
pub enum MedriskError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Focus disease not found in class catalog: {0}")]
    UnknownFocusDisease(String),

    // Artifact errors
    #[error("Artifact error: {path} - {reason}")]
    Artifact { path: String, reason: String },

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    // Request errors
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unknown symptoms: {}", .0.join(", "))]
    UnknownSymptoms(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    // Inference errors
    #[error("Inference failed: {0}")]
    Inference(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl MedriskError {
    pub fn artifact(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Artifact {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Errors caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedInput(_) | Self::UnknownSymptoms(_) | Self::Validation(_)
        )
    }
}

/// Result type alias for MedriskError
pub type Result<T> = std::result::Result<T, MedriskError>;
