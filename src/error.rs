use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Classification attached to every extraction failure.
///
/// Retry behaviour is a function of this code alone, see [`ErrorCode::is_retryable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NetworkError,
    NoRecipeFound,
    ParsingError,
    ApiLimit,
    Timeout,
    ValidationError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::NoRecipeFound => "NO_RECIPE_FOUND",
            ErrorCode::ParsingError => "PARSING_ERROR",
            ErrorCode::ApiLimit => "API_LIMIT",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
        }
    }

    /// Whether repeating the same operation can change the outcome.
    ///
    /// `NoRecipeFound` and `ValidationError` describe the input, not the
    /// transport, so they are never retried.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ErrorCode::NoRecipeFound | ErrorCode::ValidationError)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// A classified failure raised anywhere inside the extraction pipeline.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ExtractionError {
    pub code: ErrorCode,
    pub message: String,
    pub source_url: Option<String>,
    /// HTTP status of the response that caused the failure, if any
    pub http_status: Option<u16>,
    /// Underlying error, kept for diagnostics only
    #[source]
    pub cause: Option<Cause>,
}

impl ExtractionError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source_url: None,
            http_status: None,
            cause: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, message)
    }

    pub fn no_recipe(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoRecipeFound, message)
    }

    pub fn parsing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParsingError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Timeout, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Build an error from a non-success HTTP status.
    ///
    /// 429 maps to `ApiLimit`, everything else to `NetworkError`.
    pub fn from_status(status: u16, context: &str) -> Self {
        let code = if status == 429 {
            ErrorCode::ApiLimit
        } else {
            ErrorCode::NetworkError
        };
        let mut err = Self::new(code, format!("{context} (HTTP {status})"));
        err.http_status = Some(status);
        err
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl From<reqwest::Error> for ExtractionError {
    fn from(err: reqwest::Error) -> Self {
        let base = if err.is_timeout() {
            ExtractionError::timeout("Request timed out")
        } else if let Some(status) = err.status() {
            ExtractionError::from_status(status.as_u16(), "Request failed")
        } else if err.is_decode() {
            ExtractionError::parsing("Could not decode response body")
        } else {
            ExtractionError::network(format!("Request failed: {err}"))
        };
        base.with_cause(err)
    }
}

impl From<serde_json::Error> for ExtractionError {
    fn from(err: serde_json::Error) -> Self {
        ExtractionError::parsing(format!("Response was not valid JSON: {err}")).with_cause(err)
    }
}

/// Errors raised while setting up an importer, before any extraction runs
#[derive(Error, Debug)]
pub enum ImportError {
    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// A provider could not be created from its configuration
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Failed to construct the HTTP client
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
