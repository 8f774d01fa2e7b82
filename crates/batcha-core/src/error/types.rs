//! Core error types and traits for batcha

use thiserror::Error;

/// Result type alias for batcha operations
pub type BatchaResult<T> = Result<T, BatchaError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C: std::fmt::Display>(self, context: C) -> BatchaResult<T>;

    /// Add context lazily (only evaluated on error)
    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> BatchaResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context<C: std::fmt::Display>(self, context: C) -> BatchaResult<T> {
        self.map_err(|e| BatchaError::other(format!("{}: {}", context, e)))
    }

    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> BatchaResult<T> {
        self.map_err(|e| BatchaError::other(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with context message
    fn context<C: std::fmt::Display>(self, context: C) -> BatchaResult<T>;

    /// Convert Option to Result with lazy context message
    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> BatchaResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context<C: std::fmt::Display>(self, context: C) -> BatchaResult<T> {
        self.ok_or_else(|| BatchaError::other(context.to_string()))
    }

    fn with_context<C: std::fmt::Display, F: FnOnce() -> C>(self, f: F) -> BatchaResult<T> {
        self.ok_or_else(|| BatchaError::other(f().to_string()))
    }
}

/// Main error type for batcha
#[derive(Error, Debug, Clone)]
pub enum BatchaError {
    /// Configuration file errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Template rendering errors
    #[error("Template error: {message}")]
    Template {
        message: String,
        path: Option<String>,
    },

    /// Local job definition validation failures
    #[error("verification failed with {} error(s)", .errors.len())]
    Validation { errors: Vec<String> },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// YAML serialization/deserialization errors
    #[error("YAML error: {message}")]
    Yaml { message: String },

    /// Transport-level HTTP errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
    },

    /// Error responses returned by the Batch or Logs service
    #[error("{operation} failed (status {status_code}): {message}")]
    Service {
        operation: String,
        status_code: u16,
        message: String,
    },

    /// Resource not found
    #[error("{message}")]
    NotFound {
        message: String,
        resource_type: Option<String>,
    },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// A submitted job reached the FAILED state
    #[error("job failed: {reason}")]
    JobFailed { job_id: String, reason: String },

    /// Operation was cancelled by a signal
    #[error("Operation was cancelled")]
    Cancelled,

    /// `diff` found differences between the local and remote definition
    #[error("differences found")]
    DifferencesFound,

    /// Generic error
    #[error("{message}")]
    Other { message: String },
}

impl BatchaError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "BATCHA_CONFIG",
            Self::Template { .. } => "BATCHA_TEMPLATE",
            Self::Validation { .. } => "BATCHA_VALIDATION",
            Self::Io { .. } => "BATCHA_IO",
            Self::Json { .. } => "BATCHA_JSON",
            Self::Yaml { .. } => "BATCHA_YAML",
            Self::Http { .. } => "BATCHA_HTTP",
            Self::Service { .. } => "BATCHA_SERVICE",
            Self::NotFound { .. } => "BATCHA_NOT_FOUND",
            Self::InvalidInput { .. } => "BATCHA_INVALID_INPUT",
            Self::JobFailed { .. } => "BATCHA_JOB_FAILED",
            Self::Cancelled => "BATCHA_CANCELLED",
            Self::DifferencesFound => "BATCHA_DIFFERENCES_FOUND",
            Self::Other { .. } => "BATCHA_ERROR",
        }
    }

    /// Whether the error is a signal rather than a failure to report
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::DifferencesFound)
    }
}
