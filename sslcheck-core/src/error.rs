use thiserror::Error;

#[derive(Error, Debug)]
pub enum SslCheckError {
    #[error("No domain was provided in the query options")]
    MissingDomain,

    #[error("Invalid domain name: {0}")]
    InvalidDomain(String),

    #[error("No API key configured")]
    MissingApiKey,

    #[error("API key rejected: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API returned an error: {0}")]
    ApiError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Operation failed after {attempts} attempts: {last_error}")]
    RetryExhausted { attempts: usize, last_error: String },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SslCheckError>;
