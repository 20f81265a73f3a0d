//! Error types for the REST client.

use thiserror::Error;

/// REST client error.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A required field was empty; nothing was sent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field held a value the API does not accept; nothing was sent.
    #[error("Invalid value for {field}: {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Login succeeded but no session token came back.
    #[error("Login response carried no session token")]
    MissingSession,
}

/// Result type alias for REST client operations.
pub type Result<T> = std::result::Result<T, ApiError>;
