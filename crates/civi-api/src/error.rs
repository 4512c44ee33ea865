//! CRM API error types.

use thiserror::Error;

/// Errors that can occur when calling the CRM API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The CRM answered but flagged the call with `is_error`.
    #[error("CRM error: {message}")]
    Crm {
        message: String,
        code: Option<String>,
    },

    /// Failed to parse a CRM response.
    #[error("parse error: {0}")]
    Parse(String),
}
