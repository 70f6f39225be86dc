//! Mailer errors

use thiserror::Error;

/// Reasons a send can fail
#[derive(Debug, Error)]
pub enum MailerError {
    /// The HTTP call failed before a response arrived (network error, timeout)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with anything other than 200
    #[error("provider returned status {status}: {body}")]
    UnexpectedStatus {
        /// The HTTP status code
        status: u16,

        /// The raw response body
        body: String,
    },

    /// The request body could not be serialized
    #[error("could not serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A request header name or value is not valid HTTP
    #[error("invalid request header: {0}")]
    InvalidHeader(String),

    /// No API key and secret are configured
    #[error("Mailjet credentials are not configured")]
    MissingCredentials,
}
