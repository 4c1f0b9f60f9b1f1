//! Client error types.

/// Errors that can occur when using the usage client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The access token or API key was rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// Duplicate event (already recorded).
    #[error("duplicate event: {event_id}")]
    DuplicateEvent {
        /// The event ID.
        event_id: String,
    },

    /// Server returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
