//! AtomPub client error types.

use std::sync::Arc;

use hatena_core::Error;

/// Errors from the Hatena Blog AtomPub client.
#[derive(Debug, thiserror::Error)]
pub enum AtomPubError {
    /// One of HATENA_ID, HATENA_BLOG_ID, HATENA_API_KEY is not set.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// Authentication failed (wrong ID or API key).
    #[error("authentication failed: check HATENA_ID and HATENA_API_KEY")]
    AuthError,

    /// The requested entry does not exist.
    #[error("entry not found: {0}")]
    NotFound(String),

    /// A pagination cursor that does not belong to this blog's collection.
    #[error("invalid page cursor: {0}")]
    InvalidCursor(String),

    /// An entry id that cannot be used as a member URI segment.
    #[error("invalid entry id: {0}")]
    InvalidEntryId(String),

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response is not a valid Atom document.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for AtomPubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { AtomPubError::Timeout } else { AtomPubError::Network(Arc::new(err)) }
    }
}

impl From<AtomPubError> for Error {
    fn from(err: AtomPubError) -> Self {
        match err {
            AtomPubError::NotFound(id) => Error::NotFound(format!("entry {id}")),
            AtomPubError::InvalidCursor(_) | AtomPubError::InvalidEntryId(_) => Error::InvalidInput(err.to_string()),
            other => Error::Upstream(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_core_not_found() {
        let err: Error = AtomPubError::NotFound("123".into()).into();
        assert!(matches!(err, Error::NotFound(msg) if msg.contains("123")));
    }

    #[test]
    fn test_cursor_maps_to_invalid_input() {
        let err: Error = AtomPubError::InvalidCursor("https://evil.example".into()).into();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_transport_errors_map_to_upstream() {
        for err in [AtomPubError::AuthError, AtomPubError::HttpError { status: 503 }, AtomPubError::Timeout] {
            let core: Error = err.into();
            assert!(matches!(core, Error::Upstream(_)));
        }
    }
}
