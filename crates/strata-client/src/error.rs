//! Error types for the client.

use thiserror::Error;

/// Errors surfaced by query construction, the interceptor chain, and dispatch.
///
/// Non-2xx HTTP responses are deliberately *not* an error: the parsed body is
/// returned to the caller, who inspects the envelope's `error` field. Only a
/// failed transport or a body that is not valid JSON rejects the call.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid service configuration, caught before any network I/O.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A value could not be encoded into the query string or request body.
    #[error("failed to encode request: {0}")]
    Encode(String),

    /// An interceptor rejected the request, aborting the chain.
    #[error("interceptor failed: {0}")]
    Interceptor(String),

    /// The HTTP transport failed (connect, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not valid JSON for the expected envelope.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Build an interceptor failure from any displayable reason.
    pub fn interceptor(reason: impl Into<String>) -> Self {
        Error::Interceptor(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("base_url must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: base_url must not be empty"
        );

        let err = Error::interceptor("token refresh failed");
        assert_eq!(err.to_string(), "interceptor failed: token refresh failed");
    }

    #[test]
    fn test_decode_error_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Decode(_)));
    }
}
