//! Error types for the Arcane API client.
//!
//! # Design
//! `ApiError` is the one failure the server itself produces: any non-2xx
//! response, carrying the status line and the raw body so callers can
//! inspect whatever the backend said. Everything else that can go wrong on
//! the client side (missing credentials, transport failures, payload
//! encoding) lives in `ClientError` next to it.

use thiserror::Error;

/// A non-2xx response from the Arcane API.
///
/// The display string is always `API request failed: <status> <statusText>`;
/// the body is kept verbatim and never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("API request failed: {status} {status_text}")]
pub struct ApiError {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl ApiError {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn response_body(&self) -> &str {
        &self.body
    }
}

/// Errors returned by `ArcaneClient` and the resource wrappers.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// `authenticate` was requested without both username and password.
    #[error("Username and password required for authentication")]
    MissingCredentials,

    /// `refresh_access_token` was requested before any token was issued.
    #[error("No refresh token available")]
    NoRefreshToken,

    /// A successful streaming response came back without a body to read.
    #[error("Response body is not readable")]
    StreamNotReadable,

    /// The HTTP round-trip failed before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request body or query parameters could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response payload could not be mapped to the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Reading the response body failed.
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// The `ApiError` behind this failure, if the server produced it.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(err) => Some(err),
            _ => None,
        }
    }
}
