//! HTTP transport types and the `Transport` seam.
//!
//! # Design
//! Requests and responses are described as plain data. `ArcaneClient`
//! builds an `HttpRequest`, hands it to a `Transport`, and interprets the
//! `RawResponse` that comes back. The transport owns the actual network
//! I/O; the client owns headers, auth and decoding. Keeping the seam here
//! lets tests drive the client with canned responses and lets the default
//! `UreqTransport` stay a thin adapter.
//!
//! A `RawResponse` keeps its body as an unread `Read` so the streaming verb
//! can consume it lazily. The buffered verbs turn it into an `HttpResponse`
//! first.

use std::fmt;
use std::io::Read;

use serde_json::Value;

use crate::error::{ApiError, ClientError};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Set a header, replacing any existing value with the same name.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }
}

/// What a `Transport` returns: the status line, headers and an unread body.
///
/// `body` is `None` when the transport has no byte stream to offer.
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Box<dyn Read + Send>>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Read the remaining body and build the `ApiError` for this response.
    pub fn into_api_error(self) -> ApiError {
        let status = self.status;
        let status_text = self.status_text.clone();
        let body = HttpResponse::buffer(self)
            .map(|resp| resp.body)
            .unwrap_or_default();
        ApiError::new(status, status_text, body)
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("headers", &self.headers)
            .field("body", &self.body.as_ref().map(|_| "<reader>"))
            .finish()
    }
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Drain a `RawResponse` into memory. A missing reader is an empty body.
    pub fn buffer(raw: RawResponse) -> Result<Self, ClientError> {
        let mut bytes = Vec::new();
        if let Some(mut reader) = raw.body {
            reader.read_to_end(&mut bytes)?;
        }
        Ok(Self {
            status: raw.status,
            status_text: raw.status_text,
            headers: raw.headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Fail with `ApiError` unless the status is 2xx.
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::new(self.status, self.status_text, self.body))
        }
    }

    /// Decode the body according to the declared content type.
    pub fn decode(self) -> Result<ResponseBody, ClientError> {
        let is_json = self
            .header("content-type")
            .is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            return Ok(ResponseBody::Text(self.body));
        }
        if self.body.trim().is_empty() {
            return Ok(ResponseBody::Json(Value::Null));
        }
        serde_json::from_str(&self.body)
            .map(ResponseBody::Json)
            .map_err(|e| ClientError::Deserialization(e.to_string()))
    }
}

/// A decoded success payload: structured JSON or opaque text.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Collapse into the caller's type. Text becomes a JSON string value, so
    /// `String` and `serde_json::Value` accept either variant.
    pub fn into_typed<T: serde::de::DeserializeOwned>(self) -> Result<T, ClientError> {
        let value = match self {
            ResponseBody::Json(value) => value,
            ResponseBody::Text(text) => Value::String(text),
        };
        serde_json::from_value(value).map_err(|e| ClientError::Deserialization(e.to_string()))
    }
}

/// Executes one HTTP request.
///
/// Implementations must return non-2xx responses as `Ok(RawResponse)`; only
/// failures that prevent a response from existing are `Err`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<RawResponse, ClientError>;
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
