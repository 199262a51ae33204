//! Synchronous API client core for the Arcane container-management server.
//!
//! # Overview
//! `ArcaneClient` turns typed calls into `HttpRequest` values, hands them to
//! a `Transport`, and decodes the replies. The default transport is ureq;
//! tests plug in a stub that records requests and replays canned responses.
//!
//! # Design
//! - One client owns one `TokenState`. An API key, when configured, takes
//!   precedence over password login and disables token handling entirely.
//! - Tokens are refreshed before a request once they are within a minute of
//!   expiry. The lock guarding them is never held across a network call.
//! - Non-2xx responses always surface as `ApiError` carrying status, reason
//!   and the raw body text. JSON bodies are never parsed for error details.
//! - `post_stream` returns a `TextStream` that reads the body lazily, one
//!   chunk per `next`.
//! - Resource views (`client.containers()`, `client.volumes()`, ...) live in
//!   `api` and unwrap the server's `{success, data}` envelope.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod stream;
pub mod transport;
pub mod types;

pub use auth::{Clock, LoginResponse, SystemClock, TokenState};
pub use client::ArcaneClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ClientError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RawResponse, ResponseBody, Transport};
pub use stream::{TextStream, Utf8Decoder};
pub use transport::UreqTransport;
