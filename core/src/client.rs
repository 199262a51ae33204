//! Authenticated HTTP client for the Arcane API.
//!
//! # Design
//! `ArcaneClient` holds the immutable `ClientConfig`, a `Transport` that
//! performs the round-trip, and the mutable `TokenState`. Every public verb
//! runs `ensure_authenticated` first, then builds an `HttpRequest` with
//! exactly one auth header (API key beats bearer token), dispatches it and
//! either decodes the body or turns a non-2xx status into `ApiError`.
//!
//! Token refresh is proactive only: a token within 60 seconds of expiry is
//! refreshed before the call. A 401 that arrives anyway is returned to the
//! caller as-is.
//!
//! The token lock is never held across a network call. Two threads that
//! both see an expiring token will both refresh, and the last response to
//! arrive wins.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::{
    Clock, LoginRequest, LoginResponse, RefreshRequest, SystemClock, TokenState, LOGIN_PATH,
    REFRESH_PATH,
};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, ResponseBody, Transport};
use crate::query;
use crate::stream::TextStream;
use crate::transport::UreqTransport;

/// Method, extra headers and body for one call through `fetch`.
#[derive(Debug, Default)]
struct RequestOptions {
    method: HttpMethod,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl RequestOptions {
    fn new(method: HttpMethod, body: Option<String>) -> Self {
        Self {
            method,
            headers: Vec::new(),
            body,
        }
    }
}

/// Client for one Arcane server.
///
/// `Send + Sync`; share it behind an `Arc` to issue calls from several
/// threads.
pub struct ArcaneClient {
    config: ClientConfig,
    transport: Box<dyn Transport>,
    clock: Box<dyn Clock>,
    tokens: RwLock<TokenState>,
}

impl ArcaneClient {
    /// Client using the default `ureq` transport and the system clock.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Box::new(transport),
            clock: Box::new(SystemClock),
            tokens: RwLock::new(TokenState::default()),
        }
    }

    /// Replace the clock used for token expiry decisions.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// True if an API key is configured or an access token is held.
    ///
    /// Does not look at expiry.
    pub fn is_authenticated(&self) -> bool {
        self.config.api_key().is_some() || self.tokens().has_access_token()
    }

    /// Snapshot of the current token state.
    pub fn token_state(&self) -> TokenState {
        self.tokens().clone()
    }

    /// Log in with the configured username and password.
    pub fn authenticate(&self) -> Result<LoginResponse, ClientError> {
        let (username, password) = self
            .config
            .credentials()
            .ok_or(ClientError::MissingCredentials)?;

        let body = encode_body(&LoginRequest { username, password })?;
        let response: LoginResponse = self
            .fetch(LOGIN_PATH, RequestOptions::new(HttpMethod::Post, body))?
            .into_typed()?;

        self.store_tokens(&response);
        info!(username, expires_in = response.expires_in, "authenticated");
        Ok(response)
    }

    /// Exchange the held refresh token for a new token pair.
    pub fn refresh_access_token(&self) -> Result<(), ClientError> {
        let refresh_token = self
            .tokens()
            .refresh_token
            .clone()
            .ok_or(ClientError::NoRefreshToken)?;

        let body = encode_body(&RefreshRequest {
            refresh_token: &refresh_token,
        })?;
        let response: LoginResponse = self
            .fetch(REFRESH_PATH, RequestOptions::new(HttpMethod::Post, body))?
            .into_typed()?;

        self.store_tokens(&response);
        info!(expires_in = response.expires_in, "access token refreshed");
        Ok(())
    }

    /// Log in or refresh if needed before a call.
    ///
    /// Does nothing when an API key is configured. Otherwise logs in when no
    /// access token is held and credentials are available, or refreshes when
    /// the token is within 60 seconds of expiry.
    pub fn ensure_authenticated(&self) -> Result<(), ClientError> {
        if self.config.api_key().is_some() {
            return Ok(());
        }

        let (has_token, expiring) = {
            let tokens = self.tokens();
            (tokens.has_access_token(), tokens.is_expiring(self.clock.now_ms()))
        };

        if !has_token && self.config.credentials().is_some() {
            self.authenticate()?;
            return Ok(());
        }
        if expiring {
            debug!("access token close to expiry");
            self.refresh_access_token()?;
        }
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.ensure_authenticated()?;
        self.fetch(path, RequestOptions::default())?.into_typed()
    }

    /// GET with query parameters taken from any value that serializes to a
    /// map. `None`/null members are left out; an empty set adds no `?`.
    pub fn get_with_params<T, Q>(&self, path: &str, params: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.ensure_authenticated()?;
        let path = query::with_query(path, params)?;
        self.fetch(&path, RequestOptions::default())?.into_typed()
    }

    /// POST with `body` as JSON. A body that serializes to null is omitted.
    pub fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.send(HttpMethod::Post, path, body)
    }

    /// POST without a body.
    pub fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(HttpMethod::Post, path, None)
    }

    /// PUT with `body` as JSON. A body that serializes to null is omitted.
    pub fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.send(HttpMethod::Put, path, body)
    }

    /// PUT without a body.
    pub fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(HttpMethod::Put, path, None)
    }

    pub fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(HttpMethod::Delete, path, None)
    }

    /// POST and return the response body as a lazy stream of text chunks.
    pub fn post_stream<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<TextStream, ClientError> {
        let body = encode_body(body)?;
        self.open_stream(path, body)
    }

    /// Streaming POST without a body.
    pub fn post_stream_empty(&self, path: &str) -> Result<TextStream, ClientError> {
        self.open_stream(path, None)
    }

    fn send<T: DeserializeOwned>(&self, method: HttpMethod, path: &str, body: Option<String>) -> Result<T, ClientError> {
        self.ensure_authenticated()?;
        self.fetch(path, RequestOptions::new(method, body))?.into_typed()
    }

    fn open_stream(&self, path: &str, body: Option<String>) -> Result<TextStream, ClientError> {
        self.ensure_authenticated()?;
        let request = self.build_request(path, RequestOptions::new(HttpMethod::Post, body));
        debug!(method = %request.method, url = %request.url, "opening stream");

        let raw = self.transport.execute(request)?;
        if !raw.is_success() {
            let err = raw.into_api_error();
            warn!(status = err.status, "stream request failed");
            return Err(err.into());
        }
        let reader = raw.body.ok_or(ClientError::StreamNotReadable)?;
        Ok(TextStream::new(reader))
    }

    /// Dispatch one request and decode the response by content type.
    fn fetch(&self, path: &str, options: RequestOptions) -> Result<ResponseBody, ClientError> {
        let request = self.build_request(path, options);
        debug!(method = %request.method, url = %request.url, "request");

        let raw = self.transport.execute(request)?;
        let response = HttpResponse::buffer(raw)?
            .error_for_status()
            .inspect_err(|err| warn!(status = err.status, "request failed"))?;
        response.decode()
    }

    fn build_request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let mut request = HttpRequest {
            method: options.method,
            url: format!("{}{}", self.config.base_url, path),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: options.body,
        };
        for (name, value) in options.headers {
            request.set_header(&name, value);
        }

        if let Some(api_key) = self.config.api_key() {
            request.set_header("X-API-Key", api_key);
        } else if let Some(token) = self.tokens().access_token.as_deref() {
            request.set_header("Authorization", format!("Bearer {token}"));
        }
        request
    }

    fn store_tokens(&self, response: &LoginResponse) {
        let state = TokenState::issued(response, self.clock.now_ms());
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    fn tokens(&self) -> RwLockReadGuard<'_, TokenState> {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ArcaneClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcaneClient")
            .field("config", &self.config)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// JSON-encode a request body; values that serialize to null mean no body.
fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Option<String>, ClientError> {
    let value = serde_json::to_value(body).map_err(|e| ClientError::Serialization(e.to_string()))?;
    if value == Value::Null {
        return Ok(None);
    }
    serde_json::to_string(&value)
        .map(Some)
        .map_err(|e| ClientError::Serialization(e.to_string()))
}
