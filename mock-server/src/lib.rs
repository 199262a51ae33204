//! In-memory stand-in for the Arcane server, used by integration tests.
//!
//! Covers the auth flow (login, refresh, API key, bearer tokens) and enough
//! of the resource API to exercise every response shape the client handles:
//! enveloped JSON, bare JSON, plain text, empty bodies, JSON errors and a
//! chunked NDJSON stream.

mod auth;
mod resources;

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub use resources::{MockContainer, MockEnvironment};

pub const API_KEY: &str = "test-api-key";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";
/// Id of the environment every fresh server starts with.
pub const LOCAL_ENV: &str = "0";

const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Shared server state. Clone it before handing it to `app_with` to keep
/// access to the counters from a test.
#[derive(Clone)]
pub struct MockState {
    inner: Arc<Inner>,
}

struct Inner {
    expires_in: u64,
    logins: AtomicUsize,
    refreshes: AtomicUsize,
    access_tokens: RwLock<HashSet<String>>,
    refresh_tokens: RwLock<HashSet<String>>,
    environments: RwLock<BTreeMap<String, MockEnvironment>>,
    containers: RwLock<BTreeMap<String, MockContainer>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::with_expires_in(DEFAULT_EXPIRES_IN)
    }

    /// Issue access tokens that live for `expires_in` seconds.
    pub fn with_expires_in(expires_in: u64) -> Self {
        let environments = BTreeMap::from([(LOCAL_ENV.to_string(), MockEnvironment::local())]);
        let containers = MockContainer::seed()
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        Self {
            inner: Arc::new(Inner {
                expires_in,
                logins: AtomicUsize::new(0),
                refreshes: AtomicUsize::new(0),
                access_tokens: RwLock::new(HashSet::new()),
                refresh_tokens: RwLock::new(HashSet::new()),
                environments: RwLock::new(environments),
                containers: RwLock::new(containers),
            }),
        }
    }

    /// Successful logins so far.
    pub fn login_count(&self) -> usize {
        self.inner.logins.load(Ordering::SeqCst)
    }

    /// Successful refreshes so far.
    pub fn refresh_count(&self) -> usize {
        self.inner.refreshes.load(Ordering::SeqCst)
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn app() -> Router {
    app_with(MockState::new())
}

pub fn app_with(state: MockState) -> Router {
    let protected = Router::new()
        .route("/api/system/info", get(resources::system_info))
        .route("/api/system/version", get(resources::version))
        .route(
            "/api/environments",
            get(resources::list_environments).post(resources::create_environment),
        )
        .route(
            "/api/environments/{env}",
            get(resources::get_environment)
                .put(resources::update_environment)
                .delete(resources::delete_environment),
        )
        .route("/api/environments/{env}/test", post(resources::test_environment))
        .route("/api/environments/{env}/docker/info", get(resources::docker_info))
        .route("/api/environments/{env}/system/prune", post(resources::prune_system))
        .route("/api/environments/{env}/containers", get(resources::list_containers))
        .route("/api/environments/{env}/containers/counts", get(resources::container_counts))
        .route(
            "/api/environments/{env}/containers/{id}",
            get(resources::get_container).delete(resources::delete_container),
        )
        .route("/api/environments/{env}/containers/{id}/logs", get(resources::container_logs))
        .route(
            "/api/environments/{env}/containers/{id}/{action}",
            post(resources::container_action),
        )
        .route("/api/environments/{env}/images", get(resources::list_images))
        .route("/api/environments/{env}/images/pull", post(resources::pull_image))
        .route("/api/environments/{env}/volumes/{name}", get(resources::get_volume))
        .route("/api/environments/{env}/volumes/{name}/browse", get(resources::browse_volume))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/refresh", post(auth::refresh))
        .route("/api/health", get(resources::health))
        .merge(protected)
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockState::new()).await
}

pub async fn run_with(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

/// `{"success": true, "data": ...}`
fn envelope<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

/// `{"success": false, "error": ...}` with the given status.
fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}
