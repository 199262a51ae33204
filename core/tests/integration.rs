//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `ArcaneClient` over
//! real HTTP with the default ureq transport. Each test gets its own server
//! so auth counters and in-memory data never leak between tests.

use arcane_core::types::{CreateEnvironment, PaginationParams, PullImageOptions, UpdateEnvironment};
use arcane_core::{ArcaneClient, ClientConfig, ClientError};
use mock_server::{MockState, API_KEY, LOCAL_ENV, PASSWORD, USERNAME};

/// Serve `state` on a random port and return the base URL.
fn spawn_server(state: MockState) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, state).await
        })
    });

    format!("http://{addr}")
}

fn api_key_client(base_url: &str) -> ArcaneClient {
    ArcaneClient::new(ClientConfig::new(base_url).with_api_key(API_KEY))
}

fn password_client(base_url: &str) -> ArcaneClient {
    ArcaneClient::new(ClientConfig::new(base_url).with_credentials(USERNAME, PASSWORD))
}

fn expect_api_error(result: Result<impl std::fmt::Debug, ClientError>, status: u16) -> String {
    match result {
        Err(ClientError::Api(err)) => {
            assert_eq!(err.status, status, "{err}");
            err.body
        }
        other => panic!("expected API error {status}, got {other:?}"),
    }
}

// --- auth ---

#[test]
fn api_key_reaches_protected_routes() {
    let base_url = spawn_server(MockState::new());
    let client = api_key_client(&base_url);

    assert!(client.is_authenticated());
    let envs = client.environments().list(&PaginationParams::default()).unwrap();
    assert_eq!(envs.len(), 1);
    assert_eq!(envs[0].id, LOCAL_ENV);
    assert_eq!(envs[0].name, "local");
}

#[test]
fn password_client_logs_in_once() {
    let state = MockState::new();
    let base_url = spawn_server(state.clone());
    let client = password_client(&base_url);

    assert!(!client.is_authenticated());
    let version = client.system().version().unwrap();
    assert_eq!(version.version, "1.0.0");
    client.system().info().unwrap();

    assert!(client.is_authenticated());
    assert_eq!(state.login_count(), 1);
    assert_eq!(state.refresh_count(), 0);
}

#[test]
fn short_lived_tokens_are_refreshed_before_each_call() {
    // 30 s of life is already inside the refresh window.
    let state = MockState::with_expires_in(30);
    let base_url = spawn_server(state.clone());
    let client = password_client(&base_url);

    client.system().version().unwrap();
    client.system().version().unwrap();
    client.system().version().unwrap();

    assert_eq!(state.login_count(), 1);
    assert_eq!(state.refresh_count(), 2);
}

#[test]
fn explicit_authenticate_returns_tokens() {
    let base_url = spawn_server(MockState::with_expires_in(900));
    let client = password_client(&base_url);

    let login = client.authenticate().unwrap();
    assert_eq!(login.expires_in, 900);
    assert!(login.access_token.starts_with("access-"));
    assert_eq!(client.token_state().access_token, Some(login.access_token));
}

#[test]
fn wrong_password_is_an_api_error() {
    let state = MockState::new();
    let base_url = spawn_server(state.clone());
    let client = ArcaneClient::new(ClientConfig::new(&base_url).with_credentials(USERNAME, "wrong"));

    let body = expect_api_error(client.system().info(), 401);
    assert!(body.contains("Invalid credentials"));
    assert!(!client.is_authenticated());
    assert_eq!(state.login_count(), 0);
}

#[test]
fn bad_api_key_is_rejected() {
    let base_url = spawn_server(MockState::new());
    let client = ArcaneClient::new(ClientConfig::new(&base_url).with_api_key("wrong"));

    let body = expect_api_error(client.system().info(), 401);
    assert!(body.contains("Unauthorized"));
}

// --- response shapes ---

#[test]
fn health_is_a_bare_object() {
    let base_url = spawn_server(MockState::new());
    let health = api_key_client(&base_url).system().health().unwrap();
    assert_eq!(health.status, "healthy");
}

#[test]
fn not_found_keeps_raw_body() {
    let base_url = spawn_server(MockState::new());
    let client = api_key_client(&base_url);

    let body = expect_api_error(client.environments().get("missing"), 404);
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["error"], "Environment not found");
}

#[test]
fn text_responses_are_returned_verbatim() {
    let base_url = spawn_server(MockState::new());
    let client = api_key_client(&base_url);

    let logs: String = client.get("/api/environments/0/containers/c1/logs").unwrap();
    assert_eq!(logs, "web started\nweb ready\n");
}

#[test]
fn empty_success_body_is_accepted() {
    let base_url = spawn_server(MockState::new());
    let client = api_key_client(&base_url);

    client.containers().delete(LOCAL_ENV, "c2").unwrap();
    let remaining = client.containers().list(LOCAL_ENV, &PaginationParams::default()).unwrap();
    assert_eq!(remaining.len(), 1);
}

#[test]
fn search_params_reach_the_server() {
    let base_url = spawn_server(MockState::new());
    let client = api_key_client(&base_url);

    let hits = client.containers().list(LOCAL_ENV, &PaginationParams::search("we")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "web");
}

#[test]
fn volume_names_and_paths_are_encoded() {
    let base_url = spawn_server(MockState::new());
    let client = api_key_client(&base_url);

    let entries = client.volumes().browse(LOCAL_ENV, "my data", Some("/etc/a&b")).unwrap();
    assert_eq!(entries[0].name, "my data");
    assert_eq!(entries[0].path, "/etc/a&b");

    let root = client.volumes().browse(LOCAL_ENV, "my data", None).unwrap();
    assert_eq!(root[0].path, "/");
}

// --- lifecycles ---

#[test]
fn environment_lifecycle() {
    let base_url = spawn_server(MockState::new());
    let client = api_key_client(&base_url);
    let envs = client.environments();

    let created = envs
        .create(&CreateEnvironment {
            name: "staging".to_string(),
            description: None,
            url: "tcp://10.0.0.5:2376".to_string(),
        })
        .unwrap();
    assert_eq!(created.name, "staging");

    let update = UpdateEnvironment {
        name: Some("staging-2".to_string()),
        ..UpdateEnvironment::default()
    };
    let updated = envs.update(&created.id, &update).unwrap();
    assert_eq!(updated.name, "staging-2");
    assert_eq!(updated.url, "tcp://10.0.0.5:2376");

    assert!(envs.test_connection(&created.id).unwrap().success);

    envs.delete(&created.id).unwrap();
    expect_api_error(envs.get(&created.id), 404);
}

#[test]
fn container_actions_change_counts() {
    let base_url = spawn_server(MockState::new());
    let client = api_key_client(&base_url);
    let containers = client.containers();

    assert_eq!(containers.counts(LOCAL_ENV).unwrap().running, 1);
    containers.stop(LOCAL_ENV, "c1").unwrap();
    assert_eq!(containers.counts(LOCAL_ENV).unwrap().running, 0);
    containers.start(LOCAL_ENV, "c2").unwrap();

    let details = containers.get(LOCAL_ENV, "c2").unwrap();
    assert_eq!(details.summary.name, "db");
    assert_eq!(details.restart_policy, "unless-stopped");
}

// --- streaming ---

#[test]
fn image_pull_streams_progress() {
    let base_url = spawn_server(MockState::new());
    let client = password_client(&base_url);

    let options = PullImageOptions {
        image: "redis".to_string(),
        tag: Some("7".to_string()),
        ..PullImageOptions::default()
    };
    let text = client.images().pull(LOCAL_ENV, &options).unwrap().collect_text().unwrap();

    let events: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["status"], "Pulling from library");
    assert_eq!(events[2]["id"], "redis:7");
}

#[test]
fn image_pull_can_be_abandoned() {
    let base_url = spawn_server(MockState::new());
    let client = api_key_client(&base_url);

    let options = PullImageOptions {
        image: "redis".to_string(),
        ..PullImageOptions::default()
    };
    let mut stream = client.images().pull(LOCAL_ENV, &options).unwrap();
    let first = stream.next().unwrap().unwrap();
    assert!(!first.is_empty());
    drop(stream);

    // The connection was released; the client keeps working.
    client.system().version().unwrap();
}

#[test]
fn stream_error_status_is_api_error() {
    let base_url = spawn_server(MockState::new());
    let client = api_key_client(&base_url);

    let options = PullImageOptions {
        image: "redis".to_string(),
        ..PullImageOptions::default()
    };
    let body = expect_api_error(client.images().pull("missing", &options), 404);
    assert!(body.contains("Environment not found"));
}
