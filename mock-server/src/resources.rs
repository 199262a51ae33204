use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{envelope, failure, MockState, LOCAL_ENV};

const TIMESTAMP: &str = "2024-01-01T00:00:00Z";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockEnvironment {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl MockEnvironment {
    pub fn local() -> Self {
        Self {
            id: LOCAL_ENV.to_string(),
            name: "local".to_string(),
            description: Some("Local Docker socket".to_string()),
            url: "unix:///var/run/docker.sock".to_string(),
            status: "online".to_string(),
            created_at: TIMESTAMP.to_string(),
            updated_at: TIMESTAMP.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MockContainer {
    pub id: String,
    pub name: String,
    pub image: String,
    pub running: bool,
}

impl MockContainer {
    pub fn seed() -> Vec<Self> {
        vec![
            Self {
                id: "c1".to_string(),
                name: "web".to_string(),
                image: "nginx:latest".to_string(),
                running: true,
            },
            Self {
                id: "c2".to_string(),
                name: "db".to_string(),
                image: "postgres:16".to_string(),
                running: false,
            },
        ]
    }

    fn summary(&self) -> Value {
        let (state, status) = if self.running {
            ("running", "Up 5 minutes")
        } else {
            ("exited", "Exited (0) 1 hour ago")
        };
        json!({
            "id": self.id,
            "name": self.name,
            "image": self.image,
            "status": status,
            "state": state,
            "createdAt": TIMESTAMP,
            "ports": [{"containerPort": 80, "hostPort": 8080, "protocol": "tcp"}],
            "labels": {},
        })
    }

    fn details(&self) -> Value {
        let mut value = self.summary();
        if let Value::Object(map) = &mut value {
            map.insert("environmentId".into(), json!(LOCAL_ENV));
            map.insert("command".into(), json!("/docker-entrypoint.sh"));
            map.insert("environmentVars".into(), json!(["PATH=/usr/bin"]));
            map.insert(
                "mounts".into(),
                json!([{"type": "volume", "source": "data", "destination": "/data", "rw": true}]),
            );
            map.insert("networks".into(), json!(["bridge"]));
            map.insert("restartPolicy".into(), json!("unless-stopped"));
            map.insert("created".into(), json!(TIMESTAMP));
        }
        value
    }
}

#[derive(Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateEnvironment {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
}

#[derive(Deserialize)]
pub struct UpdateEnvironment {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

#[derive(Deserialize)]
pub struct PullImage {
    pub image: String,
    pub tag: Option<String>,
}

#[derive(Deserialize)]
pub struct BrowseParams {
    pub path: Option<String>,
}

async fn environment_exists(state: &MockState, env: &str) -> bool {
    state.inner.environments.read().await.contains_key(env)
}

fn environment_not_found() -> Response {
    failure(StatusCode::NOT_FOUND, "Environment not found")
}

// --- system ---

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "timestamp": TIMESTAMP }))
}

pub async fn system_info(State(state): State<MockState>) -> Json<Value> {
    let environment_count = state.inner.environments.read().await.len();
    let container_count = state.inner.containers.read().await.len();
    envelope(json!({
        "version": "1.0.0",
        "uptime": 3600,
        "environmentCount": environment_count,
        "containerCount": container_count,
        "imageCount": 2,
        "volumeCount": 1,
        "networkCount": 3,
    }))
}

pub async fn version() -> Json<Value> {
    envelope(json!({ "version": "1.0.0", "commit": "abc1234", "buildDate": TIMESTAMP }))
}

pub async fn docker_info(State(state): State<MockState>, Path(env): Path<String>) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    let containers = state.inner.containers.read().await;
    let running = containers.values().filter(|c| c.running).count();
    envelope(json!({
        "containers": containers.len(),
        "containersRunning": running,
        "containersStopped": containers.len() - running,
        "images": 2,
        "memTotal": 8_589_934_592u64,
        "operatingSystem": "Debian GNU/Linux 12",
        "architecture": "x86_64",
        "kernelVersion": "6.1.0",
        "dockerVersion": "27.0.3",
    }))
    .into_response()
}

pub async fn prune_system(State(state): State<MockState>, Path(env): Path<String>) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    envelope(json!({
        "containersDeleted": [],
        "imagesDeleted": ["sha256:dead"],
        "volumesDeleted": [],
        "networksDeleted": [],
        "spaceReclaimed": 1024,
    }))
    .into_response()
}

// --- environments ---

pub async fn list_environments(State(state): State<MockState>, Query(params): Query<ListParams>) -> Json<Value> {
    let envs = state.inner.environments.read().await;
    let matching: Vec<&MockEnvironment> = envs
        .values()
        .filter(|e| params.search.as_deref().is_none_or(|term| e.name.contains(term)))
        .collect();
    Json(json!({
        "success": true,
        "data": matching,
        "pagination": { "total": matching.len(), "start": 0, "limit": 20 },
    }))
}

pub async fn get_environment(State(state): State<MockState>, Path(env): Path<String>) -> Response {
    match state.inner.environments.read().await.get(&env) {
        Some(found) => envelope(found).into_response(),
        None => environment_not_found(),
    }
}

pub async fn create_environment(State(state): State<MockState>, Json(input): Json<CreateEnvironment>) -> Response {
    let environment = MockEnvironment {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        description: input.description,
        url: input.url,
        status: "offline".to_string(),
        created_at: TIMESTAMP.to_string(),
        updated_at: TIMESTAMP.to_string(),
    };
    state
        .inner
        .environments
        .write()
        .await
        .insert(environment.id.clone(), environment.clone());
    (StatusCode::CREATED, envelope(environment)).into_response()
}

pub async fn update_environment(
    State(state): State<MockState>,
    Path(env): Path<String>,
    Json(input): Json<UpdateEnvironment>,
) -> Response {
    let mut envs = state.inner.environments.write().await;
    let Some(environment) = envs.get_mut(&env) else {
        return environment_not_found();
    };
    if let Some(name) = input.name {
        environment.name = name;
    }
    if let Some(description) = input.description {
        environment.description = Some(description);
    }
    if let Some(url) = input.url {
        environment.url = url;
    }
    envelope(environment.clone()).into_response()
}

pub async fn delete_environment(State(state): State<MockState>, Path(env): Path<String>) -> Response {
    match state.inner.environments.write().await.remove(&env) {
        Some(_) => Json(json!({ "success": true, "message": "Environment deleted" })).into_response(),
        None => environment_not_found(),
    }
}

pub async fn test_environment(State(state): State<MockState>, Path(env): Path<String>) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    envelope(json!({ "success": true, "message": "Connection successful" })).into_response()
}

// --- containers ---

pub async fn list_containers(
    State(state): State<MockState>,
    Path(env): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    let containers = state.inner.containers.read().await;
    let data: Vec<Value> = containers
        .values()
        .filter(|c| params.search.as_deref().is_none_or(|term| c.name.contains(term)))
        .map(MockContainer::summary)
        .collect();
    envelope(data).into_response()
}

pub async fn container_counts(State(state): State<MockState>, Path(env): Path<String>) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    let containers = state.inner.containers.read().await;
    let running = containers.values().filter(|c| c.running).count();
    envelope(json!({
        "running": running,
        "exited": containers.len() - running,
        "paused": 0,
        "total": containers.len(),
    }))
    .into_response()
}

pub async fn get_container(State(state): State<MockState>, Path((env, id)): Path<(String, String)>) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    match state.inner.containers.read().await.get(&id) {
        Some(container) => envelope(container.details()).into_response(),
        None => failure(StatusCode::NOT_FOUND, "Container not found"),
    }
}

pub async fn delete_container(State(state): State<MockState>, Path((env, id)): Path<(String, String)>) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    match state.inner.containers.write().await.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => failure(StatusCode::NOT_FOUND, "Container not found"),
    }
}

/// Logs come back as plain text, not JSON.
pub async fn container_logs(State(state): State<MockState>, Path((env, id)): Path<(String, String)>) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    match state.inner.containers.read().await.get(&id) {
        Some(container) => format!("{} started\n{} ready\n", container.name, container.name).into_response(),
        None => (StatusCode::NOT_FOUND, "no such container").into_response(),
    }
}

pub async fn container_action(
    State(state): State<MockState>,
    Path((env, id, action)): Path<(String, String, String)>,
) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    let mut containers = state.inner.containers.write().await;
    let Some(container) = containers.get_mut(&id) else {
        return failure(StatusCode::NOT_FOUND, "Container not found");
    };
    let message = match action.as_str() {
        "start" => "Container started",
        "stop" => "Container stopped",
        "restart" => "Container restarted",
        _ => return failure(StatusCode::BAD_REQUEST, "Unknown action"),
    };
    container.running = action != "stop";
    Json(json!({ "success": true, "message": message })).into_response()
}

// --- images ---

pub async fn list_images(State(state): State<MockState>, Path(env): Path<String>) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    envelope(json!([
        {
            "id": "sha256:1111",
            "repoTags": ["nginx:latest"],
            "repoDigests": [],
            "size": 187_000_000u64,
            "created": TIMESTAMP,
            "createdAt": TIMESTAMP,
        },
        {
            "id": "sha256:2222",
            "repoTags": ["postgres:16"],
            "repoDigests": [],
            "size": 431_000_000u64,
            "created": TIMESTAMP,
            "createdAt": TIMESTAMP,
        },
    ]))
    .into_response()
}

/// NDJSON progress events, one chunk per event.
pub async fn pull_image(
    State(state): State<MockState>,
    Path(env): Path<String>,
    Json(input): Json<PullImage>,
) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    let reference = format!("{}:{}", input.image, input.tag.as_deref().unwrap_or("latest"));
    let events: Vec<Result<String, Infallible>> = ["Pulling from library", "Downloading", "Pull complete"]
        .into_iter()
        .map(|status| Ok(format!("{}\n", json!({ "status": status, "id": reference }))))
        .collect();
    (
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(futures::stream::iter(events)),
    )
        .into_response()
}

// --- volumes ---

pub async fn get_volume(State(state): State<MockState>, Path((env, name)): Path<(String, String)>) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    envelope(json!({
        "name": name,
        "driver": "local",
        "scope": "local",
        "createdAt": TIMESTAMP,
        "environmentId": env,
        "mountpoint": format!("/var/lib/docker/volumes/{name}/_data"),
        "labels": {},
        "options": {},
    }))
    .into_response()
}

/// Echoes the requested volume and path back in each entry.
pub async fn browse_volume(
    State(state): State<MockState>,
    Path((env, name)): Path<(String, String)>,
    Query(params): Query<BrowseParams>,
) -> Response {
    if !environment_exists(&state, &env).await {
        return environment_not_found();
    }
    let dir = params.path.unwrap_or_else(|| "/".to_string());
    envelope(json!([{
        "name": name,
        "path": dir,
        "isDir": true,
        "size": 0,
        "modifiedAt": TIMESTAMP,
    }]))
    .into_response()
}
