use std::sync::atomic::Ordering;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{failure, MockState, API_KEY, PASSWORD, USERNAME};

#[derive(Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshBody {
    pub refresh_token: String,
}

pub async fn login(State(state): State<MockState>, Json(body): Json<LoginBody>) -> Response {
    if body.username != USERNAME || body.password != PASSWORD {
        return failure(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    state.inner.logins.fetch_add(1, Ordering::SeqCst);
    issue_tokens(&state).await
}

pub async fn refresh(State(state): State<MockState>, Json(body): Json<RefreshBody>) -> Response {
    let known = state.inner.refresh_tokens.write().await.remove(&body.refresh_token);
    if !known {
        return failure(StatusCode::UNAUTHORIZED, "Invalid refresh token");
    }
    state.inner.refreshes.fetch_add(1, Ordering::SeqCst);
    issue_tokens(&state).await
}

async fn issue_tokens(state: &MockState) -> Response {
    let access = format!("access-{}", Uuid::new_v4());
    let refresh = format!("refresh-{}", Uuid::new_v4());
    state.inner.access_tokens.write().await.insert(access.clone());
    state.inner.refresh_tokens.write().await.insert(refresh.clone());
    Json(json!({
        "accessToken": access,
        "refreshToken": refresh,
        "expiresIn": state.inner.expires_in,
    }))
    .into_response()
}

/// Accept either the fixed API key or a bearer token issued by this server.
pub async fn require_auth(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let headers = request.headers();
    let api_key_ok = headers
        .get("x-api-key")
        .is_some_and(|v| v.as_bytes() == API_KEY.as_bytes());
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let authorized = match bearer {
        _ if api_key_ok => true,
        Some(token) => state.inner.access_tokens.read().await.contains(&token),
        None => false,
    };
    if authorized {
        next.run(request).await
    } else {
        failure(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}
