//! Token state and auth wire types.
//!
//! # Design
//! `TokenState` is replaced wholesale on every login or refresh, never
//! merged, so the access token, refresh token and expiry always come from
//! the same server response. Time is read through `Clock` so expiry logic
//! can be tested without sleeping.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Refresh when the access token has this little life left.
pub const REFRESH_THRESHOLD_MS: u64 = 60_000;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// Source of the current wall-clock time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Response of both `/api/auth/login` and `/api/auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime of the access token in seconds.
    pub expires_in: u64,
}

/// Tokens held by one client instance. Empty until the first login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at_ms: Option<u64>,
}

impl TokenState {
    /// Token state for a response received at `now_ms`.
    pub fn issued(response: &LoginResponse, now_ms: u64) -> Self {
        Self {
            access_token: Some(response.access_token.clone()),
            refresh_token: Some(response.refresh_token.clone()),
            expires_at_ms: Some(now_ms.saturating_add(response.expires_in.saturating_mul(1000))),
        }
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.is_some()
    }

    /// True once `now_ms` is within `REFRESH_THRESHOLD_MS` of the recorded expiry.
    pub fn is_expiring(&self, now_ms: u64) -> bool {
        self.expires_at_ms
            .is_some_and(|expiry| now_ms >= expiry.saturating_sub(REFRESH_THRESHOLD_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(expires_in: u64) -> LoginResponse {
        LoginResponse {
            access_token: "T".to_string(),
            refresh_token: "R".to_string(),
            expires_in,
        }
    }

    #[test]
    fn issued_sets_all_fields_together() {
        let state = TokenState::issued(&login(3600), 1_000);
        assert_eq!(state.access_token.as_deref(), Some("T"));
        assert_eq!(state.refresh_token.as_deref(), Some("R"));
        assert_eq!(state.expires_at_ms, Some(3_601_000));
    }

    #[test]
    fn empty_state_never_expires() {
        let state = TokenState::default();
        assert!(!state.has_access_token());
        assert!(!state.is_expiring(u64::MAX));
    }

    #[test]
    fn expiring_inside_threshold() {
        let state = TokenState::issued(&login(120), 0);
        assert!(!state.is_expiring(0));
        assert!(!state.is_expiring(59_999));
        assert!(state.is_expiring(60_000));
        assert!(state.is_expiring(65_000));
    }

    #[test]
    fn short_lived_token_is_expiring_immediately() {
        let state = TokenState::issued(&login(30), 10_000);
        assert!(state.is_expiring(10_000));
    }

    #[test]
    fn login_response_uses_camel_case() {
        let parsed: LoginResponse = serde_json::from_str(
            r#"{"accessToken":"a","refreshToken":"r","expiresIn":900}"#,
        )
        .unwrap();
        assert_eq!(parsed.expires_in, 900);

        let body = serde_json::to_value(RefreshRequest { refresh_token: "r" }).unwrap();
        assert_eq!(body, serde_json::json!({"refreshToken": "r"}));
    }
}
