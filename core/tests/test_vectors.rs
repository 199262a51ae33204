//! Verify request building and response decoding against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each vector file lists named cases. A recording `Transport` captures the
//! requests the client builds and replays the simulated response, so no
//! network is involved. Comparing parsed JSON (not raw strings) avoids false
//! negatives from field-ordering differences.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use arcane_core::{ArcaneClient, ClientConfig, ClientError, HttpRequest, RawResponse, Transport};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3552";

/// Replays one canned response for every request and records what was sent.
/// Login calls always succeed with access token `T`.
#[derive(Clone)]
struct Recorder {
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    response: Value,
}

impl Recorder {
    fn new(response: Value) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            response,
        }
    }

    fn last(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl Transport for Recorder {
    fn execute(&self, request: HttpRequest) -> Result<RawResponse, ClientError> {
        let is_login = request.url.ends_with("/api/auth/login");
        self.requests.lock().unwrap().push(request);

        let response = if is_login {
            json!({
                "status": 200,
                "status_text": "OK",
                "content_type": "application/json",
                "body": r#"{"accessToken":"T","refreshToken":"R","expiresIn":3600}"#,
            })
        } else {
            self.response.clone()
        };
        let body = response["body"].as_str().unwrap().as_bytes().to_vec();
        let headers = match response["content_type"].as_str() {
            Some(ct) => vec![("content-type".to_string(), ct.to_string())],
            None => Vec::new(),
        };
        Ok(RawResponse {
            status: response["status"].as_u64().unwrap() as u16,
            status_text: response["status_text"].as_str().unwrap().to_string(),
            headers,
            body: Some(Box::new(Cursor::new(body))),
        })
    }
}

fn ok_json() -> Value {
    json!({ "status": 200, "status_text": "OK", "content_type": "application/json", "body": "{}" })
}

fn config_from(case: &Value) -> ClientConfig {
    let field = |name: &str| case[name].as_str().map(str::to_string);
    ClientConfig {
        base_url: BASE_URL.to_string(),
        api_key: field("api_key"),
        username: field("username"),
        password: field("password"),
    }
}

// ---------------------------------------------------------------------------
// Query encoding
// ---------------------------------------------------------------------------

#[test]
fn query_test_vectors() {
    let raw = include_str!("../../test-vectors/query.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let recorder = Recorder::new(ok_json());
        let client = ArcaneClient::with_transport(ClientConfig::new(BASE_URL).with_api_key("K"), recorder.clone());

        let _: Value = client
            .get_with_params(case["path"].as_str().unwrap(), &case["params"])
            .unwrap();

        let expected = format!("{BASE_URL}{}", case["expected_url"].as_str().unwrap());
        assert_eq!(recorder.last().url, expected, "{name}: url");
        assert_eq!(recorder.last().body, None, "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Header precedence
// ---------------------------------------------------------------------------

#[test]
fn header_test_vectors() {
    let raw = include_str!("../../test-vectors/headers.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let recorder = Recorder::new(ok_json());
        let client = ArcaneClient::with_transport(config_from(&case["config"]), recorder.clone());

        let _: Value = client.get("/api/system/info").unwrap();

        let sent = recorder.last();
        assert_eq!(sent.url, format!("{BASE_URL}/api/system/info"), "{name}: url");
        let expected: Vec<(String, String)> = serde_json::from_value(case["expected_headers"].clone()).unwrap();
        assert_eq!(sent.headers, expected, "{name}: headers");
    }
}

// ---------------------------------------------------------------------------
// Response decoding and error mapping
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let recorder = Recorder::new(case["response"].clone());
        let client = ArcaneClient::with_transport(ClientConfig::new(BASE_URL).with_api_key("K"), recorder);

        let result: Result<Value, ClientError> = client.get("/api/anything");

        match (&case["expected_result"], &case["expected_error"]) {
            (expected, Value::Null) => {
                assert_eq!(&result.unwrap(), expected, "{name}: result");
            }
            (_, expected) => {
                let err = match result {
                    Err(ClientError::Api(err)) => err,
                    other => panic!("{name}: expected API error, got {other:?}"),
                };
                assert_eq!(u64::from(err.status), expected["status"].as_u64().unwrap(), "{name}: status");
                assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: message");
                assert_eq!(err.body, expected["body"].as_str().unwrap(), "{name}: body");
            }
        }
    }
}
