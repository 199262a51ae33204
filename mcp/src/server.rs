//! Newline-delimited JSON-RPC loop.
//!
//! # Design
//! One request per line in, at most one response per line out. Requests
//! are handled strictly in order on the calling thread; a slow tool blocks
//! the next line, which matches how a single host drives the server.
//! Notifications (no `id`) never get a reply, not even an error.

use std::io::{self, BufRead, Write};

use arcane_core::ArcaneClient;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::protocol::{
    CallToolParams, Request, Response, RpcError, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, PROTOCOL_VERSION, SERVER_NAME,
};
use crate::registry::{ToolOutput, ToolRegistry};

pub struct Server {
    client: ArcaneClient,
    registry: ToolRegistry,
}

impl Server {
    pub fn new(client: ArcaneClient, registry: ToolRegistry) -> Self {
        Self { client, registry }
    }

    pub fn client(&self) -> &ArcaneClient {
        &self.client
    }

    /// Serve until `reader` reaches EOF.
    pub fn serve<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> io::Result<()> {
        info!(tools = self.registry.len(), "serving");
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line) {
                serde_json::to_writer(&mut writer, &response)?;
                writer.write_all(b"\n")?;
                writer.flush()?;
            }
        }
        info!("input closed");
        Ok(())
    }

    /// Handle one raw line. `None` means nothing should be written back.
    pub fn handle_line(&self, line: &str) -> Option<Response> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "unparsable message");
                return Some(Response::failure(Value::Null, RpcError::new(PARSE_ERROR, "Parse error")));
            }
        };
        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<Request>(value) {
            Ok(request) => self.handle(request),
            Err(e) => Some(Response::failure(
                id,
                RpcError::new(INVALID_REQUEST, format!("Invalid request: {e}")),
            )),
        }
    }

    pub fn handle(&self, request: Request) -> Option<Response> {
        debug!(method = %request.method, "message");
        let id = request.id?;
        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.registry.list() })),
            "tools/call" => self.call_tool(request.params),
            other => Err(RpcError::new(METHOD_NOT_FOUND, format!("Method not found: {other}"))),
        };
        Some(match result {
            Ok(result) => Response::success(id, result),
            Err(error) => Response::failure(id, error),
        })
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") },
        })
    }

    fn call_tool(&self, params: Option<Value>) -> Result<Value, RpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| RpcError::new(INVALID_PARAMS, "Missing params"))
            .and_then(|p| {
                serde_json::from_value(p).map_err(|e| RpcError::new(INVALID_PARAMS, format!("Invalid params: {e}")))
            })?;

        debug!(tool = %params.name, "calling tool");
        match self.registry.call(&self.client, &params.name, params.arguments) {
            Ok(output) => Ok(output.into_value()),
            Err(err) if err.is_invalid_call() => Err(RpcError::new(INVALID_PARAMS, err.to_string())),
            Err(err) => {
                warn!(tool = %params.name, error = %err, "tool failed");
                Ok(ToolOutput::error(err.report()).into_value())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcane_core::ClientConfig;

    fn server() -> Server {
        let client = ArcaneClient::new(ClientConfig::new("http://127.0.0.1:9").with_api_key("k"));
        Server::new(client, crate::tools::registry())
    }

    fn reply(line: &str) -> Value {
        serde_json::to_value(server().handle_line(line).unwrap()).unwrap()
    }

    #[test]
    fn initialize_reports_server_info() {
        let resp = reply(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#);
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"]["serverInfo"]["name"], "arcane");
        assert_eq!(resp["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert!(resp["result"]["capabilities"]["tools"].is_object());
    }

    #[test]
    fn notifications_get_no_reply() {
        assert!(server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .is_none());
    }

    #[test]
    fn ping_returns_empty_object() {
        let resp = reply(r#"{"jsonrpc":"2.0","id":"a","method":"ping"}"#);
        assert_eq!(resp["id"], "a");
        assert_eq!(resp["result"], json!({}));
    }

    #[test]
    fn unknown_method() {
        let resp = reply(r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#);
        assert_eq!(resp["error"]["code"], METHOD_NOT_FOUND);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let resp = reply("{not json");
        assert_eq!(resp["id"], Value::Null);
        assert_eq!(resp["error"]["code"], PARSE_ERROR);
    }

    #[test]
    fn missing_method_is_invalid_request() {
        let resp = reply(r#"{"jsonrpc":"2.0","id":3}"#);
        assert_eq!(resp["id"], 3);
        assert_eq!(resp["error"]["code"], INVALID_REQUEST);
    }

    #[test]
    fn call_without_params_is_invalid() {
        let resp = reply(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call"}"#);
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn call_with_missing_argument_is_invalid() {
        let resp = reply(
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"arcane_get_container","arguments":{"environmentId":"0"}}}"#,
        );
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
        assert!(resp["error"]["message"].as_str().unwrap().contains("containerId"));
    }

    #[test]
    fn serve_writes_one_line_per_request() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let mut out = Vec::new();
        server().serve(input.as_bytes(), &mut out).unwrap();

        let lines: Vec<Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["result"]["tools"].as_array().unwrap().len(), 52);
    }
}
