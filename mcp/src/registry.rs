//! Tool table, argument schemas and tool results.
//!
//! # Design
//! Handlers are registered with a concrete argument type. The registry
//! erases it behind a closure that decodes the raw JSON arguments first, so
//! a malformed call is rejected before any request reaches the server.

use std::fmt;

use arcane_core::{ArcaneClient, ClientError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

type Handler = Box<dyn Fn(&ArcaneClient, Value) -> Result<ToolOutput, ToolError> + Send + Sync>;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to render result: {0}")]
    Output(#[from] serde_json::Error),
}

impl ToolError {
    /// True when the caller got the call wrong, as opposed to the call
    /// failing while it ran.
    pub fn is_invalid_call(&self) -> bool {
        matches!(self, ToolError::UnknownTool(_) | ToolError::InvalidArguments { .. })
    }

    /// Text shown to the model when a call fails. API errors include the
    /// server's response body.
    pub fn report(&self) -> String {
        match self {
            ToolError::Client(ClientError::Api(err)) if !err.body.is_empty() => {
                format!("{err}\n{}", err.body)
            }
            other => other.to_string(),
        }
    }
}

/// Text content returned by a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }

    /// Pretty-printed JSON.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ToolError> {
        Ok(Self::text(serde_json::to_string_pretty(value)?))
    }

    /// The `tools/call` result object.
    pub fn into_value(self) -> Value {
        let mut result = json!({ "content": [{ "type": "text", "text": self.text }] });
        if self.is_error {
            result["isError"] = Value::Bool(true);
        }
        result
    }
}

/// Builder for a tool's `{"type": "object", ...}` argument schema.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    properties: Map<String, Value>,
    required: Vec<String>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn property(mut self, name: &str, mut schema: Value, description: &str, required: bool) -> Self {
        if !description.is_empty() {
            schema["description"] = Value::String(description.to_string());
        }
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    pub fn string(self, name: &str, description: &str) -> Self {
        self.property(name, json!({"type": "string"}), description, true)
    }

    pub fn optional_string(self, name: &str, description: &str) -> Self {
        self.property(name, json!({"type": "string"}), description, false)
    }

    pub fn optional_integer(self, name: &str, description: &str) -> Self {
        self.property(name, json!({"type": "integer", "minimum": 0}), description, false)
    }

    pub fn optional_bool(self, name: &str, description: &str) -> Self {
        self.property(name, json!({"type": "boolean"}), description, false)
    }

    pub fn optional_enum(self, name: &str, values: &[&str], description: &str) -> Self {
        self.property(name, json!({"type": "string", "enum": values}), description, false)
    }

    pub fn optional_string_list(self, name: &str, description: &str) -> Self {
        self.property(name, json!({"type": "array", "items": {"type": "string"}}), description, false)
    }

    pub fn optional_string_map(self, name: &str, description: &str) -> Self {
        self.property(
            name,
            json!({"type": "object", "additionalProperties": {"type": "string"}}),
            description,
            false,
        )
    }

    pub fn into_value(self) -> Value {
        let mut schema = json!({ "type": "object", "properties": self.properties });
        if !self.required.is_empty() {
            schema["required"] = json!(self.required);
        }
        schema
    }
}

pub struct Tool {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    handler: Handler,
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Ordered set of tools, listed in registration order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool whose arguments decode into `A`. Registering a name twice
    /// replaces the earlier tool.
    pub fn register<A, F>(&mut self, name: &'static str, description: &'static str, schema: InputSchema, handler: F) -> &mut Self
    where
        A: DeserializeOwned,
        F: Fn(&ArcaneClient, A) -> Result<ToolOutput, ToolError> + Send + Sync + 'static,
    {
        let handler: Handler = Box::new(move |client, arguments| {
            let args = serde_json::from_value(arguments).map_err(|e| ToolError::InvalidArguments {
                tool: name.to_string(),
                reason: e.to_string(),
            })?;
            handler(client, args)
        });
        let tool = Tool {
            name,
            description,
            input_schema: schema.into_value(),
            handler,
        };
        match self.tools.iter_mut().find(|t| t.name == name) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().map(|t| t.name)
    }

    /// Descriptors for `tools/list`.
    pub fn list(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema,
                })
            })
            .collect()
    }

    /// Run `name` with raw JSON arguments. Missing arguments count as `{}`.
    pub fn call(&self, client: &ArcaneClient, name: &str, arguments: Option<Value>) -> Result<ToolOutput, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let arguments = match arguments {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(value) => value,
        };
        (tool.handler)(client, arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcane_core::{ApiError, ClientConfig};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct EchoArgs {
        environment_id: String,
        search: Option<String>,
    }

    fn offline_client() -> ArcaneClient {
        ArcaneClient::new(ClientConfig::new("http://127.0.0.1:9").with_api_key("k"))
    }

    fn echo_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(
            "echo",
            "Echo the arguments",
            InputSchema::new()
                .string("environmentId", "The environment ID")
                .optional_string("search", ""),
            |_client, args: EchoArgs| {
                Ok(ToolOutput::text(format!(
                    "{}:{}",
                    args.environment_id,
                    args.search.unwrap_or_default()
                )))
            },
        );
        registry
    }

    #[test]
    fn schema_lists_required_properties() {
        let schema = InputSchema::new()
            .string("environmentId", "The environment ID")
            .optional_bool("force", "")
            .into_value();
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "environmentId": {"type": "string", "description": "The environment ID"},
                    "force": {"type": "boolean"},
                },
                "required": ["environmentId"],
            })
        );
    }

    #[test]
    fn empty_schema_has_no_required() {
        assert_eq!(InputSchema::new().into_value(), json!({"type": "object", "properties": {}}));
    }

    #[test]
    fn call_decodes_arguments() {
        let out = echo_registry()
            .call(&offline_client(), "echo", Some(json!({"environmentId": "0", "search": "web"})))
            .unwrap();
        assert_eq!(out, ToolOutput::text("0:web"));
    }

    #[test]
    fn bad_arguments_are_rejected_before_running() {
        let err = echo_registry()
            .call(&offline_client(), "echo", Some(json!({"search": "web"})))
            .unwrap_err();
        assert!(err.is_invalid_call());
        assert!(err.to_string().contains("environmentId"));
    }

    #[test]
    fn unknown_tool() {
        let err = echo_registry().call(&offline_client(), "nope", None).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "nope"));
    }

    #[test]
    fn reregistering_replaces() {
        let mut registry = echo_registry();
        registry.register("echo", "Replaced", InputSchema::new(), |_client, _: Value| Ok(ToolOutput::text("x")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("echo").unwrap().description, "Replaced");
    }

    #[test]
    fn api_error_report_includes_body() {
        let err = ToolError::from(ClientError::from(ApiError::new(404, "Not Found", "{\"error\":\"gone\"}")));
        assert!(!err.is_invalid_call());
        assert_eq!(err.report(), "API request failed: 404 Not Found\n{\"error\":\"gone\"}");
    }

    #[test]
    fn error_output_is_flagged() {
        let value = ToolOutput::error("boom").into_value();
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["text"], "boom");
        assert!(ToolOutput::text("ok").into_value().get("isError").is_none());
    }
}
