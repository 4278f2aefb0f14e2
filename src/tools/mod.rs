// ABOUTME: Tools module — the named functions the remote voice agent can invoke.
// ABOUTME: Defines the Tool trait, the registry, activity instrumentation, and the built-in tools.

pub mod html;
pub mod instrument;
pub mod registry;
pub mod save_text;
pub mod search;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};

pub use instrument::{Instrumented, instrument};
pub use registry::ToolRegistry;

/// A named function the remote agent may call with an untyped parameter bag.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the parameter bag. Its `required` list names the
    /// parameters shown next to the tool in the UI.
    fn schema(&self) -> Value;

    async fn execute(&self, params: Value) -> Result<String>;

    /// Activity line logged before the call, naming the salient parameter.
    fn started_activity(&self, _params: &Value) -> String {
        format!("🔧 Running {}", self.name())
    }

    /// Activity line logged after a successful call.
    fn finished_activity(&self) -> String {
        format!("✅ {} finished", self.name())
    }

    /// Whether this tool already carries the activity-logging layer.
    fn is_instrumented(&self) -> bool {
        false
    }
}

/// Required parameter names from a tool schema, in declaration order.
pub fn required_params(schema: &Value) -> Vec<String> {
    schema
        .get("required")
        .and_then(Value::as_array)
        .map(|keys| {
            keys.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Fetch a required string parameter, failing with a tool error naming the key.
pub(crate) fn required_str<'a>(tool: &str, params: &'a Value, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::tool(tool, format!("missing '{}' parameter", key)))
}

/// Fetch a required parameter as text. Strings are taken as-is; other JSON
/// values are rendered as JSON.
pub(crate) fn required_text(tool: &str, params: &Value, key: &str) -> Result<String> {
    match params.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(Error::tool(tool, format!("missing '{}' parameter", key))),
        Some(other) => Ok(other.to_string()),
    }
}

/// Fetch an optional string parameter for display, defaulting to empty.
pub(crate) fn display_param<'a>(params: &'a Value, key: &str) -> &'a str {
    params.get(key).and_then(Value::as_str).unwrap_or("")
}
