// ABOUTME: Activity instrumentation — wraps a tool so each call is narrated into the message log.
// ABOUTME: Logs before and after a successful call; tool results and errors pass through untouched.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::session::{EntryKind, MessageLog};
use crate::tools::Tool;

/// A tool decorated with activity logging.
pub struct Instrumented {
    inner: Arc<dyn Tool>,
    log: Arc<MessageLog>,
}

/// Wrap `tool` with activity logging. Already-instrumented tools are returned as-is,
/// so applying this twice never stacks a second layer.
pub fn instrument(tool: Arc<dyn Tool>, log: Arc<MessageLog>) -> Arc<dyn Tool> {
    if tool.is_instrumented() {
        return tool;
    }
    Arc::new(Instrumented { inner: tool, log })
}

#[async_trait]
impl Tool for Instrumented {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn schema(&self) -> Value {
        self.inner.schema()
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let name = self.inner.name().to_string();
        self.log
            .append(EntryKind::Activity, self.inner.started_activity(&params));
        tracing::info!(tool = %name, "tool call started");

        let result = self.inner.execute(params).await;

        match &result {
            Ok(_) => {
                self.log
                    .append(EntryKind::Activity, self.inner.finished_activity());
                tracing::info!(tool = %name, "tool call finished");
            }
            Err(e) => tracing::warn!(tool = %name, error = %e, "tool call failed"),
        }
        result
    }

    fn started_activity(&self, params: &Value) -> String {
        self.inner.started_activity(params)
    }

    fn finished_activity(&self) -> String {
        self.inner.finished_activity()
    }

    fn is_instrumented(&self) -> bool {
        true
    }
}
