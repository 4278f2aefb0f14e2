// ABOUTME: Tool registry — maps tool names to tool implementations for dispatch by name.
// ABOUTME: Builds the built-in tool set and produces the activity-instrumented copy.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::session::MessageLog;
use crate::tools::html::CreateHtmlTool;
use crate::tools::save_text::SaveToTextTool;
use crate::tools::search::{DuckDuckGo, SearchWebTool};
use crate::tools::{Tool, instrument, required_params};

/// Name-indexed set of tools.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three tools exposed to the voice agent, searching with DuckDuckGo.
    pub fn builtin(search: &SearchConfig) -> anyhow::Result<Self> {
        let backend = DuckDuckGo::new(search)?;
        let mut registry = Self::new();
        registry.register(SearchWebTool::new(Arc::new(backend)));
        registry.register(SaveToTextTool);
        registry.register(CreateHtmlTool);
        Ok(registry)
    }

    /// Register a tool under its own name, replacing any previous tool of that name.
    pub fn register(&mut self, tool: impl Tool + 'static) {
        self.register_arc(Arc::new(tool));
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// `(signature, description)` pairs sorted by name, where the signature
    /// is `name(param, ...)` built from the tool's schema.
    pub fn summaries(&self) -> Vec<(String, String)> {
        self.tools
            .values()
            .map(|t| {
                let params = required_params(&t.schema()).join(", ");
                (format!("{}({})", t.name(), params), t.description().to_string())
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a call by name. Unknown names fail as a tool error.
    pub async fn call(&self, name: &str, params: Value) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::tool(name, "no such tool"))?;
        tool.execute(params).await
    }

    /// A copy of this registry with every tool wrapped in activity logging.
    /// Tools that are already instrumented are kept as they are.
    pub fn instrumented(&self, log: Arc<MessageLog>) -> Self {
        let tools = self
            .tools
            .iter()
            .map(|(name, tool)| (name.clone(), instrument(tool.clone(), log.clone())))
            .collect();
        Self { tools }
    }
}
