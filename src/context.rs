// ABOUTME: Process-wide application context — the log, the tool registry, and the session controller.
// ABOUTME: Built once at startup and handed to the UI loop; shutdown() ends any live session.

use std::sync::{Arc, OnceLock};

use crate::config::{Config, Credentials};
use crate::error::Result;
use crate::session::{EntryKind, MessageLog, SessionController};
use crate::tools::ToolRegistry;
use crate::voice::TransportFactory;

/// Everything that outlives a single render pass.
pub struct AppContext {
    config: Config,
    log: Arc<MessageLog>,
    tools: ToolRegistry,
    instrumented: OnceLock<ToolRegistry>,
    controller: SessionController,
}

impl AppContext {
    /// Build the context with the built-in tools.
    pub fn new(config: Config, factory: Arc<dyn TransportFactory>) -> anyhow::Result<Self> {
        let tools = ToolRegistry::builtin(&config.search)?;
        Ok(Self::with_tools(config, tools, factory))
    }

    pub fn with_tools(config: Config, tools: ToolRegistry, factory: Arc<dyn TransportFactory>) -> Self {
        let log = Arc::new(MessageLog::new(config.log.path.clone()));
        let controller = SessionController::new(log.clone(), factory);
        Self {
            config,
            log,
            tools,
            instrumented: OnceLock::new(),
            controller,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn log(&self) -> &Arc<MessageLog> {
        &self.log
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// The uninstrumented tools, as registered.
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// The activity-logging tool set handed to the session. Built on first
    /// call; later calls return the same registry.
    pub fn instrumented_tools(&self) -> &ToolRegistry {
        self.instrumented
            .get_or_init(|| self.tools.instrumented(self.log.clone()))
    }

    pub async fn connect(&mut self, credentials: &Credentials) -> Result<()> {
        let tools = self.instrumented_tools().clone();
        self.controller.connect(credentials, tools).await
    }

    pub async fn disconnect(&mut self) -> Result<()> {
        self.controller.end().await
    }

    /// Send a typed turn; it is logged as a user entry only once sent.
    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.controller.send_text(text).await?;
        self.log.append(EntryKind::User, text);
        Ok(())
    }

    /// Wipe the message log.
    pub fn clear_chat(&mut self) {
        self.log.clear();
        self.controller.set_last_activity("Chat cleared");
    }

    /// End a live session, if any.
    pub async fn shutdown(&mut self) {
        if self.controller.is_connected() {
            if let Err(e) = self.controller.end().await {
                tracing::warn!(error = %e, "failed to end session during shutdown");
            }
        }
    }
}
