// ABOUTME: Session controller — owns the single voice session object and its connect/disconnect lifecycle.
// ABOUTME: Narrates transitions into the message log and publishes the current state on a watch channel.

use std::sync::Arc;

use tokio::sync::watch;

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::session::{EntryKind, MessageLog};
use crate::tools::ToolRegistry;
use crate::voice::{ConversationCallbacks, ConversationTransport, TransportFactory};

pub const CONNECTED_ACTIVITY: &str = "🚀 Connected to Voice Assistant!";
pub const ENDED_ACTIVITY: &str = "🛑 Conversation ended";

/// Connection state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NotConnected,
    Connected,
}

impl SessionStatus {
    pub fn is_connected(self) -> bool {
        self == SessionStatus::Connected
    }
}

/// Session callbacks that write straight into the message log.
pub struct LogCallbacks {
    log: Arc<MessageLog>,
}

impl LogCallbacks {
    pub fn new(log: Arc<MessageLog>) -> Self {
        Self { log }
    }
}

impl ConversationCallbacks for LogCallbacks {
    fn on_agent_response(&self, text: &str) {
        self.log.append(EntryKind::Agent, text);
    }

    fn on_agent_response_correction(&self, original: &str, corrected: &str) {
        self.log.append(
            EntryKind::Agent,
            format!("Corrected: {} → {}", original, corrected),
        );
    }

    fn on_user_transcript(&self, text: &str) {
        self.log.append(EntryKind::User, text);
    }
}

/// Drives `NotConnected --start--> Connected --end--> NotConnected`.
pub struct SessionController {
    log: Arc<MessageLog>,
    factory: Arc<dyn TransportFactory>,
    session: Option<Box<dyn ConversationTransport>>,
    status: watch::Sender<SessionStatus>,
    last_activity: Option<String>,
}

impl SessionController {
    pub fn new(log: Arc<MessageLog>, factory: Arc<dyn TransportFactory>) -> Self {
        let (status, _) = watch::channel(SessionStatus::NotConnected);
        Self {
            log,
            factory,
            session: None,
            status,
            last_activity: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.status().is_connected()
    }

    /// Follow state changes. The refresh timer gates its ticks on this.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Whether a session object has been created.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn last_activity(&self) -> Option<&str> {
        self.last_activity.as_deref()
    }

    pub fn set_last_activity(&mut self, text: impl Into<String>) {
        self.last_activity = Some(text.into());
    }

    /// Create the session object. Fails without creating anything when a
    /// credential is missing. A no-op once a session object exists.
    pub fn initialize(&mut self, credentials: &Credentials, tools: ToolRegistry) -> Result<()> {
        if self.session.is_some() {
            return Ok(());
        }
        let (agent_id, api_key) = credentials.require()?;
        let callbacks: Arc<dyn ConversationCallbacks> = Arc::new(LogCallbacks::new(self.log.clone()));
        let session = self.factory.create(agent_id, api_key, callbacks, tools)?;
        self.session = Some(session);
        tracing::info!(agent_id, "session initialized");
        Ok(())
    }

    /// Start the session. Without a session object, or when already connected, does nothing.
    pub async fn start(&mut self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("start requested before initialization");
            return Ok(());
        };

        match session.start().await {
            Ok(()) => {
                self.status.send_replace(SessionStatus::Connected);
                self.log.append(EntryKind::Activity, CONNECTED_ACTIVITY);
                self.last_activity = Some("Connected successfully".to_string());
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "session start failed");
                self.log
                    .append(EntryKind::Activity, format!("❌ Connection failed: {}", e));
                Err(e)
            }
        }
    }

    /// End a connected session. On failure the session stays connected.
    pub async fn end(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };

        session.end().await.inspect_err(|e| {
            tracing::warn!(error = %e, "session end failed");
        })?;
        self.status.send_replace(SessionStatus::NotConnected);
        self.log.append(EntryKind::Activity, ENDED_ACTIVITY);
        self.last_activity = Some("Disconnected".to_string());
        Ok(())
    }

    /// Initialize on first use, then start.
    pub async fn connect(&mut self, credentials: &Credentials, tools: ToolRegistry) -> Result<()> {
        if !self.has_session() {
            self.initialize(credentials, tools)?;
        }
        self.start().await
    }

    /// Forward a typed user turn to the live session.
    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::transport("not connected"));
        }
        match self.session.as_mut() {
            Some(session) => session.send_user_message(text).await,
            None => Err(Error::transport("not connected")),
        }
    }
}
