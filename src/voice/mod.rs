// ABOUTME: Voice module — capability traits for the external conversational voice session.
// ABOUTME: The controller drives a ConversationTransport; the transport calls back into ConversationCallbacks.

pub mod elevenlabs;
pub mod protocol;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::tools::ToolRegistry;

pub use elevenlabs::{ElevenLabsConversation, ElevenLabsFactory};

/// Events a live session delivers. Implementations must not block or panic:
/// they run on the transport's own delivery task.
pub trait ConversationCallbacks: Send + Sync {
    fn on_agent_response(&self, text: &str);
    fn on_agent_response_correction(&self, original: &str, corrected: &str);
    fn on_user_transcript(&self, text: &str);
}

/// One live voice conversation.
#[async_trait]
pub trait ConversationTransport: Send {
    /// Open the session and begin delivering callbacks.
    async fn start(&mut self) -> Result<()>;

    /// Close the session. No callbacks are delivered afterwards.
    async fn end(&mut self) -> Result<()>;

    /// Send a typed user turn to the agent.
    async fn send_user_message(&mut self, text: &str) -> Result<()>;
}

/// Builds session objects. Construction must not touch the network; that happens in `start`.
pub trait TransportFactory: Send + Sync {
    fn create(
        &self,
        agent_id: &str,
        api_key: &str,
        callbacks: Arc<dyn ConversationCallbacks>,
        tools: ToolRegistry,
    ) -> Result<Box<dyn ConversationTransport>>;
}
