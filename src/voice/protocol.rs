// ABOUTME: Wire types for the hosted conversational-agent websocket.
// ABOUTME: Server events are tagged by "type"; anything unrecognised parses as ServerEvent::Other.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events received from the agent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    ConversationInitiationMetadata {
        conversation_initiation_metadata_event: InitiationMetadata,
    },
    AgentResponse {
        agent_response_event: AgentResponse,
    },
    AgentResponseCorrection {
        agent_response_correction_event: AgentResponseCorrection,
    },
    UserTranscript {
        user_transcription_event: UserTranscription,
    },
    ClientToolCall {
        client_tool_call: ClientToolCall,
    },
    Ping {
        ping_event: PingEvent,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InitiationMetadata {
    #[serde(default)]
    pub conversation_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentResponse {
    pub agent_response: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentResponseCorrection {
    pub original_agent_response: String,
    pub corrected_agent_response: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserTranscription {
    pub user_transcript: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientToolCall {
    pub tool_name: String,
    pub tool_call_id: String,
    #[serde(default)]
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PingEvent {
    pub event_id: u64,
    #[serde(default)]
    pub ping_ms: Option<u64>,
}

/// Messages sent to the agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    ConversationInitiationClientData,
    Pong {
        event_id: u64,
    },
    ClientToolResult {
        tool_call_id: String,
        result: String,
        is_error: bool,
    },
    UserMessage {
        text: String,
    },
}

impl ClientEvent {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Parse one text frame. Frames that are not JSON objects with a known shape
/// yield `None` (malformed) or `Some(ServerEvent::Other)` (unknown type).
pub fn parse_server_event(text: &str) -> Option<ServerEvent> {
    match serde_json::from_str(text) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!(error = %e, "unparseable server event");
            None
        }
    }
}
