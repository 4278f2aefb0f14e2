// ABOUTME: Websocket client for the hosted conversational-agent API (text events only, no audio).
// ABOUTME: Dispatches transcripts/responses to callbacks, answers pings, and runs client tool calls.

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::config::VoiceConfig;
use crate::error::{Error, Result};
use crate::tools::ToolRegistry;
use crate::voice::protocol::{ClientEvent, ClientToolCall, ServerEvent, parse_server_event};
use crate::voice::{ConversationCallbacks, ConversationTransport, TransportFactory};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;
type WsSource = SplitStream<WsStream>;

/// Websocket URL of the conversation endpoint for an agent.
pub fn conversation_url(base_url: &str, agent_id: &str) -> String {
    format!(
        "{}/v1/convai/conversation?agent_id={}",
        base_url.trim_end_matches('/'),
        agent_id
    )
}

/// Creates [`ElevenLabsConversation`] session objects.
pub struct ElevenLabsFactory {
    base_url: String,
}

impl ElevenLabsFactory {
    pub fn new(config: &VoiceConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
        }
    }
}

impl TransportFactory for ElevenLabsFactory {
    fn create(
        &self,
        agent_id: &str,
        api_key: &str,
        callbacks: Arc<dyn ConversationCallbacks>,
        tools: ToolRegistry,
    ) -> Result<Box<dyn ConversationTransport>> {
        Ok(Box::new(ElevenLabsConversation::new(
            conversation_url(&self.base_url, agent_id),
            api_key,
            callbacks,
            tools,
        )))
    }
}

/// One conversation over the agent websocket.
pub struct ElevenLabsConversation {
    url: String,
    api_key: String,
    callbacks: Arc<dyn ConversationCallbacks>,
    tools: ToolRegistry,
    sink: Option<Arc<Mutex<WsSink>>>,
    reader: Option<JoinHandle<()>>,
}

impl ElevenLabsConversation {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        callbacks: Arc<dyn ConversationCallbacks>,
        tools: ToolRegistry,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            callbacks,
            tools,
            sink: None,
            reader: None,
        }
    }
}

#[async_trait]
impl ConversationTransport for ElevenLabsConversation {
    async fn start(&mut self) -> Result<()> {
        if self.sink.is_some() {
            return Ok(());
        }

        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| Error::transport(format!("invalid session url: {}", e)))?;
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| Error::transport("API key is not a valid header value"))?;
        request.headers_mut().insert("xi-api-key", key);

        tracing::info!(url = %self.url, "connecting voice session");
        let (ws, _) = connect_async(request)
            .await
            .map_err(|e| Error::transport(format!("failed to connect: {}", e)))?;
        let (sink, source) = ws.split();
        let sink = Arc::new(Mutex::new(sink));

        send_event(&sink, &ClientEvent::ConversationInitiationClientData).await?;

        self.reader = Some(tokio::spawn(receive_loop(
            source,
            sink.clone(),
            self.callbacks.clone(),
            self.tools.clone(),
        )));
        self.sink = Some(sink);
        tracing::info!("voice session started");
        Ok(())
    }

    async fn end(&mut self) -> Result<()> {
        let Some(sink) = self.sink.take() else {
            return Ok(());
        };
        // A finished reader means the server already closed the conversation.
        let server_closed = match self.reader.take() {
            Some(reader) if reader.is_finished() => true,
            Some(reader) => {
                reader.abort();
                false
            }
            None => false,
        };
        if server_closed {
            tracing::info!("voice session already closed by server");
            return Ok(());
        }

        let result = sink.lock().await.send(Message::Close(None)).await;
        match result {
            Ok(())
            | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed)
            | Err(tungstenite::Error::Protocol(ProtocolError::SendAfterClosing)) => {
                tracing::info!("voice session ended");
                Ok(())
            }
            Err(e) => Err(Error::transport(format!("failed to close session: {}", e))),
        }
    }

    async fn send_user_message(&mut self, text: &str) -> Result<()> {
        let sink = self
            .sink
            .as_ref()
            .ok_or_else(|| Error::transport("session is not started"))?;
        send_event(
            sink,
            &ClientEvent::UserMessage {
                text: text.to_string(),
            },
        )
        .await
    }
}

async fn send_event(sink: &Mutex<WsSink>, event: &ClientEvent) -> Result<()> {
    let json = event
        .to_json()
        .map_err(|e| Error::transport(format!("failed to encode event: {}", e)))?;
    sink.lock()
        .await
        .send(Message::Text(json))
        .await
        .map_err(|e| Error::transport(format!("failed to send event: {}", e)))
}

/// What the receive loop does after handling a server event.
#[derive(Debug, PartialEq)]
pub enum Reaction {
    Nothing,
    Reply(ClientEvent),
    RunTool(ClientToolCall),
}

/// Deliver a server event to the callbacks and decide on any reply.
pub fn react(event: ServerEvent, callbacks: &dyn ConversationCallbacks) -> Reaction {
    match event {
        ServerEvent::AgentResponse {
            agent_response_event,
        } => {
            callbacks.on_agent_response(&agent_response_event.agent_response);
            Reaction::Nothing
        }
        ServerEvent::AgentResponseCorrection {
            agent_response_correction_event: c,
        } => {
            callbacks.on_agent_response_correction(
                &c.original_agent_response,
                &c.corrected_agent_response,
            );
            Reaction::Nothing
        }
        ServerEvent::UserTranscript {
            user_transcription_event,
        } => {
            callbacks.on_user_transcript(&user_transcription_event.user_transcript);
            Reaction::Nothing
        }
        ServerEvent::ClientToolCall { client_tool_call } => Reaction::RunTool(client_tool_call),
        ServerEvent::Ping { ping_event } => Reaction::Reply(ClientEvent::Pong {
            event_id: ping_event.event_id,
        }),
        ServerEvent::ConversationInitiationMetadata {
            conversation_initiation_metadata_event,
        } => {
            tracing::info!(
                conversation_id = %conversation_initiation_metadata_event.conversation_id,
                "conversation initiated"
            );
            Reaction::Nothing
        }
        ServerEvent::Other => Reaction::Nothing,
    }
}

/// Run a client tool call and build the result frame. Tool failures are
/// reported back to the agent with `is_error` set.
pub async fn run_tool_call(tools: &ToolRegistry, call: ClientToolCall) -> ClientEvent {
    match tools.call(&call.tool_name, call.parameters).await {
        Ok(result) => ClientEvent::ClientToolResult {
            tool_call_id: call.tool_call_id,
            result,
            is_error: false,
        },
        Err(e) => ClientEvent::ClientToolResult {
            tool_call_id: call.tool_call_id,
            result: e.to_string(),
            is_error: true,
        },
    }
}

async fn receive_loop(
    mut source: WsSource,
    sink: Arc<Mutex<WsSink>>,
    callbacks: Arc<dyn ConversationCallbacks>,
    tools: ToolRegistry,
) {
    while let Some(frame) = source.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let Some(event) = parse_server_event(&text) else {
                    continue;
                };
                match react(event, callbacks.as_ref()) {
                    Reaction::Nothing => {}
                    Reaction::Reply(reply) => {
                        if let Err(e) = send_event(&sink, &reply).await {
                            tracing::warn!(error = %e, "failed to reply to server event");
                        }
                    }
                    Reaction::RunTool(call) => {
                        tracing::info!(tool = %call.tool_name, id = %call.tool_call_id, "client tool call");
                        let sink = sink.clone();
                        let tools = tools.clone();
                        tokio::spawn(async move {
                            let reply = run_tool_call(&tools, call).await;
                            if let Err(e) = send_event(&sink, &reply).await {
                                tracing::warn!(error = %e, "failed to send tool result");
                            }
                        });
                    }
                }
            }
            Ok(Message::Close(frame)) => {
                tracing::info!(?frame, "voice session closed by server");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "voice session websocket error");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;
    use crate::voice::protocol::{AgentResponse, AgentResponseCorrection, PingEvent, UserTranscription};
    use std::sync::Mutex as StdMutex;
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

    #[derive(Default)]
    struct Recorder {
        events: StdMutex<Vec<String>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ConversationCallbacks for Recorder {
        fn on_agent_response(&self, text: &str) {
            self.events.lock().unwrap().push(format!("agent:{}", text));
        }
        fn on_agent_response_correction(&self, original: &str, corrected: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("correction:{}|{}", original, corrected));
        }
        fn on_user_transcript(&self, text: &str) {
            self.events.lock().unwrap().push(format!("user:{}", text));
        }
    }

    struct Upper;

    #[async_trait]
    impl Tool for Upper {
        fn name(&self) -> &str {
            "upper"
        }
        fn description(&self) -> &str {
            "uppercase"
        }
        fn schema(&self) -> serde_json::Value {
            serde_json::json!({})
        }
        async fn execute(&self, params: serde_json::Value) -> Result<String> {
            crate::tools::required_str("upper", &params, "text").map(|s| s.to_uppercase())
        }
    }

    #[test]
    fn url_includes_agent_id() {
        assert_eq!(
            conversation_url("wss://api.elevenlabs.io/", "agent_123"),
            "wss://api.elevenlabs.io/v1/convai/conversation?agent_id=agent_123"
        );
    }

    #[test]
    fn react_routes_events_to_callbacks() {
        let rec = Recorder::default();
        let r1 = react(
            ServerEvent::AgentResponse {
                agent_response_event: AgentResponse {
                    agent_response: "hi".to_string(),
                },
            },
            &rec,
        );
        let r2 = react(
            ServerEvent::AgentResponseCorrection {
                agent_response_correction_event: AgentResponseCorrection {
                    original_agent_response: "a".to_string(),
                    corrected_agent_response: "b".to_string(),
                },
            },
            &rec,
        );
        let r3 = react(
            ServerEvent::UserTranscript {
                user_transcription_event: UserTranscription {
                    user_transcript: "hello".to_string(),
                },
            },
            &rec,
        );
        assert_eq!(r1, Reaction::Nothing);
        assert_eq!(r2, Reaction::Nothing);
        assert_eq!(r3, Reaction::Nothing);
        assert_eq!(rec.events(), vec!["agent:hi", "correction:a|b", "user:hello"]);
    }

    #[test]
    fn react_answers_ping() {
        let rec = Recorder::default();
        let reaction = react(
            ServerEvent::Ping {
                ping_event: PingEvent {
                    event_id: 42,
                    ping_ms: None,
                },
            },
            &rec,
        );
        assert_eq!(reaction, Reaction::Reply(ClientEvent::Pong { event_id: 42 }));
        assert!(rec.events().is_empty());
    }

    #[tokio::test]
    async fn tool_calls_report_success_and_failure() {
        let mut tools = ToolRegistry::new();
        tools.register(Upper);

        let ok = run_tool_call(
            &tools,
            ClientToolCall {
                tool_name: "upper".to_string(),
                tool_call_id: "c1".to_string(),
                parameters: serde_json::json!({"text": "abc"}),
            },
        )
        .await;
        assert_eq!(
            ok,
            ClientEvent::ClientToolResult {
                tool_call_id: "c1".to_string(),
                result: "ABC".to_string(),
                is_error: false,
            }
        );

        let missing = run_tool_call(
            &tools,
            ClientToolCall {
                tool_name: "nope".to_string(),
                tool_call_id: "c2".to_string(),
                parameters: serde_json::Value::Null,
            },
        )
        .await;
        assert!(matches!(missing, ClientEvent::ClientToolResult { is_error: true, .. }));
    }

    #[tokio::test]
    async fn send_before_start_is_transport_error() {
        let mut convo = ElevenLabsConversation::new(
            "ws://127.0.0.1:9/v1/convai/conversation?agent_id=a",
            "key",
            Arc::new(Recorder::default()),
            ToolRegistry::new(),
        );
        let err = convo.send_user_message("hi").await.unwrap_err();
        assert!(matches!(err, Error::SessionTransport(_)));
        // Ending a session that never started is a no-op.
        convo.end().await.unwrap();
    }

    #[tokio::test]
    async fn end_succeeds_after_server_closes_conversation() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            let _init = ws.next().await.unwrap().unwrap();
            ws.close(None).await.unwrap();
        });

        let mut convo = ElevenLabsConversation::new(
            conversation_url(&format!("ws://{}", addr), "agent_1"),
            "secret-key",
            Arc::new(Recorder::default()),
            ToolRegistry::new(),
        );
        convo.start().await.unwrap();
        server.await.unwrap();

        // Give the reader task time to observe the close frame.
        for _ in 0..50 {
            if convo.reader.as_ref().is_some_and(|r| r.is_finished()) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        convo.end().await.unwrap();
        assert!(convo.sink.is_none());
        assert!(convo.send_user_message("late").await.is_err());
    }

    #[tokio::test]
    async fn session_against_local_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (pong_tx, pong_rx) = tokio::sync::oneshot::channel::<String>();
        let seen = Arc::new(StdMutex::new((None::<String>, None::<String>)));
        let seen_server = seen.clone();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_hdr_async(
                stream,
                move |req: &Request, resp: Response| -> std::result::Result<Response, ErrorResponse> {
                    let key = req
                        .headers()
                        .get("xi-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(String::from);
                    let query = req.uri().query().map(String::from);
                    *seen_server.lock().unwrap() = (key, query);
                    Ok(resp)
                },
            )
            .await
            .unwrap();

            let init = ws.next().await.unwrap().unwrap().into_text().unwrap();
            assert_eq!(init, r#"{"type":"conversation_initiation_client_data"}"#);

            ws.send(Message::Text(
                r#"{"type":"agent_response","agent_response_event":{"agent_response":"Hello there"}}"#
                    .to_string(),
            ))
            .await
            .unwrap();
            ws.send(Message::Text(
                r#"{"type":"ping","ping_event":{"event_id":3}}"#.to_string(),
            ))
            .await
            .unwrap();

            let pong = ws.next().await.unwrap().unwrap().into_text().unwrap();
            pong_tx.send(pong).unwrap();

            // Drain until the client closes.
            let mut received = Vec::new();
            while let Some(Ok(msg)) = ws.next().await {
                match msg {
                    Message::Text(text) => received.push(text),
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            received
        });

        let recorder = Arc::new(Recorder::default());
        let mut convo = ElevenLabsConversation::new(
            conversation_url(&format!("ws://{}", addr), "agent_1"),
            "secret-key",
            recorder.clone(),
            ToolRegistry::new(),
        );
        convo.start().await.unwrap();

        let pong: serde_json::Value = serde_json::from_str(&pong_rx.await.unwrap()).unwrap();
        assert_eq!(pong["type"], "pong");
        assert_eq!(pong["event_id"], 3);
        assert_eq!(recorder.events(), vec!["agent:Hello there"]);

        convo.send_user_message("typed hello").await.unwrap();
        convo.end().await.unwrap();

        let received = server.await.unwrap();
        assert_eq!(received.len(), 1);
        let user: serde_json::Value = serde_json::from_str(&received[0]).unwrap();
        assert_eq!(user["type"], "user_message");
        assert_eq!(user["text"], "typed hello");

        let (key, query) = seen.lock().unwrap().clone();
        assert_eq!(key.as_deref(), Some("secret-key"));
        assert_eq!(query.as_deref(), Some("agent_id=agent_1"));
    }
}
