// ABOUTME: App orchestrator — wires the context, the voice transport factory, and the TUI event loop.
// ABOUTME: Every pass re-reads the message log; redraws happen on keys, resizes, and refresh ticks.

use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::config::{Config, Credentials};
use crate::context::AppContext;
use crate::tui::input::{Action, handle_key};
use crate::tui::refresh::{RefreshTick, RefreshTimer};
use crate::tui::state::{Snapshot, TuiState};
use crate::tui::ui;
use crate::voice::ElevenLabsFactory;

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
    fresh: bool,
}

impl App {
    /// Create a new app with the given configuration.
    pub fn new(config: Config, fresh: bool) -> Self {
        Self { config, fresh }
    }

    /// Run the TUI until the user quits, then end any live session.
    pub async fn run(self) -> anyhow::Result<()> {
        let factory = Arc::new(ElevenLabsFactory::new(&self.config.voice));
        let mut ctx = AppContext::new(self.config, factory)?;
        if self.fresh {
            ctx.clear_chat();
        }
        tracing::info!(
            log = %ctx.log().path().display(),
            tools = ctx.tools().len(),
            "starting voicedesk"
        );

        let period = ctx.config().ui.poll_interval();
        let (_timer, mut ticks) = RefreshTimer::spawn(ctx.controller().subscribe(), period);

        let mut terminal = ratatui::init();
        let result = event_loop(&mut terminal, &mut ctx, &mut ticks).await;
        ratatui::restore();

        ctx.shutdown().await;
        tracing::info!("voicedesk exited");
        result
    }
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    ctx: &mut AppContext,
    ticks: &mut mpsc::Receiver<RefreshTick>,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();
    let mut state = TuiState::new();

    loop {
        let snapshot = Snapshot::capture(ctx, &Credentials::from_env());
        terminal.draw(|frame| ui::render(frame, &snapshot, &mut state))?;

        tokio::select! {
            Some(_) = ticks.recv() => {}
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let action = handle_key(&mut state, key);
                    if action == Action::Quit {
                        return Ok(());
                    }
                    perform(ctx, &mut state, action).await;
                }
                // Resize and other terminal events only need a redraw.
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }
    }
}

/// Apply a session action and leave a notice describing the outcome.
async fn perform(ctx: &mut AppContext, state: &mut TuiState, action: Action) {
    match action {
        Action::None | Action::Quit => {}
        Action::Connect => {
            if ctx.controller().is_connected() {
                state.info("Already connected");
                return;
            }
            match ctx.connect(&Credentials::from_env()).await {
                Ok(()) if ctx.controller().is_connected() => {
                    state.info("Connected! You can now start speaking.");
                }
                Ok(()) => state.error("Session could not be started"),
                Err(e) => state.error(format!("Failed to connect: {}", e)),
            }
        }
        Action::Disconnect => {
            if !ctx.controller().is_connected() {
                state.info("Not connected");
                return;
            }
            match ctx.disconnect().await {
                Ok(()) => state.info("Conversation ended successfully!"),
                Err(e) => state.error(format!("Failed to end conversation: {}", e)),
            }
        }
        Action::ClearChat => {
            ctx.clear_chat();
            state.scroll_offset = 0;
            state.info("Chat cleared");
        }
        Action::Refresh => {
            state.notice = None;
        }
        Action::Send(text) => {
            if let Err(e) = ctx.send_text(&text).await {
                state.error(format!("Message not sent: {}", e));
            } else {
                state.scroll_offset = 0;
            }
        }
    }
}
