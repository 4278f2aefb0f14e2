// ABOUTME: Refresh timer — emits periodic re-render ticks, but only while the session is connected.
// ABOUTME: The watched session status acts as the cancellation signal; the task idles when disconnected.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::session::SessionStatus;

/// A request to re-read the log and redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTick;

/// Background interval that follows the session status. Dropping it stops the task.
pub struct RefreshTimer {
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    /// Spawn the timer. Ticks arrive on the returned receiver every `period`
    /// while `status` reads `Connected`; none arrive otherwise.
    pub fn spawn(
        status: watch::Receiver<SessionStatus>,
        period: Duration,
    ) -> (Self, mpsc::Receiver<RefreshTick>) {
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(run(status, period, tx));
        (Self { handle }, rx)
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    mut status: watch::Receiver<SessionStatus>,
    period: Duration,
    tx: mpsc::Sender<RefreshTick>,
) {
    loop {
        if status.wait_for(|s| s.is_connected()).await.is_err() {
            return;
        }
        tracing::debug!(?period, "refresh timer running");

        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // A full channel means a redraw is already pending.
                    if let Err(mpsc::error::TrySendError::Closed(_)) = tx.try_send(RefreshTick) {
                        return;
                    }
                }
                changed = status.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    if !status.borrow_and_update().is_connected() {
                        tracing::debug!("refresh timer idle");
                        break;
                    }
                }
            }
        }
    }
}
