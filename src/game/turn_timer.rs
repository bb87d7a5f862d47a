use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::game::match_loop::MatchCommand;

/// Wall-clock turn countdown.
pub const TURN_SECONDS: u64 = 30;

/// Cooperative, cancellable countdown for the current turn. On expiry it
/// synthesizes a timer command into the match loop instead of touching
/// state directly; the loop drops expiries whose turn counter is stale.
#[derive(Default)]
pub struct TurnTimer {
    handle: Option<JoinHandle<()>>,
}

impl TurnTimer {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Starting a new countdown cancels any pending one.
    pub fn start(&mut self, seconds: u64, turn: u32, sender: mpsc::Sender<MatchCommand>) {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            sleep(Duration::from_secs(seconds)).await;
            let _ = sender.send(MatchCommand::TimerExpired { turn }).await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for TurnTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
