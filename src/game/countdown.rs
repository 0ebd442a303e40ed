//! Pre-match countdown: "3...", "2...", "1...", "Go!", then kickoff
//!
//! Each step is a spawned sleep that reports back with the countdown token.
//! Cancelling aborts the sleep and bumps the token, so a step that was
//! already queued is recognised as stale.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::util::time::{COUNTDOWN_FIRST_STEP_MS, COUNTDOWN_STEP_MS};

/// Count announced first
const COUNTDOWN_FROM: u8 = 3;

/// Called with the countdown token once a step's delay has elapsed
pub type StepNotifier = Arc<dyn Fn(u64) -> bool + Send + Sync>;

/// What to start once the countdown completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kickoff {
    SinglePlayer { initiator: Uuid },
    Multiplayer { player1: Uuid, player2: Uuid },
}

impl Kickoff {
    pub fn involves(&self, connection_id: &Uuid) -> bool {
        match self {
            Self::SinglePlayer { initiator } => initiator == connection_id,
            Self::Multiplayer { player1, player2 } => {
                player1 == connection_id || player2 == connection_id
            }
        }
    }

    pub fn is_multiplayer(&self) -> bool {
        matches!(self, Self::Multiplayer { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Idle,
    /// Holds the count last announced; 0 means "Go!" was announced
    CountingDown(u8),
    /// Kickoff handed out, waiting for `finish`
    Starting,
}

/// Result of feeding a step token back into the countdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownStep {
    /// Token from a cancelled or superseded countdown
    Stale,
    /// Broadcast this text
    Announce(String),
    Kickoff(Kickoff),
}

pub struct Countdown {
    phase: CountdownPhase,
    token: u64,
    kickoff: Option<Kickoff>,
    timer: Option<JoinHandle<()>>,
    notify: StepNotifier,
}

impl Countdown {
    pub fn new(notify: StepNotifier) -> Self {
        Self {
            phase: CountdownPhase::Idle,
            token: 0,
            kickoff: None,
            timer: None,
            notify,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    #[cfg(test)]
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn is_active(&self) -> bool {
        self.phase != CountdownPhase::Idle
    }

    /// Kickoff waiting on this countdown
    pub fn pending(&self) -> Option<&Kickoff> {
        self.kickoff.as_ref()
    }

    /// Start counting down, superseding any countdown already running.
    /// Returns the first announcement.
    pub fn begin(&mut self, kickoff: Kickoff) -> String {
        self.cancel();
        self.kickoff = Some(kickoff);
        self.phase = CountdownPhase::CountingDown(COUNTDOWN_FROM);
        self.schedule(Duration::from_millis(COUNTDOWN_FIRST_STEP_MS));
        debug!(token = self.token, ?kickoff, "Countdown started");
        announcement(COUNTDOWN_FROM)
    }

    /// Advance on a step token delivered by the timer.
    pub fn advance(&mut self, token: u64) -> CountdownStep {
        if token != self.token {
            return CountdownStep::Stale;
        }
        self.timer = None;

        match self.phase {
            CountdownPhase::CountingDown(0) => match self.kickoff.take() {
                Some(kickoff) => {
                    self.phase = CountdownPhase::Starting;
                    CountdownStep::Kickoff(kickoff)
                }
                None => {
                    self.phase = CountdownPhase::Idle;
                    CountdownStep::Stale
                }
            },
            CountdownPhase::CountingDown(n) => {
                self.phase = CountdownPhase::CountingDown(n - 1);
                self.schedule(Duration::from_millis(COUNTDOWN_STEP_MS));
                CountdownStep::Announce(announcement(n - 1))
            }
            CountdownPhase::Idle | CountdownPhase::Starting => CountdownStep::Stale,
        }
    }

    /// Kickoff has been handled
    pub fn finish(&mut self) {
        if self.phase == CountdownPhase::Starting {
            self.phase = CountdownPhase::Idle;
        }
    }

    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if self.is_active() {
            debug!(token = self.token, "Countdown cancelled");
        }
        self.token += 1;
        self.kickoff = None;
        self.phase = CountdownPhase::Idle;
    }

    fn schedule(&mut self, delay: Duration) {
        let token = self.token;
        let notify = self.notify.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            notify(token);
        }));
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

fn announcement(count: u8) -> String {
    if count > 0 {
        format!("{count}...")
    } else {
        "Go!".to_string()
    }
}
