//! Session orchestrator
//!
//! A single task owns the registry, queue, engine, countdown and chat log.
//! Connection events, ticks and countdown steps all arrive as `LobbyEvent`s
//! on one channel and are handled to completion one at a time.

pub mod broadcast;
pub mod chat;
pub mod error;
mod handlers;

pub use broadcast::{Broadcaster, ConnectionSender, OUTBOUND_CAPACITY};
pub use error::LobbyError;

use parking_lot::RwLock;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::game::countdown::StepNotifier;
use crate::game::{Countdown, PongEngine, TickNotifier};
use crate::matchmaking::MatchmakingQueue;
use crate::players::PlayerRegistry;
use crate::ws::protocol::{ChatMessage, ClientMsg, ServerMsg};

use chat::ChatLog;

/// Everything the lobby task reacts to
#[derive(Debug)]
pub enum LobbyEvent {
    Connected {
        connection_id: Uuid,
        outbound: ConnectionSender,
    },
    Client {
        connection_id: Uuid,
        msg: ClientMsg,
    },
    Disconnected {
        connection_id: Uuid,
    },
    Tick {
        generation: u64,
    },
    CountdownStep {
        token: u64,
    },
}

/// Read-only summary for the health endpoint
#[derive(Debug, Clone, Default, Serialize)]
pub struct LobbyStats {
    pub connected_players: usize,
    pub queue_size: usize,
    pub match_in_progress: bool,
    pub single_player: bool,
}

/// Cloneable handle used by websocket sessions and HTTP routes
#[derive(Clone)]
pub struct LobbyHandle {
    events: mpsc::UnboundedSender<LobbyEvent>,
    stats: Arc<RwLock<LobbyStats>>,
}

impl LobbyHandle {
    /// Post an event; false once the lobby task has gone away
    pub fn send(&self, event: LobbyEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn stats(&self) -> LobbyStats {
        self.stats.read().clone()
    }
}

/// Spawn the lobby task
pub fn spawn_lobby() -> LobbyHandle {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let stats = Arc::new(RwLock::new(LobbyStats::default()));
    let lobby = Lobby::new(events_tx.clone(), rand::random(), stats.clone());

    tokio::spawn(lobby.run(events_rx));

    LobbyHandle {
        events: events_tx,
        stats,
    }
}

pub struct Lobby {
    players: PlayerRegistry,
    queue: MatchmakingQueue,
    engine: PongEngine,
    countdown: Countdown,
    chat: ChatLog,
    outbound: Broadcaster,
    rng: ChaCha8Rng,
    stats: Arc<RwLock<LobbyStats>>,
}

impl Lobby {
    /// `events` is the lobby's own inbox; timers post ticks and countdown
    /// steps back into it.
    pub fn new(
        events: mpsc::UnboundedSender<LobbyEvent>,
        seed: u64,
        stats: Arc<RwLock<LobbyStats>>,
    ) -> Self {
        let tick_events = events.clone();
        let on_tick: TickNotifier =
            Arc::new(move |generation| tick_events.send(LobbyEvent::Tick { generation }).is_ok());
        let on_step: StepNotifier =
            Arc::new(move |token| events.send(LobbyEvent::CountdownStep { token }).is_ok());

        Self {
            players: PlayerRegistry::new(),
            queue: MatchmakingQueue::new(),
            engine: PongEngine::new(seed, on_tick),
            countdown: Countdown::new(on_step),
            chat: ChatLog::default(),
            outbound: Broadcaster::new(),
            rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            stats,
        }
    }

    /// Process events until every sender is gone
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<LobbyEvent>) {
        info!("Lobby started");
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        self.engine.stop();
        info!("Lobby stopped");
    }

    pub fn handle(&mut self, event: LobbyEvent) {
        let origin = match &event {
            LobbyEvent::Connected { connection_id, .. }
            | LobbyEvent::Client { connection_id, .. }
            | LobbyEvent::Disconnected { connection_id } => Some(*connection_id),
            LobbyEvent::Tick { .. } | LobbyEvent::CountdownStep { .. } => None,
        };

        let result = match event {
            LobbyEvent::Connected {
                connection_id,
                outbound,
            } => {
                self.on_connect(connection_id, outbound);
                Ok(())
            }
            LobbyEvent::Client { connection_id, msg } => self.on_client_msg(connection_id, msg),
            LobbyEvent::Disconnected { connection_id } => {
                self.on_disconnect(connection_id);
                Ok(())
            }
            LobbyEvent::Tick { generation } => {
                self.on_tick(generation);
                Ok(())
            }
            LobbyEvent::CountdownStep { token } => self.on_countdown_step(token),
        };

        if let Err(err) = result {
            match &err {
                LobbyError::UnknownConnection(_) | LobbyError::StaleKickoff(_) => {
                    warn!(error = %err, "Lobby event aborted")
                }
                _ => debug!(error = %err, "Lobby event ignored"),
            }
            if let (Some(id), Some(notice)) = (origin, err.notice()) {
                self.send_chat_to(&id, ChatMessage::notice(notice));
            }
        }

        self.publish_stats();
    }

    fn on_client_msg(&mut self, connection_id: Uuid, msg: ClientMsg) -> Result<(), LobbyError> {
        match msg {
            ClientMsg::JoinMatchmaking => self.join_matchmaking(connection_id),
            ClientMsg::LeaveMatchmaking => self.leave_matchmaking(connection_id),
            ClientMsg::StartSinglePlayer => self.start_single_player(connection_id),
            ClientMsg::StopGame => self.stop_game(connection_id),
            ClientMsg::DirectionChange { direction } => {
                self.change_direction(connection_id, direction)
            }
            ClientMsg::ChatMessage { message, .. } => self.player_chat(connection_id, &message),
        }
    }

    fn publish_stats(&self) {
        let mut stats = self.stats.write();
        stats.connected_players = self.players.len();
        stats.queue_size = self.queue.len();
        stats.match_in_progress = self.engine.is_in_progress();
        stats.single_player = self.engine.is_single_player();
    }

    fn broadcast(&self, msg: ServerMsg) {
        self.outbound.broadcast(&msg);
    }

    fn broadcast_chat(&mut self, message: ChatMessage) {
        self.chat.push(message.clone());
        self.outbound.broadcast(&ServerMsg::ChatMessage(message));
    }

    fn send_chat_to(&self, id: &Uuid, message: ChatMessage) {
        self.outbound.send_to(id, ServerMsg::ChatMessage(message));
    }

    fn broadcast_players(&self) {
        self.broadcast(ServerMsg::PlayersUpdate {
            players: self.players.snapshot(),
        });
    }
}
