//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{Direction, GameState};
use crate::players::Player;

/// Sender name used for server notices
pub const SERVER_NAME: &str = "PONG SERVER";

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    /// Queue up for the next multiplayer match
    JoinMatchmaking,

    LeaveMatchmaking,

    /// Countdown then play against the computer
    StartSinglePlayer,

    StopGame,

    /// Turn the sender's paddle. Any client copy of the game state sent
    /// alongside is ignored.
    DirectionChange { direction: Direction },

    /// `from` and `color` are replaced with the sender's own record
    ChatMessage {
        message: String,
        #[serde(default)]
        from: Option<String>,
        #[serde(default)]
        color: Option<String>,
    },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    /// Sent once to a new connection
    #[serde(rename_all = "camelCase")]
    PlayerDetails { player: Player, is_spectator: bool },

    /// Every connected player, in connection order
    PlayersUpdate { players: Vec<Player> },

    ChatMessage(ChatMessage),

    /// Authoritative state, every tick and after direction changes
    #[serde(rename_all = "camelCase")]
    GameUpdate { game_state: GameState },

    #[serde(rename_all = "camelCase")]
    SinglePlayerGameStart {
        game_state: GameState,
        participant_id: Uuid,
    },

    #[serde(rename_all = "camelCase")]
    MultiPlayerGameStart {
        game_state: GameState,
        participant_ids: [Uuid; 2],
    },

    GameStopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSource {
    Player,
    Game,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from: String,
    pub message: String,
    pub source: ChatSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ChatMessage {
    /// A notice from the server
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            from: SERVER_NAME.to_string(),
            message: message.into(),
            source: ChatSource::Game,
            color: None,
        }
    }

    pub fn from_player(player: &Player, message: String) -> Self {
        Self {
            from: player.display_name.clone(),
            message,
            source: ChatSource::Player,
            color: Some(player.color.clone()),
        }
    }
}
