//! Session registry - one player record per connected websocket

pub mod identity;
pub mod registry;

pub use registry::PlayerRegistry;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Connection id reserved for the built-in computer opponent
pub const COMPUTER_ID: Uuid = Uuid::nil();

/// Display name of the built-in computer opponent
pub const COMPUTER_NAME: &str = "The Computer";

/// A connected session as seen by every client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub display_name: String,
    /// Hex color, e.g. `#3DFAFF`
    pub color: String,
    pub score: u32,
    pub connection_id: Uuid,
    pub is_spectator: bool,
}

impl Player {
    pub fn new(display_name: String, color: String, connection_id: Uuid, is_spectator: bool) -> Self {
        Self {
            display_name,
            color,
            score: 0,
            connection_id,
            is_spectator,
        }
    }

    /// The synthetic opponent used in single-player matches
    pub fn computer(color: String) -> Self {
        Self::new(COMPUTER_NAME.to_string(), color, COMPUTER_ID, false)
    }

    pub fn is_computer(&self) -> bool {
        self.connection_id == COMPUTER_ID
    }
}
