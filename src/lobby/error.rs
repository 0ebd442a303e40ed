//! Errors raised by lobby event handlers
//!
//! None of these are fatal: the dispatcher logs them and, for the ones a
//! player can act on, sends a private chat notice.

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    #[error("Unknown connection {0}")]
    UnknownConnection(Uuid),

    #[error("Connection {0} does not control a paddle")]
    NotAParticipant(Uuid),

    #[error("Connection {0} is already queued")]
    AlreadyQueued(Uuid),

    #[error("Connection {0} is not queued")]
    NotQueued(Uuid),

    #[error("A match is already in progress")]
    MatchInProgress,

    #[error("Connection {0} may not do that right now")]
    NotAllowed(Uuid),

    #[error("Countdown kickoff is stale: {0}")]
    StaleKickoff(&'static str),
}

impl LobbyError {
    /// Private notice for the sender, if the error is worth telling them about
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::MatchInProgress => Some(
                "[Private message] A game is already in progress. Join the matchmaking queue to play next.",
            ),
            Self::NotAllowed(_) => {
                Some("[Private message] Only a player in the current game can do that.")
            }
            Self::UnknownConnection(_)
            | Self::NotAParticipant(_)
            | Self::AlreadyQueued(_)
            | Self::NotQueued(_)
            | Self::StaleKickoff(_) => None,
        }
    }
}
