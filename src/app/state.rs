//! Application state shared across routes

use std::sync::Arc;

use crate::config::Config;
use crate::lobby::{spawn_lobby, LobbyHandle};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub lobby: LobbyHandle,
}

impl AppState {
    /// Spawns the lobby task, so this must run inside the tokio runtime
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            lobby: spawn_lobby(),
        }
    }
}
