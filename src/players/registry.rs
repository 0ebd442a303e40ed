//! Connection id -> player record, in connection order

use std::collections::HashMap;
use uuid::Uuid;

use super::Player;

#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: HashMap<Uuid, Player>,
    /// Connection order, used for `playersUpdate`
    order: Vec<Uuid>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: Player) {
        let id = player.connection_id;
        if self.players.insert(id, player).is_none() {
            self.order.push(id);
        }
    }

    pub fn remove(&mut self, id: &Uuid) -> Option<Player> {
        let removed = self.players.remove(id);
        if removed.is_some() {
            self.order.retain(|other| other != id);
        }
        removed
    }

    pub fn get(&self, id: &Uuid) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.players.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// All records in connection order
    pub fn snapshot(&self) -> Vec<Player> {
        self.order
            .iter()
            .filter_map(|id| self.players.get(id).cloned())
            .collect()
    }

    pub fn set_spectator(&mut self, id: &Uuid, is_spectator: bool) {
        if let Some(player) = self.players.get_mut(id) {
            player.is_spectator = is_spectator;
        }
    }

    pub fn set_score(&mut self, id: &Uuid, score: u32) {
        if let Some(player) = self.players.get_mut(id) {
            player.score = score;
        }
    }

    /// Mark a drafted player as an active participant with a fresh score
    pub fn draft(&mut self, id: &Uuid) {
        if let Some(player) = self.players.get_mut(id) {
            player.is_spectator = false;
            player.score = 0;
        }
    }

    /// Everyone except `participants` becomes a spectator
    pub fn assign_participants(&mut self, participants: &[Uuid]) {
        for (id, player) in self.players.iter_mut() {
            player.is_spectator = !participants.contains(id);
        }
    }

    pub fn clear_spectators(&mut self) {
        for player in self.players.values_mut() {
            player.is_spectator = false;
        }
    }
}
