//! Matchmaking queue implementation

use std::collections::VecDeque;
use uuid::Uuid;

use crate::players::COMPUTER_ID;

/// FIFO of connection ids waiting for a match; an id appears at most once
#[derive(Debug, Default)]
pub struct MatchmakingQueue {
    queue: VecDeque<Uuid>,
}

impl MatchmakingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the back of the queue.
    /// Returns false if it was already queued or is the computer.
    pub fn enqueue(&mut self, id: Uuid) -> bool {
        if id == COMPUTER_ID || self.contains(&id) {
            return false;
        }
        self.queue.push_back(id);
        true
    }

    /// Move (or insert) a connection to the front of the queue
    pub fn push_front(&mut self, id: Uuid) {
        if id == COMPUTER_ID {
            return;
        }
        self.remove(&id);
        self.queue.push_front(id);
    }

    /// Remove a connection from the queue
    pub fn remove(&mut self, id: &Uuid) -> bool {
        if let Some(pos) = self.position(id) {
            self.queue.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.queue.contains(id)
    }

    pub fn position(&self, id: &Uuid) -> Option<usize> {
        self.queue.iter().position(|queued| queued == id)
    }

    pub fn get(&self, index: usize) -> Option<Uuid> {
        self.queue.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Uuid> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
