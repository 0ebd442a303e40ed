//! Matchmaker - decides who plays next from the queue and the current match

use tracing::{debug, info};
use uuid::Uuid;

use super::queue::MatchmakingQueue;

/// What the matchmaker needs to know about the current match
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchView {
    pub in_progress: bool,
    /// Human of a running single-player match
    pub single_player_human: Option<Uuid>,
    /// A multiplayer countdown is already under way
    pub multiplayer_pending: bool,
}

/// Two drafted participants plus whoever was left waiting behind them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub player1: Uuid,
    pub player2: Uuid,
    pub spectators: Vec<Uuid>,
}

/// Draft the next multiplayer pair, removing it from the queue.
///
/// `is_connected` filters out ids whose session no longer exists.
pub fn draft<F>(queue: &mut MatchmakingQueue, view: MatchView, is_connected: F) -> Option<Draft>
where
    F: Fn(&Uuid) -> bool,
{
    let eligible: Vec<Uuid> = queue.iter().copied().filter(|id| is_connected(id)).collect();
    if eligible.len() < 2 {
        return None;
    }

    if view.multiplayer_pending {
        debug!("Multiplayer countdown already pending, not drafting");
        return None;
    }

    // Multiplayer always preempts single player; otherwise wait for the match to end.
    if view.in_progress && view.single_player_human.is_none() {
        debug!(queue_size = queue.len(), "Match in progress, not drafting");
        return None;
    }

    let (player1, player2) = match view.single_player_human {
        // The solo human queued mid-game and sits in the first two slots: keep them.
        Some(human) if eligible[0] == human => (human, eligible[1]),
        Some(human) if eligible[1] == human => (human, eligible[0]),
        _ => (eligible[0], eligible[1]),
    };

    queue.remove(&player1);
    queue.remove(&player2);
    let spectators: Vec<Uuid> = queue.iter().copied().collect();

    info!(
        player1 = %player1,
        player2 = %player2,
        spectators = spectators.len(),
        "Drafted multiplayer match"
    );

    Some(Draft {
        player1,
        player2,
        spectators,
    })
}
