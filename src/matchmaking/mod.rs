//! Matchmaking: the waiting queue and the drafting rules

pub mod queue;
pub mod service;

pub use queue::MatchmakingQueue;
pub use service::{draft, MatchView};
