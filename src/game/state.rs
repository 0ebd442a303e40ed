//! Authoritative game state value types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::players::Player;

use super::{BOARD_HEIGHT, BOARD_WIDTH, PADDLE_HEIGHT};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Vertical direction a paddle travels in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Which paddle, left (`player1`) or right (`player2`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallState {
    pub position: Position,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddleState {
    /// Copy of the controlling player's record; `info.score` is the match score
    pub info: Player,
    pub position: Position,
    pub direction: Direction,
}

impl PaddleState {
    /// Paddle at its starting spot, vertically centred on the given side
    pub fn starting(info: Player, side: Side) -> Self {
        let x = match side {
            Side::Left => 5.0,
            Side::Right => BOARD_WIDTH - 15.0,
        };
        Self {
            info,
            position: Position::new(x, BOARD_HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0),
            direction: Direction::Up,
        }
    }
}

/// The one match-wide state; `player1` is the left paddle, `player2` the right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player1: PaddleState,
    pub player2: PaddleState,
    pub ball: BallState,
}

impl GameState {
    pub fn is_single_player(&self) -> bool {
        self.player2.info.is_computer()
    }

    pub fn participant_ids(&self) -> [Uuid; 2] {
        [
            self.player1.info.connection_id,
            self.player2.info.connection_id,
        ]
    }

    pub fn side_of(&self, connection_id: &Uuid) -> Option<Side> {
        if self.player1.info.connection_id == *connection_id {
            Some(Side::Left)
        } else if self.player2.info.connection_id == *connection_id {
            Some(Side::Right)
        } else {
            None
        }
    }

    pub fn paddle(&self, side: Side) -> &PaddleState {
        match side {
            Side::Left => &self.player1,
            Side::Right => &self.player2,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut PaddleState {
        match side {
            Side::Left => &mut self.player1,
            Side::Right => &mut self.player2,
        }
    }

    /// The participant other than `connection_id`, if it is one
    pub fn opponent_of(&self, connection_id: &Uuid) -> Option<Uuid> {
        match self.side_of(connection_id)? {
            Side::Left => Some(self.player2.info.connection_id),
            Side::Right => Some(self.player1.info.connection_id),
        }
    }
}
