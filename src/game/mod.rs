//! Pong simulation: board constants, state types, physics and the tick driver

pub mod ai;
pub mod countdown;
pub mod engine;
pub mod physics;
pub mod state;
pub mod tick;

pub use countdown::{Countdown, Kickoff};
pub use engine::{PongEngine, TickNotifier};
pub use state::{Direction, GameState};
pub use tick::TickEvent;

/// Logical board width
pub const BOARD_WIDTH: f64 = 700.0;
/// Logical board height
pub const BOARD_HEIGHT: f64 = 500.0;
pub const PADDLE_HEIGHT: f64 = 75.0;
/// Multiplier for the normalized hit offset; the product is used as radians.
pub const MAX_BOUNCE_ANGLE: f64 = 75.0;
