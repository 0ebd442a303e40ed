//! Computer opponent steering

use rand::Rng;

use super::physics::paddle_center;
use super::state::{Direction, Position};
use super::{BOARD_WIDTH, PADDLE_HEIGHT};

/// Distance from the computer's paddle plane at which it starts predicting
const PREDICTION_RANGE: f64 = 200.0;

/// Chance the computer mirrors the ball while the ball heads away from it
const MIRROR_CHANCE: f64 = 0.75;

/// Direction the computer paddle (right side) should travel next tick.
pub fn decide_direction<R: Rng + ?Sized>(
    rng: &mut R,
    ball_vx: f64,
    ball_vy: f64,
    ball_pos: Position,
    paddle_pos: Position,
) -> Direction {
    if ball_vx < 0.0 {
        // Ball heads to the human: loose tracking, sometimes random.
        if rng.gen_bool(MIRROR_CHANCE) {
            mirror(ball_vy)
        } else if rng.gen_bool(0.5) {
            Direction::Up
        } else {
            Direction::Down
        }
    } else {
        let distance = BOARD_WIDTH - 20.0 - ball_pos.x;
        if distance < PREDICTION_RANGE {
            let prediction = ball_pos.y + ball_vy;
            if prediction < paddle_center(PADDLE_HEIGHT, paddle_pos) {
                Direction::Up
            } else {
                Direction::Down
            }
        } else {
            mirror(ball_vy)
        }
    }
}

fn mirror(ball_vy: f64) -> Direction {
    if ball_vy < 0.0 {
        Direction::Up
    } else {
        Direction::Down
    }
}
