//! One simulation tick as a pipeline of snapshot -> snapshot steps
//!
//! Order: move paddles, then the first collision category that fires
//! (paddle, then wall/goal), else free ball movement.

use rand::Rng;

use super::ai::decide_direction;
use super::physics::{
    adjust_speed, in_range, nudge_away_from_zero, paddle_center, reverse_direction, serve_ball,
};
use super::state::{Direction, GameState, Side};
use super::{BOARD_HEIGHT, BOARD_WIDTH, MAX_BOUNCE_ANGLE, PADDLE_HEIGHT};

/// Paddle travel per tick
pub const PADDLE_STEP: f64 = 10.0;
/// Distance the ball is pushed off the top/bottom wall after a bounce
const WALL_PUSH: f64 = 20.0;
/// The ball's top or bottom edge within this margin of a wall counts as a hit
const WALL_MARGIN: f64 = 10.0;
/// Ball height used for the paddle overlap test
const BALL_SIZE: f64 = 10.0;

/// What happened to the ball on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    PaddleHit(Side),
    /// `scorer` is the side that won the point
    Goal { scorer: Side },
    WallBounce,
    FreeMove,
}

#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub state: GameState,
    pub event: TickEvent,
}

/// Advance `state` by one tick.
pub fn advance<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> TickOutcome {
    let moved = move_paddles(state);

    if let Some((state, side)) = paddle_collision(&moved) {
        return TickOutcome {
            state,
            event: TickEvent::PaddleHit(side),
        };
    }

    if let Some((state, event)) = wall_collision(&moved, rng) {
        return TickOutcome { state, event };
    }

    TickOutcome {
        state: move_ball(&moved, rng),
        event: TickEvent::FreeMove,
    }
}

/// Step both paddles; reaching an edge flips the direction instead of moving.
pub fn move_paddles(state: &GameState) -> GameState {
    let mut next = state.clone();
    for paddle in [&mut next.player1, &mut next.player2] {
        match paddle.direction {
            Direction::Up if paddle.position.y <= 0.0 => paddle.direction = Direction::Down,
            Direction::Up => paddle.position.y -= PADDLE_STEP,
            Direction::Down if paddle.position.y >= BOARD_HEIGHT - PADDLE_HEIGHT => {
                paddle.direction = Direction::Up
            }
            Direction::Down => paddle.position.y += PADDLE_STEP,
        }
    }
    next
}

/// Bounce off whichever paddle the ball overlaps, if any.
pub fn paddle_collision(state: &GameState) -> Option<(GameState, Side)> {
    let ball = &state.ball;
    let p1 = state.player1.position;
    let p2 = state.player2.position;

    let hit = if in_range(ball.position.x, p1.x + 8.0, p1.x + 22.0) && overlaps_paddle(ball.position.y, p1.y)
    {
        Side::Left
    } else if in_range(ball.position.x, p2.x - 12.0, p2.x + 2.0) && overlaps_paddle(ball.position.y, p2.y)
    {
        Side::Right
    } else {
        return None;
    };

    let mut next = state.clone();
    let paddle = state.paddle(hit).position;
    let center = paddle_center(PADDLE_HEIGHT, paddle);
    let offset = (center - next.ball.position.y) / (PADDLE_HEIGHT / 2.0);

    next.ball.speed = adjust_speed(next.ball.speed, offset);
    let bounce_angle = offset * MAX_BOUNCE_ANGLE;
    next.ball.velocity_x = next.ball.speed * bounce_angle.cos();
    next.ball.velocity_y = next.ball.speed * -bounce_angle.sin();

    // Snap outside the hit band and send the ball back across the board.
    match hit {
        Side::Left => {
            next.ball.position.x = paddle.x + 30.0;
            next.ball.velocity_x = next.ball.velocity_x.abs();
        }
        Side::Right => {
            next.ball.position.x = paddle.x - 20.0;
            next.ball.velocity_x = -next.ball.velocity_x.abs();
        }
    }

    Some((next, hit))
}

fn overlaps_paddle(ball_y: f64, paddle_y: f64) -> bool {
    in_range(ball_y, paddle_y, paddle_y + PADDLE_HEIGHT)
        || in_range(ball_y + BALL_SIZE, paddle_y, paddle_y + PADDLE_HEIGHT)
}

/// Score a goal or bounce off the top/bottom wall.
pub fn wall_collision<R: Rng + ?Sized>(
    state: &GameState,
    rng: &mut R,
) -> Option<(GameState, TickEvent)> {
    let ball = &state.ball;
    let goal_left = ball.position.x < 0.0;
    let goal_right = ball.position.x > BOARD_WIDTH;
    let hit_top = ball.position.y < WALL_MARGIN;
    let hit_bottom = ball.position.y > BOARD_HEIGHT - WALL_MARGIN;

    let mut next = state.clone();
    if goal_left || goal_right {
        let scorer = if goal_right { Side::Left } else { Side::Right };
        next.paddle_mut(scorer).info.score += 1;

        // The loser receives the serve; the human always does against the computer.
        let toward_left = state.is_single_player() || goal_left;
        next.ball = serve_ball(rng, BOARD_WIDTH / 2.0, BOARD_HEIGHT / 2.0, toward_left);
        return Some((next, TickEvent::Goal { scorer }));
    }

    if hit_top || hit_bottom {
        next.ball.velocity_y = reverse_direction(next.ball.velocity_y);
        next.ball.velocity_x = nudge_away_from_zero(next.ball.velocity_x);
        next.ball.velocity_y = nudge_away_from_zero(next.ball.velocity_y);
        if hit_top {
            next.ball.position.y += WALL_PUSH;
        } else {
            next.ball.position.y -= WALL_PUSH;
        }
        return Some((next, TickEvent::WallBounce));
    }

    None
}

/// Free flight: speed up slightly, advance, and steer the computer if present.
pub fn move_ball<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> GameState {
    let mut next = state.clone();
    let ball = &mut next.ball;
    ball.velocity_x = nudge_away_from_zero(ball.velocity_x);
    ball.velocity_y = nudge_away_from_zero(ball.velocity_y);
    ball.position.x += ball.velocity_x;
    ball.position.y += ball.velocity_y;

    if next.is_single_player() {
        next.player2.direction = decide_direction(
            rng,
            next.ball.velocity_x,
            next.ball.velocity_y,
            next.ball.position,
            next.player2.position,
        );
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{BallState, PaddleState, Position};
    use crate::players::Player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use uuid::Uuid;

    fn human(name: &str) -> Player {
        Player::new(name.to_string(), "#3DFAFF".to_string(), Uuid::new_v4(), false)
    }

    fn state_with_ball(x: f64, y: f64, vx: f64, vy: f64) -> GameState {
        GameState {
            player1: PaddleState::starting(human("Left"), Side::Left),
            player2: PaddleState::starting(human("Right"), Side::Right),
            ball: BallState {
                position: Position::new(x, y),
                velocity_x: vx,
                velocity_y: vy,
                speed: 10.0,
            },
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(5)
    }

    #[test]
    fn paddles_step_ten_units() {
        let mut state = state_with_ball(350.0, 250.0, 3.0, 3.0);
        state.player2.direction = Direction::Down;
        let next = move_paddles(&state);
        assert_eq!(next.player1.position.y, state.player1.position.y - 10.0);
        assert_eq!(next.player2.position.y, state.player2.position.y + 10.0);
    }

    #[test]
    fn flipping_at_an_edge_consumes_the_tick() {
        let mut state = state_with_ball(350.0, 250.0, 3.0, 3.0);
        state.player1.position.y = -7.5;
        state.player2.position.y = BOARD_HEIGHT - PADDLE_HEIGHT;
        state.player2.direction = Direction::Down;

        let next = move_paddles(&state);
        assert_eq!(next.player1.direction, Direction::Down);
        assert_eq!(next.player1.position.y, -7.5);
        assert_eq!(next.player2.direction, Direction::Up);
        assert_eq!(next.player2.position.y, BOARD_HEIGHT - PADDLE_HEIGHT);
    }

    #[test]
    fn left_paddle_hit_snaps_ball_and_sends_it_right() {
        // Left paddle x = 5, y = 212.5 (centre 250).
        let state = state_with_ball(20.0, 250.0, -8.0, 0.0);
        let (next, side) = paddle_collision(&state).expect("collision");
        assert_eq!(side, Side::Left);
        assert_eq!(next.ball.position.x, 35.0);
        assert!(next.ball.velocity_x >= 0.0);
        // Dead-centre hit slows the ball.
        assert_eq!(next.ball.speed, 8.0);
        assert!(paddle_collision(&next).is_none());
    }

    #[test]
    fn right_paddle_hit_snaps_ball_and_sends_it_left() {
        // Right paddle x = 685.
        let state = state_with_ball(680.0, 230.0, 8.0, 1.0);
        let (next, side) = paddle_collision(&state).expect("collision");
        assert_eq!(side, Side::Right);
        assert_eq!(next.ball.position.x, 665.0);
        assert!(next.ball.velocity_x <= 0.0);
        // Hit above centre counts as a near-centre hit.
        assert_eq!(next.ball.speed, 12.0);
        let expected_angle = ((250.0 - 230.0) / 37.5) * MAX_BOUNCE_ANGLE;
        assert!((next.ball.velocity_y - 12.0 * -expected_angle.sin()).abs() < 1e-9);
    }

    #[test]
    fn ball_bottom_edge_overlap_counts() {
        // Ball top is above the paddle but its bottom edge overlaps.
        let state = state_with_ball(20.0, 205.0, -8.0, 0.0);
        assert!(paddle_collision(&state).is_some());
        let state = state_with_ball(20.0, 201.0, -8.0, 0.0);
        assert!(paddle_collision(&state).is_none());
    }

    #[test]
    fn goal_on_left_scores_for_player2_and_serves_left() {
        let mut rng = rng();
        let state = state_with_ball(-1.0, 250.0, -8.0, 0.0);
        let outcome = advance(&state, &mut rng);
        assert_eq!(outcome.event, TickEvent::Goal { scorer: Side::Right });
        assert_eq!(outcome.state.player2.info.score, 1);
        assert_eq!(outcome.state.player1.info.score, 0);
        assert!(outcome.state.ball.velocity_x < 0.0);
        assert_eq!(outcome.state.ball.position, Position::new(350.0, 250.0));
    }

    #[test]
    fn goal_on_right_scores_for_player1_and_serves_right() {
        let mut rng = rng();
        let state = state_with_ball(701.0, 250.0, 8.0, 0.0);
        let outcome = advance(&state, &mut rng);
        assert_eq!(outcome.event, TickEvent::Goal { scorer: Side::Left });
        assert_eq!(outcome.state.player1.info.score, 1);
        assert!(outcome.state.ball.velocity_x > 0.0);
    }

    #[test]
    fn single_player_always_serves_to_the_human() {
        let mut rng = rng();
        let mut state = state_with_ball(701.0, 250.0, 8.0, 0.0);
        state.player2.info = Player::computer("#D81E5B".to_string());
        for _ in 0..50 {
            let outcome = advance(&state, &mut rng);
            assert!(outcome.state.ball.velocity_x < 0.0);
        }
    }

    #[test]
    fn wall_bounce_reverses_and_pushes_off() {
        let mut rng = rng();
        let state = state_with_ball(350.0, 5.0, 4.0, -3.0);
        let outcome = advance(&state, &mut rng);
        assert_eq!(outcome.event, TickEvent::WallBounce);
        assert!((outcome.state.ball.velocity_y - 3.1).abs() < 1e-9);
        assert!((outcome.state.ball.velocity_x - 4.1).abs() < 1e-9);
        assert_eq!(outcome.state.ball.position, Position::new(350.0, 25.0));

        let state = state_with_ball(350.0, 495.0, -4.0, 3.0);
        let outcome = advance(&state, &mut rng);
        assert_eq!(outcome.event, TickEvent::WallBounce);
        assert!((outcome.state.ball.velocity_y + 3.1).abs() < 1e-9);
        assert_eq!(outcome.state.ball.position.y, 475.0);
    }

    #[test]
    fn free_move_nudges_and_advances() {
        let mut rng = rng();
        let state = state_with_ball(350.0, 250.0, 4.0, -2.0);
        let outcome = advance(&state, &mut rng);
        assert_eq!(outcome.event, TickEvent::FreeMove);
        let ball = &outcome.state.ball;
        assert!((ball.velocity_x - 4.1).abs() < 1e-9);
        assert!((ball.velocity_y + 2.1).abs() < 1e-9);
        assert!((ball.position.x - 354.1).abs() < 1e-9);
        assert!((ball.position.y - 247.9).abs() < 1e-9);
    }

    #[test]
    fn free_move_steers_the_computer() {
        let mut rng = rng();
        let mut state = state_with_ball(600.0, 100.0, 5.0, -1.0);
        state.player2.info = Player::computer("#D81E5B".to_string());
        state.player2.direction = Direction::Down;
        let outcome = advance(&state, &mut rng);
        // Ball is close and well above the paddle centre.
        assert_eq!(outcome.state.player2.direction, Direction::Up);
    }

    #[test]
    fn exactly_one_branch_fires_per_tick() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut state = state_with_ball(350.0, 250.0, -9.0, 4.0);
        let mut seen = [false; 3];
        for _ in 0..2000 {
            let before = state.clone();
            let outcome = advance(&state, &mut rng);
            match outcome.event {
                TickEvent::PaddleHit(side) => {
                    seen[0] = true;
                    let x = outcome.state.ball.position.x;
                    let paddle_x = outcome.state.paddle(side).position.x;
                    match side {
                        Side::Left => assert!(x > paddle_x + 22.0),
                        Side::Right => assert!(x < paddle_x - 12.0),
                    }
                }
                TickEvent::Goal { .. } | TickEvent::WallBounce => seen[1] = true,
                TickEvent::FreeMove => {
                    seen[2] = true;
                    assert_ne!(outcome.state.ball.position, before.ball.position);
                }
            }
            let total_before = before.player1.info.score + before.player2.info.score;
            let total_after = outcome.state.player1.info.score + outcome.state.player2.info.score;
            match outcome.event {
                TickEvent::Goal { .. } => assert_eq!(total_after, total_before + 1),
                _ => assert_eq!(total_after, total_before),
            }
            state = outcome.state;
        }
        assert!(seen[1] && seen[2]);
    }
}
