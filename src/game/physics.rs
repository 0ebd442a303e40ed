//! Ball geometry helpers - angle velocity, speed adjustment, serving

use rand::Rng;

use super::state::{BallState, Position};

/// Serve speeds are drawn from this half-open integer range
pub const SERVE_SPEED_MIN: u32 = 8;
pub const SERVE_SPEED_MAX: u32 = 16;

/// Velocity nudge applied away from zero on free movement and wall bounces
pub const VELOCITY_NUDGE: f64 = 0.1;

/// Velocity component for a uniformly random angle in `[min_angle, max_angle)`.
///
/// The angle bounds are fed to `cos`/`sin` as-is, i.e. as radians.
pub fn random_angle_velocity<R: Rng + ?Sized>(
    rng: &mut R,
    speed: f64,
    is_x_axis: bool,
    min_angle: f64,
    max_angle: f64,
) -> f64 {
    let angle = min_angle + rng.gen::<f64>() * (max_angle - min_angle);
    if is_x_axis {
        speed * angle.cos()
    } else {
        speed * -angle.sin()
    }
}

/// Inclusive bounds test
pub fn in_range(v: f64, lo: f64, hi: f64) -> bool {
    v >= lo && v <= hi
}

pub fn reverse_direction(v: f64) -> f64 {
    -v
}

/// New ball speed after a paddle hit.
///
/// `proximity` is the normalized offset of the hit from the paddle centre.
pub fn adjust_speed(current_speed: f64, proximity: f64) -> f64 {
    if proximity >= 1.0 {
        current_speed + 4.0
    } else if proximity > 0.0 {
        current_speed + 2.0
    } else if proximity == 0.0 {
        current_speed - 2.0
    } else {
        current_speed - 4.0
    }
}

pub fn paddle_center(paddle_height: f64, paddle_position: Position) -> f64 {
    paddle_position.y + paddle_height / 2.0
}

/// Push a velocity component `VELOCITY_NUDGE` further from zero
pub fn nudge_away_from_zero(v: f64) -> f64 {
    if v < 0.0 {
        v - VELOCITY_NUDGE
    } else {
        v + VELOCITY_NUDGE
    }
}

pub fn random_serve_speed<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    f64::from(rng.gen_range(SERVE_SPEED_MIN..SERVE_SPEED_MAX))
}

/// Fresh ball at the given centre, travelling toward the requested side
pub fn serve_ball<R: Rng + ?Sized>(
    rng: &mut R,
    center_x: f64,
    center_y: f64,
    toward_left: bool,
) -> BallState {
    let speed = random_serve_speed(rng);
    let angle_x = random_angle_velocity(rng, speed, true, 0.0, 40.0);
    let velocity_x = speed * angle_x.cos();
    let velocity_x = if toward_left {
        -velocity_x.abs()
    } else {
        velocity_x.abs()
    };

    BallState {
        position: Position::new(center_x, center_y),
        velocity_x,
        velocity_y: random_angle_velocity(rng, speed, false, 0.0, 40.0),
        speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn adjust_speed_rewards_centre_hits() {
        assert_eq!(adjust_speed(10.0, 1.0), 14.0);
        assert_eq!(adjust_speed(10.0, 1.7), 14.0);
        assert_eq!(adjust_speed(10.0, 0.4), 12.0);
        assert_eq!(adjust_speed(10.0, 0.0), 8.0);
        assert_eq!(adjust_speed(10.0, -0.2), 6.0);
    }

    #[test]
    fn in_range_is_inclusive() {
        assert!(in_range(5.0, 5.0, 10.0));
        assert!(in_range(10.0, 5.0, 10.0));
        assert!(!in_range(10.01, 5.0, 10.0));
        assert!(!in_range(4.99, 5.0, 10.0));
    }

    #[test]
    fn reverse_and_nudge() {
        assert_eq!(reverse_direction(3.5), -3.5);
        assert_eq!(reverse_direction(-2.0), 2.0);
        assert!((nudge_away_from_zero(-1.0) + 1.1).abs() < 1e-9);
        assert!((nudge_away_from_zero(1.0) - 1.1).abs() < 1e-9);
        assert!((nudge_away_from_zero(0.0) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn paddle_center_is_half_height_below_top() {
        assert_eq!(paddle_center(75.0, Position::new(5.0, 100.0)), 137.5);
    }

    #[test]
    fn random_angle_velocity_respects_axis() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        // A zero-width range pins the angle.
        let x = random_angle_velocity(&mut rng, 10.0, true, 0.0, 0.0);
        let y = random_angle_velocity(&mut rng, 10.0, false, 0.0, 0.0);
        assert_eq!(x, 10.0);
        assert_eq!(y, 0.0);

        for _ in 0..100 {
            let v = random_angle_velocity(&mut rng, 12.0, true, -75.0, 75.0);
            assert!(v.abs() <= 12.0);
        }
    }

    #[test]
    fn serve_toward_left_moves_left() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..500 {
            let ball = serve_ball(&mut rng, 350.0, 250.0, true);
            assert!(ball.velocity_x < 0.0);
            assert!(ball.speed >= 8.0 && ball.speed < 16.0);
            assert_eq!(ball.speed.fract(), 0.0);
            assert_eq!(ball.position, Position::new(350.0, 250.0));
        }
    }

    #[test]
    fn serve_toward_right_moves_right() {
        let mut rng = ChaCha8Rng::seed_from_u64(43);
        for _ in 0..500 {
            let ball = serve_ball(&mut rng, 350.0, 250.0, false);
            assert!(ball.velocity_x > 0.0);
        }
    }
}
