//! Match lifecycle and the fixed-interval tick driver

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::players::identity::random_color_excluding;
use crate::players::Player;
use crate::util::time::tick_interval;

use super::physics::{random_angle_velocity, random_serve_speed, serve_ball};
use super::state::{BallState, Direction, GameState, PaddleState, Position, Side};
use super::tick::{advance, TickOutcome};
use super::{BOARD_HEIGHT, BOARD_WIDTH};

/// Called from the ticker task with the match generation; returning false
/// ends the ticker (the receiving side is gone).
pub type TickNotifier = Arc<dyn Fn(u64) -> bool + Send + Sync>;

/// Owns the single GameState and the timer that advances it
pub struct PongEngine {
    state: Option<GameState>,
    in_progress: bool,
    /// Bumped on every start/stop so queued ticks from an old timer are ignored
    generation: u64,
    ticker: Option<JoinHandle<()>>,
    notify: TickNotifier,
    rng: ChaCha8Rng,
}

impl PongEngine {
    pub fn new(seed: u64, notify: TickNotifier) -> Self {
        Self {
            state: None,
            in_progress: false,
            generation: 0,
            ticker: None,
            notify,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Last published state; retained after `stop` until the next start or `clear`
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_single_player(&self) -> bool {
        self.in_progress && self.state.as_ref().is_some_and(GameState::is_single_player)
    }

    /// Participants of the running match, if one is running
    pub fn participants(&self) -> Option<[Uuid; 2]> {
        if !self.in_progress {
            return None;
        }
        self.state.as_ref().map(GameState::participant_ids)
    }

    pub fn start_multiplayer(&mut self, mut player1: Player, mut player2: Player) -> &GameState {
        player1.score = 0;
        player2.score = 0;

        let speed = random_serve_speed(&mut self.rng);
        let ball = BallState {
            position: Position::new(BOARD_WIDTH / 2.0, BOARD_HEIGHT / 2.0),
            velocity_x: random_angle_velocity(&mut self.rng, 15.0, true, -75.0, 75.0),
            velocity_y: random_angle_velocity(&mut self.rng, 15.0, false, -75.0, 75.0),
            speed,
        };

        info!(
            player1 = %player1.connection_id,
            player2 = %player2.connection_id,
            "Starting multiplayer match"
        );
        self.begin(GameState {
            player1: PaddleState::starting(player1, Side::Left),
            player2: PaddleState::starting(player2, Side::Right),
            ball,
        })
    }

    pub fn start_single_player(&mut self, mut human: Player) -> &GameState {
        human.score = 0;
        let computer = Player::computer(random_color_excluding(&mut self.rng, &human.color));
        let ball = serve_ball(&mut self.rng, BOARD_WIDTH / 2.0, BOARD_HEIGHT / 2.0, true);

        info!(player = %human.connection_id, "Starting single player match");
        self.begin(GameState {
            player1: PaddleState::starting(human, Side::Left),
            player2: PaddleState::starting(computer, Side::Right),
            ball,
        })
    }

    fn begin(&mut self, state: GameState) -> &GameState {
        self.cancel_ticker();
        self.generation += 1;
        self.in_progress = true;
        self.ticker = Some(spawn_ticker(self.generation, self.notify.clone()));
        self.state.insert(state)
    }

    /// Halt the tick timer. The last state stays readable.
    pub fn stop(&mut self) {
        if self.in_progress {
            info!(generation = self.generation, "Stopping match");
        }
        self.cancel_ticker();
        self.generation += 1;
        self.in_progress = false;
    }

    pub fn clear(&mut self) {
        self.stop();
        self.state = None;
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    /// Advance one tick if `generation` belongs to the running match.
    pub fn tick(&mut self, generation: u64) -> Option<TickOutcome> {
        if !self.in_progress || generation != self.generation {
            return None;
        }
        let current = self.state.as_ref()?;
        let outcome = advance(current, &mut self.rng);
        self.state = Some(outcome.state.clone());
        Some(outcome)
    }

    /// Set the paddle direction for the participant `connection_id`.
    ///
    /// Returns the republished state, or None when the sender controls no
    /// paddle in a running match.
    pub fn apply_direction(&mut self, connection_id: &Uuid, direction: Direction) -> Option<&GameState> {
        if !self.in_progress {
            return None;
        }
        let current = self.state.as_ref()?;
        let side = current.side_of(connection_id)?;
        let mut next = current.clone();
        next.paddle_mut(side).direction = direction;
        debug!(connection_id = %connection_id, ?direction, "Direction change applied");
        Some(&*self.state.insert(next))
    }
}

impl Drop for PongEngine {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

fn spawn_ticker(generation: u64, notify: TickNotifier) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = interval(tick_interval());
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticks.tick().await;
        loop {
            ticks.tick().await;
            if !notify(generation) {
                debug!(generation, "Tick receiver closed, ticker exiting");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::identity::PALETTE;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn engine() -> (PongEngine, mpsc::UnboundedReceiver<u64>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let notify: TickNotifier = Arc::new(move |generation| tx.send(generation).is_ok());
        (PongEngine::new(17, notify), rx)
    }

    fn human(name: &str, color: &str) -> Player {
        Player::new(name.to_string(), color.to_string(), Uuid::new_v4(), false)
    }

    #[tokio::test]
    async fn single_player_opponent_is_the_computer() {
        let (mut engine, _rx) = engine();
        let mut me = human("Me", "#3DFAFF");
        me.score = 3;

        let state = engine.start_single_player(me).clone();
        assert_eq!(state.player2.info.display_name, "The Computer");
        assert_eq!(state.player2.info.score, 0);
        assert_eq!(state.player1.info.score, 0);
        assert!(state.is_single_player());
        assert!(state.ball.velocity_x < 0.0);
        assert!(engine.is_single_player());
        assert!(engine.is_in_progress());
    }

    #[tokio::test]
    async fn computer_color_never_matches_human() {
        let (mut engine, _rx) = engine();
        for color in PALETTE.iter().cycle().take(200) {
            let state = engine.start_single_player(human("Me", color));
            assert_ne!(state.player2.info.color, *color);
        }
        engine.stop();
    }

    #[tokio::test]
    async fn multiplayer_start_resets_scores_and_centres_paddles() {
        let (mut engine, _rx) = engine();
        let mut a = human("A", "#3DFAFF");
        a.score = 9;
        let b = human("B", "#D81E5B");
        let (a_id, b_id) = (a.connection_id, b.connection_id);

        let state = engine.start_multiplayer(a, b).clone();
        assert_eq!(state.participant_ids(), [a_id, b_id]);
        assert_eq!(state.player1.info.score, 0);
        assert_eq!(state.player1.position, Position::new(5.0, 212.5));
        assert_eq!(state.player2.position, Position::new(685.0, 212.5));
        assert_eq!(state.ball.position, Position::new(350.0, 250.0));
        assert!(!engine.is_single_player());
        assert_eq!(engine.participants(), Some([a_id, b_id]));
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_runs_until_stopped() {
        let (mut engine, mut rx) = engine();
        engine.start_multiplayer(human("A", "#3DFAFF"), human("B", "#D81E5B"));
        let generation = engine.generation();

        assert_eq!(rx.recv().await, Some(generation));
        let outcome = engine.tick(generation).expect("tick while running");
        assert_eq!(engine.state(), Some(&outcome.state));

        engine.stop();
        assert!(!engine.is_in_progress());
        assert!(engine.state().is_some());
        assert!(engine.tick(generation).is_none());
        assert!(engine.participants().is_none());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn stale_generation_is_ignored() {
        let (mut engine, _rx) = engine();
        engine.start_single_player(human("Me", "#3DFAFF"));
        let old = engine.generation();
        engine.start_single_player(human("Me", "#3DFAFF"));
        assert!(engine.tick(old).is_none());
        assert!(engine.tick(engine.generation()).is_some());
    }

    #[tokio::test]
    async fn direction_change_requires_a_paddle() {
        let (mut engine, _rx) = engine();
        let a = human("A", "#3DFAFF");
        let b = human("B", "#D81E5B");
        let (a_id, b_id) = (a.connection_id, b.connection_id);
        engine.start_multiplayer(a, b);

        assert!(engine.apply_direction(&Uuid::new_v4(), Direction::Down).is_none());

        let state = engine.apply_direction(&a_id, Direction::Down).expect("owner");
        assert_eq!(state.player1.direction, Direction::Down);
        assert_eq!(state.player2.direction, Direction::Up);

        let state = engine.apply_direction(&b_id, Direction::Down).expect("owner");
        assert_eq!(state.player2.direction, Direction::Down);

        engine.stop();
        assert!(engine.apply_direction(&a_id, Direction::Up).is_none());

        engine.clear();
        assert!(engine.state().is_none());
    }
}
