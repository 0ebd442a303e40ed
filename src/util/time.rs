//! Time utilities for game simulation

use std::time::{Duration, Instant};

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Simulation tick interval
pub const TICK_INTERVAL_MS: u64 = 90;
/// Delay after the first countdown announcement
pub const COUNTDOWN_FIRST_STEP_MS: u64 = 500;
/// Delay after every later countdown announcement
pub const COUNTDOWN_STEP_MS: u64 = 1000;

pub fn tick_interval() -> Duration {
    Duration::from_millis(TICK_INTERVAL_MS)
}
