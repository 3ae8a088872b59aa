//! Cactus Dash - A side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (ground, player, obstacles, collisions)
//! - `controller`: Run lifecycle, score and the post-run leaderboard flow
//! - `leaderboard`: Remote and local top-10 score tables
//! - `platform`: Browser/native collaborators (HUD, prompt, timers, frames)
//! - `scale`: World-unit to pixel mapping

pub mod controller;
pub mod leaderboard;
pub mod platform;
pub mod scale;
pub mod settings;
pub mod sim;

pub use controller::{PostRunOutcome, RunController};
pub use leaderboard::{Leaderboard, LeaderboardEntry, Standings};
pub use settings::Settings;

/// Game configuration constants
///
/// Distances are world units, times are milliseconds.
pub mod consts {
    /// World dimensions
    pub const WORLD_WIDTH: f32 = 100.0;
    pub const WORLD_HEIGHT: f32 = 30.0;

    /// Speed scale at the start of every run
    pub const INITIAL_SPEED_SCALE: f64 = 1.0;
    /// Speed scale gained per millisecond
    pub const SPEED_SCALE_INCREASE: f64 = 0.00001;
    /// Score gained per millisecond
    pub const SCORE_RATE: f64 = 0.01;

    /// Ground tiles
    pub const GROUND_SPEED: f32 = 0.05;
    pub const GROUND_SEGMENT_WIDTH: f32 = 300.0;
    pub const GROUND_SEGMENT_COUNT: usize = 2;

    /// Player box, anchored to the left side of the world
    pub const PLAYER_LEFT: f32 = 1.0;
    pub const PLAYER_WIDTH: f32 = 8.0;
    pub const PLAYER_HEIGHT: f32 = 9.0;
    /// Initial upward velocity of a jump (units/ms)
    pub const JUMP_SPEED: f32 = 0.135;
    /// Downward acceleration while airborne (units/ms²)
    pub const GRAVITY: f32 = 0.00045;
    /// Run-cycle animation
    pub const RUN_FRAME_COUNT: usize = 2;
    pub const RUN_FRAME_TIME: f32 = 100.0;

    /// Obstacles scroll at the same pace as the ground
    pub const OBSTACLE_SPEED: f32 = 0.05;
    pub const SPAWN_INTERVAL_MIN: f32 = 500.0;
    pub const SPAWN_INTERVAL_MAX: f32 = 2000.0;
    /// Lower bound for a scaled spawn interval
    pub const SPAWN_INTERVAL_FLOOR: f32 = 100.0;

    /// Pause between the end of the post-run flow and re-arming start
    pub const RESTART_DELAY_MS: u32 = 100;
    /// Number of entries the leaderboard keeps
    pub const LEADERBOARD_SIZE: usize = 10;
}
