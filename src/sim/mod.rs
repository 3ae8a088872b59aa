//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - Entities advance by the elapsed frame time scaled by the run's speed
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod ground;
pub mod obstacles;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{Rect, any_collision, is_collision};
pub use ground::{Ground, GroundSegment};
pub use obstacles::{Obstacle, ObstacleField, ObstacleKind, spawn_interval_range};
pub use player::{Player, PlayerFrame, PlayerState};
pub use state::{RunPhase, RunState, World};
pub use tick::{FrameClock, StepOutcome, step};
