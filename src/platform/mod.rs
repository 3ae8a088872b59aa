//! Platform abstraction layer
//!
//! The run controller talks to the outside world only through these traits:
//! - Frame scheduling (requestAnimationFrame on web)
//! - Display surface (world, score readout, overlays, results list)
//! - Name prompt
//! - Timers
//!
//! `web` implements them on the DOM, `headless` for the native demo and tests.

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::leaderboard::LeaderboardEntry;
use crate::sim::World;

/// Decides whether another display frame is wanted
pub trait FrameScheduler {
    /// Ask for one more frame callback
    fn request_frame(&mut self);
    /// Stop asking for frames until the next run starts
    fn stop(&mut self);
}

/// Records the scheduling decision of a single step for the driver to act on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameLatch {
    pub requested: bool,
    pub stopped: bool,
}

impl FrameLatch {
    /// True if the driver should request another frame
    pub fn wants_frame(&self) -> bool {
        self.requested && !self.stopped
    }
}

impl FrameScheduler for FrameLatch {
    fn request_frame(&mut self) {
        self.requested = true;
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}

/// Display surface
pub trait Hud {
    /// Pixel size of the world element
    fn set_world_size(&mut self, width_px: f32, height_px: f32);
    /// Score readout (already floored)
    fn set_score(&mut self, score: u64);
    /// Show or hide the "press a key" overlay
    fn set_start_overlay(&mut self, visible: bool);
    /// Position ground, player and obstacles
    fn draw(&mut self, world: &World);
    /// Replace the results list with `results`, best first
    fn show_results(&mut self, results: &[LeaderboardEntry]);
    /// Tell the player their rank
    fn show_rank(&mut self, rank: u32);
}

/// Modal name entry
pub trait NamePrompt {
    /// Ask for a display name; `None` if the player cancelled
    fn ask(&mut self, default: &str) -> Option<String>;
}

/// Timer collaborator
#[allow(async_fn_in_trait)]
pub trait Delay {
    async fn wait(&self, ms: u32);
}

/// Trim a prompt answer; cancelled or blank answers become `None`
pub fn normalize_name(answer: Option<String>) -> Option<String> {
    answer
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

/// Timer argument for a delay; browser timers take a signed 32-bit count
pub fn timer_ms(ms: u32) -> i32 {
    i32::try_from(ms).unwrap_or(i32::MAX)
}
