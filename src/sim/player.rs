//! The runner
//!
//! Two states: running on the ground with a looping run cycle, or airborne
//! on a parabolic jump. Elevation is measured upward from the ground.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Running,
    Jumping,
}

/// Sprite frame shown for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerFrame {
    /// Airborne pose
    Stationary,
    /// Run-cycle frame index in `0..RUN_FRAME_COUNT`
    Run(usize),
    /// Final frame after the run is lost
    Lose,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub state: PlayerState,
    /// Height of the feet above ground level
    pub elevation: f32,
    /// Upward velocity (units/ms), only meaningful while jumping
    pub velocity: f32,
    pub frame: PlayerFrame,
    /// Time accumulated toward the next run-cycle frame
    pub frame_time: f32,
    size: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            state: PlayerState::Running,
            elevation: 0.0,
            velocity: 0.0,
            frame: PlayerFrame::Run(0),
            frame_time: 0.0,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }

    #[inline]
    pub fn is_airborne(&self) -> bool {
        self.state == PlayerState::Jumping
    }

    /// Start a jump. Ignored while already in the air.
    pub fn jump(&mut self) -> bool {
        if self.is_airborne() || self.frame == PlayerFrame::Lose {
            return false;
        }
        self.state = PlayerState::Jumping;
        self.velocity = JUMP_SPEED;
        self.frame = PlayerFrame::Stationary;
        true
    }

    /// Advance by `delta` ms
    ///
    /// The run cycle ticks on wall time; the game's speed scale does not
    /// change how fast the legs move.
    pub fn update(&mut self, delta: f32, _speed_scale: f32) {
        match self.state {
            PlayerState::Running => self.update_run(delta),
            PlayerState::Jumping => self.update_jump(delta),
        }
    }

    fn update_run(&mut self, delta: f32) {
        if self.frame == PlayerFrame::Lose {
            return;
        }
        self.frame_time += delta;
        let index = match self.frame {
            PlayerFrame::Run(i) => i,
            _ => 0,
        };
        let steps = (self.frame_time / RUN_FRAME_TIME) as usize;
        let index = (index + steps % RUN_FRAME_COUNT) % RUN_FRAME_COUNT;
        self.frame_time %= RUN_FRAME_TIME;
        self.frame = PlayerFrame::Run(index);
    }

    fn update_jump(&mut self, delta: f32) {
        // Constant acceleration, so the arc is exact at any frame rate
        self.elevation += self.velocity * delta - 0.5 * GRAVITY * delta * delta;
        self.velocity -= GRAVITY * delta;

        if self.elevation <= 0.0 {
            // Land exactly on the ground
            self.elevation = 0.0;
            self.velocity = 0.0;
            self.state = PlayerState::Running;
            if self.frame != PlayerFrame::Lose {
                self.frame = PlayerFrame::Run(0);
                self.frame_time = 0.0;
            }
        }
    }

    /// Freeze on the lose frame
    pub fn set_lose(&mut self) {
        self.frame = PlayerFrame::Lose;
    }

    /// Current collidable bounds
    pub fn bounding_rect(&self) -> Rect {
        Rect::standing_on(PLAYER_LEFT, WORLD_HEIGHT - self.elevation, self.size)
    }
}
