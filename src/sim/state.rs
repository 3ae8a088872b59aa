//! Run state and the simulated world
//!
//! `RunState` holds the progression values of a single run; `World` owns
//! the entities. Both are reset wholesale at the start of every run.

use serde::{Deserialize, Serialize};

use super::collision::any_collision;
use super::ground::Ground;
use super::obstacles::ObstacleField;
use super::player::Player;
use crate::consts::*;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for the start input
    #[default]
    Idle,
    /// Frames are being simulated
    Running,
    /// Collision happened, post-run flow in progress
    Ended,
}

/// Progression of the current run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    /// Raw score accumulator
    pub score: f64,
    /// Multiplier on scroll speed and spawn cadence
    pub speed_scale: f64,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            phase: RunPhase::Idle,
            score: 0.0,
            speed_scale: INITIAL_SPEED_SCALE,
        }
    }
}

impl RunState {
    /// Reset progression for a new run
    pub fn reset(&mut self) {
        self.score = 0.0;
        self.speed_scale = INITIAL_SPEED_SCALE;
    }

    pub fn advance_speed_scale(&mut self, delta: f64) {
        self.speed_scale += delta * SPEED_SCALE_INCREASE;
    }

    pub fn advance_score(&mut self, delta: f64) {
        self.score += delta * SCORE_RATE;
    }

    /// Score as shown on the HUD
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Score as sent to the leaderboard
    pub fn rounded_score(&self) -> u64 {
        self.score.max(0.0).round() as u64
    }
}

/// All entities of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub ground: Ground,
    pub player: Player,
    pub obstacles: ObstacleField,
}

impl World {
    /// Fresh layout for a run
    pub fn new(seed: u64) -> Self {
        Self {
            ground: Ground::default(),
            player: Player::new(),
            obstacles: ObstacleField::new(seed),
        }
    }

    /// Advance every entity by `delta` ms
    pub fn update(&mut self, delta: f32, speed_scale: f32) {
        self.ground.update(delta, speed_scale);
        self.player.update(delta, speed_scale);
        self.obstacles.update(delta, speed_scale);
    }

    /// True if the player overlaps any obstacle
    pub fn check_lose(&self) -> bool {
        any_collision(&self.player.bounding_rect(), self.obstacles.rects())
    }
}
