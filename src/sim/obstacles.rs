//! Obstacle spawning and scrolling
//!
//! Obstacles enter at the right edge of the world on a randomized countdown
//! and are dropped once they have fully left on the left side.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Obstacle variants (cosmetic, each has its own footprint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    SmallCactus,
    LargeCactus,
    CactusCluster,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [
        ObstacleKind::SmallCactus,
        ObstacleKind::LargeCactus,
        ObstacleKind::CactusCluster,
    ];

    /// Width and height in world units
    pub fn size(&self) -> Vec2 {
        match self {
            ObstacleKind::SmallCactus => Vec2::new(4.0, 7.0),
            ObstacleKind::LargeCactus => Vec2::new(5.0, 9.0),
            ObstacleKind::CactusCluster => Vec2::new(9.0, 7.0),
        }
    }

    /// Sprite name for the display surface
    pub fn sprite(&self) -> &'static str {
        match self {
            ObstacleKind::SmallCactus => "cactus-small",
            ObstacleKind::LargeCactus => "cactus-large",
            ObstacleKind::CactusCluster => "cactus-cluster",
        }
    }
}

/// A single obstacle standing on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// World x of the left edge
    pub x: f32,
    pub size: Vec2,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, x: f32) -> Self {
        Self {
            id,
            kind,
            x,
            size: kind.size(),
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.size.x
    }

    /// Fully past the left edge of the world
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::standing_on(self.x, WORLD_HEIGHT, self.size)
    }
}

/// Spawn interval bounds for a given speed scale
///
/// Both bounds shrink as the game speeds up and never drop below the floor.
pub fn spawn_interval_range(speed_scale: f32) -> (f32, f32) {
    let scale = speed_scale.max(1.0);
    let min = (SPAWN_INTERVAL_MIN / scale).max(SPAWN_INTERVAL_FLOOR);
    let max = (SPAWN_INTERVAL_MAX / scale).max(min);
    (min, max)
}

/// Active obstacles plus the spawn countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleField {
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Time until the next spawn (ms)
    pub next_spawn: f32,
    seed: u64,
    #[serde(skip, default = "default_rng")]
    rng: Pcg32,
    next_id: u32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl ObstacleField {
    pub fn new(seed: u64) -> Self {
        Self {
            obstacles: Vec::new(),
            next_spawn: SPAWN_INTERVAL_MIN,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Add an obstacle at an explicit position
    pub fn push(&mut self, kind: ObstacleKind, x: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles.push(Obstacle::new(id, kind, x));
        id
    }

    /// Scroll, cull, then spawn if the countdown ran out
    pub fn update(&mut self, delta: f32, speed_scale: f32) {
        let dx = OBSTACLE_SPEED * speed_scale * delta;
        for obstacle in &mut self.obstacles {
            obstacle.x -= dx;
        }
        self.obstacles.retain(|o| !o.is_offscreen());

        self.next_spawn -= delta;
        if self.next_spawn <= 0.0 {
            let kind = ObstacleKind::ALL[self.rng.random_range(0..ObstacleKind::ALL.len())];
            let id = self.push(kind, WORLD_WIDTH);
            let (min, max) = spawn_interval_range(speed_scale);
            self.next_spawn = if max > min {
                self.rng.random_range(min..max)
            } else {
                min
            };
            log::trace!(
                "Spawned obstacle {} ({:?}), next in {:.0}ms",
                id,
                kind,
                self.next_spawn
            );
        }
    }

    /// Bounds of every active obstacle, computed from current positions
    pub fn rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.obstacles.iter().map(Obstacle::bounding_rect)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
