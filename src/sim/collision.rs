//! Axis-aligned rectangles and overlap tests
//!
//! World space is y-down: `top <= bottom`, ground level is `WORLD_HEIGHT`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collidable bounds of an entity, in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Build a rect from its top-left corner and size
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            left: min.x,
            top: min.y,
            right: min.x + size.x,
            bottom: min.y + size.y,
        }
    }

    /// Build a rect standing on `floor`, with its left edge at `left`
    pub fn standing_on(left: f32, floor: f32, size: Vec2) -> Self {
        Self::from_min_size(Vec2::new(left, floor - size.y), size)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Check two rects for overlap (edges are exclusive)
#[inline]
pub fn is_collision(a: &Rect, b: &Rect) -> bool {
    a.left < b.right && a.top < b.bottom && a.right > b.left && a.bottom > b.top
}

/// True if `target` overlaps any of `others`
pub fn any_collision<I>(target: &Rect, others: I) -> bool
where
    I: IntoIterator<Item = Rect>,
{
    others.into_iter().any(|rect| is_collision(&rect, target))
}
