//! Scrolling ground tiles
//!
//! A fixed set of tiles laid edge to edge. Tiles that scroll fully off the
//! left edge are moved behind the rightmost tile, so the strip never ends
//! and never allocates.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// One ground tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundSegment {
    /// World x of the left edge
    pub x: f32,
    pub width: f32,
}

impl GroundSegment {
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn covers(&self, x: f32) -> bool {
        self.x <= x && x < self.right()
    }
}

/// The ground strip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ground {
    pub segments: Vec<GroundSegment>,
}

impl Default for Ground {
    fn default() -> Self {
        Self::new(GROUND_SEGMENT_COUNT, GROUND_SEGMENT_WIDTH)
    }
}

impl Ground {
    /// Lay out `count` tiles from x = 0
    ///
    /// The count is raised so the strip spans the world plus one spare tile.
    pub fn new(count: usize, width: f32) -> Self {
        let needed = ((WORLD_WIDTH / width).ceil() as usize + 1).max(2);
        let count = count.max(needed);
        let segments = (0..count)
            .map(|i| GroundSegment {
                x: i as f32 * width,
                width,
            })
            .collect();
        Self { segments }
    }

    /// Scroll every tile left and recycle the ones that left the world
    pub fn update(&mut self, delta: f32, speed_scale: f32) {
        let span = self.span();
        // The strip repeats every `span` units, so whole laps are dropped
        // before scrolling. Keeps the tile count bounded for any delta.
        let dx = (GROUND_SPEED * speed_scale * delta).rem_euclid(span);
        if !dx.is_finite() || dx <= 0.0 {
            return;
        }
        for segment in &mut self.segments {
            segment.x -= dx;
        }
        self.recycle();
    }

    /// Total width of all tiles
    fn span(&self) -> f32 {
        self.segments.iter().map(|s| s.width).sum()
    }

    /// Move off-screen tiles to the right end of the strip, until the
    /// leftmost tile is on-screen again
    fn recycle(&mut self) {
        while let Some((leftmost, segment)) = self
            .segments
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.x.total_cmp(&b.x))
            .map(|(i, s)| (i, *s))
        {
            if segment.right() >= 0.0 || segment.width <= 0.0 {
                return;
            }
            let tail = self
                .segments
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != leftmost)
                .map(|(_, s)| s.right())
                .fold(f32::NEG_INFINITY, f32::max);
            if tail.is_finite() {
                self.segments[leftmost].x = tail;
            } else {
                // Single tile: wrap onto itself
                let segment = &mut self.segments[leftmost];
                segment.x += segment.width;
            }
        }
    }

    /// True if some tile covers world x
    pub fn covers(&self, x: f32) -> bool {
        self.segments.iter().any(|s| s.covers(x))
    }
}
