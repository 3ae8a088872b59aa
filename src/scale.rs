//! World-to-pixel scaling
//!
//! The world is a fixed-size box in abstract units. The display surface is
//! sized to the largest uniform scale that still fits inside the viewport.

use serde::{Deserialize, Serialize};

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};

/// Fixed world dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSpace {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldSpace {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
        }
    }
}

impl WorldSpace {
    /// Pixels per world unit for a viewport
    pub fn compute_scale(&self, viewport_width: f32, viewport_height: f32) -> f32 {
        (viewport_width / self.width).min(viewport_height / self.height)
    }

    /// Rendered pixel size of the world at the given scale
    pub fn pixel_size(&self, scale: f32) -> (f32, f32) {
        (self.width * scale, self.height * scale)
    }

    /// Scale and pixel size in one step (startup and every resize)
    pub fn fit(&self, viewport_width: f32, viewport_height: f32) -> (f32, f32) {
        self.pixel_size(self.compute_scale(viewport_width, viewport_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_viewport_is_height_bound() {
        let world = WorldSpace::default();
        // 2000x300 is wider than 100:30
        let scale = world.compute_scale(2000.0, 300.0);
        assert!((scale - 10.0).abs() < 1e-6);
        let (w, h) = world.pixel_size(scale);
        assert!((w - 1000.0).abs() < 1e-3);
        assert!((h - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_tall_viewport_is_width_bound() {
        let world = WorldSpace::default();
        let (w, h) = world.fit(500.0, 1000.0);
        assert!((w - 500.0).abs() < 1e-3);
        assert!((h - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_fit_preserves_aspect_ratio() {
        let world = WorldSpace::default();
        for (vw, vh) in [(1920.0, 1080.0), (375.0, 812.0), (1000.0, 300.0)] {
            let (w, h) = world.fit(vw, vh);
            assert!(w <= vw + 1e-3 && h <= vh + 1e-3);
            assert!((w / h - WORLD_WIDTH / WORLD_HEIGHT).abs() < 1e-4);
        }
    }
}
