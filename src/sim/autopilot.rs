//! Idle/demo mode - the game jumps on its own
//!
//! Jumps when the nearest obstacle ahead is inside a lookahead window that
//! grows with the speed scale, so the arc peaks over the obstacle.

use super::state::World;
use crate::consts::*;

/// Fixed part of the lookahead, in world units
const BASE_LOOKAHEAD: f32 = 2.0;
/// Milliseconds of scrolling added to the lookahead
const REACTION_MS: f32 = 120.0;

/// Distance from the player's leading edge at which a jump should start
pub fn lookahead(speed_scale: f32) -> f32 {
    BASE_LOOKAHEAD + OBSTACLE_SPEED * speed_scale * REACTION_MS
}

/// Whether the demo player should jump this frame
pub fn should_jump(world: &World, speed_scale: f32) -> bool {
    if world.player.is_airborne() {
        return false;
    }
    let front = world.player.bounding_rect().right;
    let window = lookahead(speed_scale);
    world
        .obstacles
        .obstacles
        .iter()
        .filter(|o| o.right() > PLAYER_LEFT)
        .map(|o| o.x - front)
        .any(|gap| gap <= window)
}
