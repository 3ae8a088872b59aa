//! Per-frame simulation step
//!
//! Driven by display refresh timestamps. The first timestamp of a run only
//! primes the clock so the page-load-to-first-paint gap is never simulated.

use serde::{Deserialize, Serialize};

use super::state::{RunState, World};

/// Result of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Timestamp recorded, nothing simulated
    Primed,
    /// Simulated; request the next frame
    Continue,
    /// Player hit an obstacle; stop requesting frames
    Collision,
}

/// Tracks the previous frame timestamp
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn reset(&mut self) {
        self.last_time = None;
    }

    pub fn last_time(&self) -> Option<f64> {
        self.last_time
    }

    /// Record `timestamp`, returning the elapsed time since the last frame
    ///
    /// Returns `None` on the first frame. Timestamps that run backwards
    /// yield a zero delta.
    pub fn advance(&mut self, timestamp: f64) -> Option<f64> {
        let delta = self.last_time.map(|last| (timestamp - last).max(0.0));
        self.last_time = Some(timestamp);
        delta
    }
}

/// Advance the run by one display frame
pub fn step(
    run: &mut RunState,
    world: &mut World,
    clock: &mut FrameClock,
    timestamp: f64,
) -> StepOutcome {
    let Some(delta) = clock.advance(timestamp) else {
        return StepOutcome::Primed;
    };

    let speed_scale = run.speed_scale as f32;
    world.update(delta as f32, speed_scale);
    run.advance_speed_scale(delta);
    run.advance_score(delta);

    if world.check_lose() {
        log::debug!("Collision at t={:.1} score={:.2}", timestamp, run.score);
        return StepOutcome::Collision;
    }
    StepOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::obstacles::ObstacleKind;
    use crate::sim::state::RunPhase;

    fn running() -> (RunState, World, FrameClock) {
        let run = RunState {
            phase: RunPhase::Running,
            ..Default::default()
        };
        (run, World::new(99), FrameClock::default())
    }

    #[test]
    fn test_first_frame_is_noop() {
        let (mut run, mut world, mut clock) = running();
        world.obstacles.push(ObstacleKind::SmallCactus, 50.0);
        let ground_before = world.ground.segments.clone();

        let outcome = step(&mut run, &mut world, &mut clock, 123_456.0);

        assert_eq!(outcome, StepOutcome::Primed);
        assert_eq!(clock.last_time(), Some(123_456.0));
        assert_eq!(run.score, 0.0);
        assert_eq!(run.speed_scale, INITIAL_SPEED_SCALE);
        assert_eq!(world.ground.segments, ground_before);
        assert_eq!(world.obstacles.obstacles[0].x, 50.0);
        assert_eq!(world.obstacles.next_spawn, SPAWN_INTERVAL_MIN);
    }

    #[test]
    fn test_three_frames_accumulate_score() {
        let (mut run, mut world, mut clock) = running();
        let mut t = 1000.0;
        assert_eq!(step(&mut run, &mut world, &mut clock, t), StepOutcome::Primed);
        for _ in 0..3 {
            t += 16.0;
            assert_eq!(step(&mut run, &mut world, &mut clock, t), StepOutcome::Continue);
        }
        assert!((run.score - 0.48).abs() < 1e-9);
        assert_eq!(run.display_score(), 0);
        assert!((run.speed_scale - (1.0 + 48.0 * SPEED_SCALE_INCREASE)).abs() < 1e-12);
    }

    #[test]
    fn test_overlap_reports_collision() {
        let (mut run, mut world, mut clock) = running();
        world.obstacles.push(ObstacleKind::CactusCluster, PLAYER_LEFT);
        step(&mut run, &mut world, &mut clock, 0.0);
        assert_eq!(step(&mut run, &mut world, &mut clock, 16.0), StepOutcome::Collision);
    }

    #[test]
    fn test_backwards_timestamp_is_zero_delta() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(100.0), None);
        assert_eq!(clock.advance(90.0), Some(0.0));
        assert_eq!(clock.advance(106.0), Some(16.0));
        clock.reset();
        assert_eq!(clock.advance(500.0), None);
    }
}
