//! Run lifecycle
//!
//! Idle -> (start) -> Running -> (collision) -> Ended -> (leaderboard flow) -> Idle
//!
//! The controller owns the run state and the world. Frames are only asked
//! for while a run is live; once a collision ends the run the scheduler is
//! told to stop, and nothing is simulated while the leaderboard is awaited.

use anyhow::Context;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::platform::{Delay, FrameScheduler, Hud, NamePrompt, normalize_name};
use crate::scale::WorldSpace;
use crate::settings::Settings;
use crate::sim::{FrameClock, RunPhase, RunState, StepOutcome, World, autopilot, step};

/// How the post-run flow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostRunOutcome {
    /// Score did not make the table; nobody was asked for a name
    NotInTop,
    /// Player cancelled or left the name blank
    Declined,
    /// Score recorded at this rank
    Submitted { rank: u32 },
    /// Leaderboard unreachable or returned garbage
    Failed,
}

/// Owns a run from start input to the re-armed start screen
pub struct RunController<L, P, H, D> {
    run: RunState,
    world: World,
    clock: FrameClock,
    space: WorldSpace,
    /// One start trigger at a time; consumed by `start`, restored by `rearm`
    start_armed: bool,
    autopilot: bool,
    rng: Pcg32,
    restart_delay_ms: u32,
    default_name: String,
    leaderboard: L,
    prompt: P,
    hud: H,
    delay: D,
}

impl<L, P, H, D> RunController<L, P, H, D>
where
    L: Leaderboard,
    P: NamePrompt,
    H: Hud,
    D: Delay,
{
    pub fn new(
        settings: &Settings,
        seed: u64,
        leaderboard: L,
        prompt: P,
        hud: H,
        delay: D,
    ) -> Self {
        let mut controller = Self {
            run: RunState::default(),
            world: World::new(seed),
            clock: FrameClock::default(),
            space: WorldSpace::default(),
            start_armed: true,
            autopilot: false,
            rng: Pcg32::seed_from_u64(seed),
            restart_delay_ms: settings.restart_delay_ms,
            default_name: settings.default_name.clone(),
            leaderboard,
            prompt,
            hud,
            delay,
        };
        controller.hud.set_start_overlay(true);
        controller.hud.set_score(0);
        controller.hud.draw(&controller.world);
        controller
    }

    pub fn phase(&self) -> RunPhase {
        self.run.phase
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn leaderboard(&self) -> &L {
        &self.leaderboard
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn is_start_armed(&self) -> bool {
        self.start_armed
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    /// Fit the world into a new viewport (startup and every resize)
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        let (w, h) = self.space.fit(viewport_width, viewport_height);
        self.hud.set_world_size(w, h);
    }

    /// The "activate" key: starts a run when idle, jumps while running
    pub fn activate(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        match self.run.phase {
            RunPhase::Idle => self.start(scheduler),
            RunPhase::Running => self.jump(),
            RunPhase::Ended => false,
        }
    }

    /// Begin a run if the start trigger is armed
    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        if self.run.phase != RunPhase::Idle || !self.start_armed {
            return false;
        }
        self.start_armed = false;

        let seed = self.rng.next_u64();
        self.run.reset();
        self.run.phase = RunPhase::Running;
        self.clock.reset();
        self.world = World::new(seed);

        self.hud.set_start_overlay(false);
        self.hud.set_score(0);
        self.hud.draw(&self.world);
        log::info!("Run started (seed {})", seed);

        scheduler.request_frame();
        true
    }

    /// Jump, if running and on the ground
    pub fn jump(&mut self) -> bool {
        self.run.phase == RunPhase::Running && self.world.player.jump()
    }

    /// Display-frame callback
    ///
    /// Returns `None` when no run is live; the frame is ignored.
    pub fn frame(
        &mut self,
        timestamp: f64,
        scheduler: &mut impl FrameScheduler,
    ) -> Option<StepOutcome> {
        if self.run.phase != RunPhase::Running {
            return None;
        }

        if self.autopilot && autopilot::should_jump(&self.world, self.run.speed_scale as f32) {
            self.world.player.jump();
        }

        let outcome = step(&mut self.run, &mut self.world, &mut self.clock, timestamp);
        self.hud.set_score(self.run.display_score());

        match outcome {
            StepOutcome::Collision => {
                self.end_run();
                self.hud.draw(&self.world);
                scheduler.stop();
            }
            StepOutcome::Primed | StepOutcome::Continue => {
                self.hud.draw(&self.world);
                scheduler.request_frame();
            }
        }
        Some(outcome)
    }

    fn end_run(&mut self) {
        self.run.phase = RunPhase::Ended;
        self.world.player.set_lose();
        log::info!(
            "Run ended with score {} (speed x{:.3})",
            self.run.display_score(),
            self.run.speed_scale
        );
    }

    /// Post-run flow: leaderboard check, optional name entry and submit,
    /// then a short pause and back to idle
    ///
    /// Leaderboard failures are logged; the controller always re-arms.
    /// Returns `None` if no run has ended.
    pub async fn conclude(&mut self) -> Option<PostRunOutcome> {
        if self.run.phase != RunPhase::Ended {
            return None;
        }

        let score = self.run.rounded_score();
        let outcome = match self.record_score(score).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("Leaderboard unavailable: {:#}", e);
                PostRunOutcome::Failed
            }
        };
        log::info!("Post-run outcome: {:?}", outcome);

        self.delay.wait(self.restart_delay_ms).await;
        self.rearm();
        Some(outcome)
    }

    async fn record_score(&mut self, score: u64) -> anyhow::Result<PostRunOutcome> {
        let in_top = self
            .leaderboard
            .is_in_top(score)
            .await
            .context("checking top scores")?;
        if !in_top {
            return Ok(PostRunOutcome::NotInTop);
        }

        let Some(username) = normalize_name(self.prompt.ask(&self.default_name)) else {
            return Ok(PostRunOutcome::Declined);
        };

        let entry = LeaderboardEntry { username, score };
        let standings = self
            .leaderboard
            .submit(&entry)
            .await
            .context("submitting score")?;

        self.hud.show_results(&standings.results);
        self.hud.show_rank(standings.rank);
        Ok(PostRunOutcome::Submitted {
            rank: standings.rank,
        })
    }

    /// Back to the start screen with the start trigger armed
    fn rearm(&mut self) {
        self.run.phase = RunPhase::Idle;
        self.start_armed = true;
        self.hud.set_start_overlay(true);
        log::info!("Ready for next run");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::leaderboard::{LocalLeaderboard, Standings};
    use crate::platform::FrameLatch;
    use crate::platform::headless::{ImmediateDelay, LogHud, ScriptedPrompt};
    use crate::sim::ObstacleKind;

    /// Canned service responses
    #[derive(Default)]
    struct FakeLeaderboard {
        in_top: bool,
        standings: Option<Standings>,
        queried: Vec<u64>,
        submitted: Vec<LeaderboardEntry>,
    }

    impl Leaderboard for FakeLeaderboard {
        async fn is_in_top(&mut self, score: u64) -> anyhow::Result<bool> {
            self.queried.push(score);
            Ok(self.in_top)
        }

        async fn submit(&mut self, entry: &LeaderboardEntry) -> anyhow::Result<Standings> {
            self.submitted.push(entry.clone());
            self.standings
                .clone()
                .ok_or_else(|| anyhow::anyhow!("service returned 500"))
        }
    }

    /// Service that is never reachable
    struct DownLeaderboard;

    impl Leaderboard for DownLeaderboard {
        async fn is_in_top(&mut self, _score: u64) -> anyhow::Result<bool> {
            anyhow::bail!("connection refused")
        }

        async fn submit(&mut self, _entry: &LeaderboardEntry) -> anyhow::Result<Standings> {
            anyhow::bail!("connection refused")
        }
    }

    fn controller<L: Leaderboard>(
        leaderboard: L,
        prompt: ScriptedPrompt,
    ) -> RunController<L, ScriptedPrompt, LogHud, ImmediateDelay> {
        RunController::new(
            &Settings::default(),
            1234,
            leaderboard,
            prompt,
            LogHud::default(),
            ImmediateDelay::default(),
        )
    }

    /// Start a run and feed the priming frame
    fn start_run<L: Leaderboard>(
        c: &mut RunController<L, ScriptedPrompt, LogHud, ImmediateDelay>,
    ) -> FrameLatch {
        let mut latch = FrameLatch::default();
        assert!(c.activate(&mut latch));
        assert!(latch.wants_frame());
        let mut latch = FrameLatch::default();
        assert_eq!(c.frame(0.0, &mut latch), Some(StepOutcome::Primed));
        latch
    }

    /// Drive a run into a collision
    fn crash<L: Leaderboard>(
        c: &mut RunController<L, ScriptedPrompt, LogHud, ImmediateDelay>,
        score_ms: f64,
    ) {
        start_run(c);
        let mut latch = FrameLatch::default();
        c.frame(score_ms, &mut latch);
        c.world_mut()
            .obstacles
            .push(ObstacleKind::CactusCluster, PLAYER_LEFT);
        let mut latch = FrameLatch::default();
        assert_eq!(c.frame(score_ms + 16.0, &mut latch), Some(StepOutcome::Collision));
        assert!(!latch.wants_frame());
    }

    #[test]
    fn test_idle_at_load_with_overlay() {
        let c = controller(LocalLeaderboard::new(), ScriptedPrompt::declining());
        assert_eq!(c.phase(), RunPhase::Idle);
        assert!(c.is_start_armed());
        assert!(c.hud().start_overlay);
    }

    #[test]
    fn test_start_resets_and_hides_overlay() {
        let mut c = controller(LocalLeaderboard::new(), ScriptedPrompt::declining());
        let mut latch = FrameLatch::default();
        assert!(c.start(&mut latch));
        assert_eq!(c.phase(), RunPhase::Running);
        assert_eq!(c.run().score, 0.0);
        assert_eq!(c.run().speed_scale, INITIAL_SPEED_SCALE);
        assert!(!c.hud().start_overlay);
        assert!(!c.is_start_armed());
        assert!(c.world().obstacles.is_empty());
    }

    #[test]
    fn test_frames_ignored_while_idle() {
        let mut c = controller(LocalLeaderboard::new(), ScriptedPrompt::declining());
        let mut latch = FrameLatch::default();
        assert_eq!(c.frame(16.0, &mut latch), None);
        assert!(!latch.wants_frame());
    }

    #[test]
    fn test_activate_jumps_while_running() {
        let mut c = controller(LocalLeaderboard::new(), ScriptedPrompt::declining());
        let mut latch = start_run(&mut c);
        assert!(c.activate(&mut latch));
        assert!(c.world().player.is_airborne());
        // Airborne: second activate is ignored
        assert!(!c.activate(&mut latch));
        assert_eq!(c.phase(), RunPhase::Running);
    }

    #[test]
    fn test_scenario_short_run_keeps_running() {
        let mut c = controller(LocalLeaderboard::new(), ScriptedPrompt::declining());
        start_run(&mut c);
        let mut t = 0.0;
        for _ in 0..3 {
            t += 16.0;
            let mut latch = FrameLatch::default();
            assert_eq!(c.frame(t, &mut latch), Some(StepOutcome::Continue));
            assert!(latch.wants_frame());
        }
        assert!((c.run().score - 0.48).abs() < 1e-9);
        assert!((c.run().speed_scale - 1.0).abs() < 1e-3);
        assert_eq!(c.hud().score, 0);
        assert_eq!(c.phase(), RunPhase::Running);
    }

    #[test]
    fn test_scenario_overlap_ends_run() {
        let mut c = controller(LocalLeaderboard::new(), ScriptedPrompt::declining());
        crash(&mut c, 16.0);
        assert_eq!(c.phase(), RunPhase::Ended);
        assert_eq!(c.world().player.frame, crate::sim::PlayerFrame::Lose);
        // No input accepted until the flow completes
        let mut latch = FrameLatch::default();
        assert!(!c.activate(&mut latch));
        assert!(!latch.wants_frame());
        assert_eq!(c.frame(100.0, &mut latch), None);
    }

    #[test]
    fn test_scenario_not_in_top_skips_prompt() {
        let board = FakeLeaderboard {
            in_top: false,
            ..Default::default()
        };
        let mut c = controller(board, ScriptedPrompt::always("AAA"));
        crash(&mut c, 1000.0);

        let outcome = pollster::block_on(c.conclude());

        assert_eq!(outcome, Some(PostRunOutcome::NotInTop));
        assert_eq!(c.prompt().asked, 0);
        assert!(c.leaderboard().submitted.is_empty());
        assert_eq!(c.delay().waited_ms.get(), u64::from(RESTART_DELAY_MS));
        assert_eq!(c.phase(), RunPhase::Idle);
        assert!(c.is_start_armed());
        assert!(c.hud().start_overlay);
    }

    #[test]
    fn test_scenario_submit_shows_results_and_rank() {
        let results = vec![
            LeaderboardEntry::new("ZED", 900),
            LeaderboardEntry::new("BOB", 500),
            LeaderboardEntry::new("AAA", 10),
            LeaderboardEntry::new("EVE", 3),
        ];
        let board = FakeLeaderboard {
            in_top: true,
            standings: Some(Standings {
                results: results.clone(),
                rank: 3,
            }),
            ..Default::default()
        };
        let mut c = controller(board, ScriptedPrompt::always("AAA"));
        crash(&mut c, 1000.0);
        let score = c.run().rounded_score();

        let outcome = pollster::block_on(c.conclude());

        assert_eq!(outcome, Some(PostRunOutcome::Submitted { rank: 3 }));
        assert_eq!(c.leaderboard().queried, vec![score]);
        assert_eq!(c.leaderboard().submitted, vec![LeaderboardEntry::new("AAA", score)]);
        assert_eq!(
            c.hud().results,
            vec!["1 - ZED: 900", "2 - BOB: 500", "3 - AAA: 10", "4 - EVE: 3"]
        );
        assert_eq!(c.hud().rank, Some(3));
        assert_eq!(c.phase(), RunPhase::Idle);
    }

    #[test]
    fn test_results_list_is_replaced() {
        let mut board = LocalLeaderboard::new();
        board.add(LeaderboardEntry::new("OLD", 1));
        let mut c = controller(board, ScriptedPrompt::always("NEW"));
        crash(&mut c, 1000.0);
        pollster::block_on(c.conclude());
        let first = c.hud().results.clone();

        crash(&mut c, 2000.0);
        pollster::block_on(c.conclude());
        let second = c.hud().results.clone();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 3);
        assert!(second[0].starts_with("1 - NEW"));
    }

    #[test]
    fn test_declined_name_is_not_submitted() {
        let board = FakeLeaderboard {
            in_top: true,
            ..Default::default()
        };
        let mut prompt = ScriptedPrompt::declining();
        prompt.answers.push_back(Some("   ".to_string()));
        let mut c = controller(board, prompt);
        crash(&mut c, 1000.0);

        assert_eq!(pollster::block_on(c.conclude()), Some(PostRunOutcome::Declined));
        assert_eq!(c.prompt().asked, 1);
        assert!(c.leaderboard().submitted.is_empty());
        assert!(c.hud().results.is_empty());
        assert_eq!(c.phase(), RunPhase::Idle);

        // Cancel is treated the same
        crash(&mut c, 1000.0);
        assert_eq!(pollster::block_on(c.conclude()), Some(PostRunOutcome::Declined));
    }

    #[test]
    fn test_unreachable_leaderboard_still_rearms() {
        let mut c = controller(DownLeaderboard, ScriptedPrompt::always("AAA"));
        crash(&mut c, 1000.0);

        assert_eq!(pollster::block_on(c.conclude()), Some(PostRunOutcome::Failed));
        assert_eq!(c.phase(), RunPhase::Idle);
        assert!(c.is_start_armed());
        assert_eq!(c.prompt().asked, 0);

        // And the next run starts normally
        let mut latch = FrameLatch::default();
        assert!(c.activate(&mut latch));
        assert_eq!(c.phase(), RunPhase::Running);
    }

    #[test]
    fn test_failed_submit_still_rearms() {
        let board = FakeLeaderboard {
            in_top: true,
            standings: None,
            ..Default::default()
        };
        let mut c = controller(board, ScriptedPrompt::always("AAA"));
        crash(&mut c, 1000.0);
        assert_eq!(pollster::block_on(c.conclude()), Some(PostRunOutcome::Failed));
        assert_eq!(c.leaderboard().submitted.len(), 1);
        assert_eq!(c.hud().rank, None);
        assert_eq!(c.phase(), RunPhase::Idle);
    }

    #[test]
    fn test_conclude_without_ended_run_is_noop() {
        let mut c = controller(LocalLeaderboard::new(), ScriptedPrompt::declining());
        assert_eq!(pollster::block_on(c.conclude()), None);
        assert_eq!(c.delay().waited_ms.get(), 0);
    }

    #[test]
    fn test_each_run_gets_a_fresh_world() {
        let mut c = controller(LocalLeaderboard::new(), ScriptedPrompt::declining());
        crash(&mut c, 1000.0);
        let first_seed = c.world().obstacles.seed();
        pollster::block_on(c.conclude());
        start_run(&mut c);
        assert_ne!(c.world().obstacles.seed(), first_seed);
        assert!(c.world().obstacles.is_empty());
        assert_eq!(c.run().score, 0.0);
    }

    #[test]
    fn test_resize_sets_world_pixels() {
        let mut c = controller(LocalLeaderboard::new(), ScriptedPrompt::declining());
        c.resize(2000.0, 300.0);
        let (w, h) = c.hud().world_size;
        assert!((w - 1000.0).abs() < 1e-3);
        assert!((h - 300.0).abs() < 1e-3);
    }
}
