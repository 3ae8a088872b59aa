//! Headless collaborators
//!
//! Used by the native demo binary and by tests. Everything is recorded so a
//! caller can inspect what the game would have shown.

use std::cell::Cell;
use std::collections::VecDeque;

use super::{Delay, Hud, NamePrompt};
use crate::leaderboard::{LeaderboardEntry, format_result_line, rank_message};
use crate::sim::World;

/// HUD that logs and remembers what it was told
#[derive(Debug, Clone, Default)]
pub struct LogHud {
    pub world_size: (f32, f32),
    pub score: u64,
    pub start_overlay: bool,
    pub frames_drawn: u64,
    /// Lines of the results list, as rendered
    pub results: Vec<String>,
    /// Last rank shown
    pub rank: Option<u32>,
}

impl Hud for LogHud {
    fn set_world_size(&mut self, width_px: f32, height_px: f32) {
        self.world_size = (width_px, height_px);
    }

    fn set_score(&mut self, score: u64) {
        self.score = score;
    }

    fn set_start_overlay(&mut self, visible: bool) {
        self.start_overlay = visible;
    }

    fn draw(&mut self, _world: &World) {
        self.frames_drawn += 1;
    }

    fn show_results(&mut self, results: &[LeaderboardEntry]) {
        self.results = results
            .iter()
            .enumerate()
            .map(|(i, entry)| format_result_line(i, entry))
            .collect();
        for line in &self.results {
            log::info!("  {}", line);
        }
    }

    fn show_rank(&mut self, rank: u32) {
        self.rank = Some(rank);
        log::info!("{}", rank_message(rank));
    }
}

/// Prompt answering from a script, then with a fixed fallback
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    pub answers: VecDeque<Option<String>>,
    pub fallback: Option<String>,
    /// Number of times the player was asked
    pub asked: u32,
}

impl ScriptedPrompt {
    /// Always answer with `name`
    pub fn always(name: &str) -> Self {
        Self {
            fallback: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// Always cancel
    pub fn declining() -> Self {
        Self::default()
    }
}

impl NamePrompt for ScriptedPrompt {
    fn ask(&mut self, _default: &str) -> Option<String> {
        self.asked += 1;
        self.answers
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Delay that returns immediately and tallies requested time
#[derive(Debug, Default)]
pub struct ImmediateDelay {
    pub waited_ms: Cell<u64>,
}

impl Delay for ImmediateDelay {
    async fn wait(&self, ms: u32) {
        self.waited_ms.set(self.waited_ms.get() + u64::from(ms));
    }
}
