//! Local top-10 leaderboard
//!
//! Used when no remote service is configured. Persisted to LocalStorage.

use serde::{Deserialize, Serialize};

use super::{Leaderboard, LeaderboardEntry, Standings};
use crate::consts::LEADERBOARD_SIZE;

/// Leaderboard kept on this device
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalLeaderboard {
    /// Sorted descending by score
    pub entries: Vec<LeaderboardEntry>,
}

impl LocalLeaderboard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cactus_dash_leaderboard";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < LEADERBOARD_SIZE {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would get (1-indexed); ties rank below existing entries
    pub fn rank_of(&self, score: u64) -> usize {
        self.entries.iter().filter(|e| e.score >= score).count() + 1
    }

    /// Add an entry, returning its rank
    ///
    /// Entries that do not qualify are ranked but not stored.
    pub fn add(&mut self, entry: LeaderboardEntry) -> usize {
        let rank = self.rank_of(entry.score);
        if self.qualifies(entry.score) {
            self.entries.insert(rank - 1, entry);
            self.entries.truncate(LEADERBOARD_SIZE);
        }
        rank
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(board) = serde_json::from_str::<LocalLeaderboard>(&json) {
                    log::info!("Loaded {} local scores", board.entries.len());
                    return board;
                }
            }
        }

        log::info!("No local scores found, starting fresh");
        Self::new()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Local scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl Leaderboard for LocalLeaderboard {
    async fn is_in_top(&mut self, score: u64) -> anyhow::Result<bool> {
        Ok(self.qualifies(score))
    }

    async fn submit(&mut self, entry: &LeaderboardEntry) -> anyhow::Result<Standings> {
        let rank = self.add(entry.clone());
        self.save();
        Ok(Standings {
            results: self.entries.clone(),
            rank: rank as u32,
        })
    }
}
