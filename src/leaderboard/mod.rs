//! Leaderboard access
//!
//! The game only needs two calls: a cheap "would this score make the top
//! table" check, and a submit that returns the whole sorted table plus the
//! rank of the submitted run.

pub mod http;
pub mod local;

use serde::{Deserialize, Serialize};

pub use http::HttpLeaderboard;
pub use local::LocalLeaderboard;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub score: u64,
}

impl LeaderboardEntry {
    pub fn new(username: impl Into<String>, score: u64) -> Self {
        Self {
            username: username.into(),
            score,
        }
    }
}

/// Table returned after a submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    /// Best scores first
    pub results: Vec<LeaderboardEntry>,
    /// 1-indexed rank of the submitted entry
    pub rank: u32,
}

/// Score table collaborator
#[allow(async_fn_in_trait)]
pub trait Leaderboard {
    /// Whether `score` would enter the top table
    async fn is_in_top(&mut self, score: u64) -> anyhow::Result<bool>;

    /// Record an entry and fetch the updated table
    async fn submit(&mut self, entry: &LeaderboardEntry) -> anyhow::Result<Standings>;
}

/// Either leaderboard, picked from settings at startup
#[derive(Debug)]
pub enum AnyLeaderboard {
    Http(HttpLeaderboard),
    Local(LocalLeaderboard),
}

impl AnyLeaderboard {
    /// Remote table when a URL is configured, local otherwise
    pub fn from_url(url: Option<&str>) -> Self {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => {
                log::info!("Using leaderboard at {}", url);
                AnyLeaderboard::Http(HttpLeaderboard::new(url))
            }
            None => {
                log::info!("No leaderboard URL configured, scores stay local");
                AnyLeaderboard::Local(LocalLeaderboard::load())
            }
        }
    }
}

impl Leaderboard for AnyLeaderboard {
    async fn is_in_top(&mut self, score: u64) -> anyhow::Result<bool> {
        match self {
            AnyLeaderboard::Http(board) => board.is_in_top(score).await,
            AnyLeaderboard::Local(board) => board.is_in_top(score).await,
        }
    }

    async fn submit(&mut self, entry: &LeaderboardEntry) -> anyhow::Result<Standings> {
        match self {
            AnyLeaderboard::Http(board) => board.submit(entry).await,
            AnyLeaderboard::Local(board) => board.submit(entry).await,
        }
    }
}

/// One line of the results list, `index` is 0-based
pub fn format_result_line(index: usize, entry: &LeaderboardEntry) -> String {
    format!("{} - {}: {}", index + 1, entry.username, entry.score)
}

/// English ordinal for a rank (1st, 2nd, 3rd, 4th, 11th, 21st...)
pub fn ordinal(rank: u32) -> String {
    let suffix = match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", rank, suffix)
}

/// Message shown when a submitted score makes the table
pub fn rank_message(rank: u32) -> String {
    format!(
        "Congratulations! You made the {} best score of all time",
        ordinal(rank)
    )
}
