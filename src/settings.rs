//! Game settings
//!
//! Persisted in LocalStorage. Missing or unreadable settings fall back to
//! defaults; fields missing from an older save take their default value.

use serde::{Deserialize, Serialize};

use crate::consts::RESTART_DELAY_MS;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Leaderboard service base URL; `None` keeps scores on this device
    pub leaderboard_url: Option<String>,
    /// Pause before the start input is re-armed after a run (ms)
    pub restart_delay_ms: u32,
    /// Reload the page when the tab is hidden
    pub reload_on_hidden: bool,
    /// Pre-filled value of the name prompt
    pub default_name: String,
    /// Fixed RNG seed for reproducible obstacle layouts
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            leaderboard_url: None,
            restart_delay_ms: RESTART_DELAY_MS,
            reload_on_hidden: true,
            default_name: "B00".to_string(),
            seed: None,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cactus_dash_settings";

    /// Parse settings JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.restart_delay_ms, RESTART_DELAY_MS);
        assert!(settings.leaderboard_url.is_none());
        assert!(settings.reload_on_hidden);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"leaderboard_url":"https://scores.example"}"#);
        assert_eq!(
            settings.leaderboard_url.as_deref(),
            Some("https://scores.example")
        );
        assert_eq!(settings.default_name, "B00");
    }

    #[test]
    fn test_corrupt_json_falls_back() {
        assert_eq!(Settings::from_json("{not json"), Settings::default());
    }

    #[test]
    fn test_round_trip() {
        let settings = Settings {
            seed: Some(7),
            restart_delay_ms: 250,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), settings);
    }
}
