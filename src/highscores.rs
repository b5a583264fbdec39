//! High score persistence
//!
//! One best score per game mode, persisted to LocalStorage. A missing or
//! unreadable entry reads as zero; writes happen only when the new score
//! is strictly greater than the stored one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mode::GameMode;

/// Per-mode best scores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    entries: BTreeMap<String, u64>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "shadow_arcade_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Best score for a mode; never fails, absent reads as zero
    pub fn read(&self, mode: GameMode) -> u64 {
        self.entries
            .get(mode.storage_key())
            .copied()
            .unwrap_or(0)
    }

    /// Record a finished run. The stored value changes only when the new
    /// score beats it; returns true on a new high score.
    pub fn submit(&mut self, mode: GameMode, score: u64) -> bool {
        if score > self.read(mode) {
            self.entries.insert(mode.storage_key().to_string(), score);
            true
        } else {
            false
        }
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!("Loaded high scores for {} modes", scores.entries.len());
                    return scores;
                }
                log::warn!("Stored high scores unreadable, starting fresh");
            }
        }

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
                log::info!("High scores saved");
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
