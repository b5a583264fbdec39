//! Game mode identifiers shared by the lobby, engines, and persistence.

use serde::{Deserialize, Serialize};

/// The six playable minigames
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameMode {
    /// Top-down arena shooter
    Strike,
    /// Battle-royale zone survival
    Battle,
    /// Vertical space shooter
    Cosmic,
    /// Dodge-the-obstacles racer
    Racer,
    /// Gravity-flip runner
    Gravity,
    /// Side-scrolling platformer
    Platformer,
}

impl GameMode {
    pub const ALL: [GameMode; 6] = [
        GameMode::Strike,
        GameMode::Battle,
        GameMode::Cosmic,
        GameMode::Racer,
        GameMode::Gravity,
        GameMode::Platformer,
    ];

    /// Stable key used for high-score persistence
    pub fn storage_key(&self) -> &'static str {
        match self {
            GameMode::Strike => "strike",
            GameMode::Battle => "battle",
            GameMode::Cosmic => "cosmic",
            GameMode::Racer => "racer",
            GameMode::Gravity => "gravity",
            GameMode::Platformer => "platformer",
        }
    }

    /// Display name shown in the lobby
    pub fn title(&self) -> &'static str {
        match self {
            GameMode::Strike => "SHADOW STRIKE",
            GameMode::Battle => "BATTLE ZONE",
            GameMode::Cosmic => "COSMIC",
            GameMode::Racer => "NEON VELOCITY",
            GameMode::Gravity => "GRAVITY",
            GameMode::Platformer => "SUPER NEXUS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_unique() {
        let mut keys: Vec<_> = GameMode::ALL.iter().map(|m| m.storage_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), GameMode::ALL.len());
    }
}
