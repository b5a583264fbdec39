//! Score, level progression, and the game-over latch
//!
//! Score only ever increases within a run. Game-over is declared once;
//! after that the board is frozen and further awards are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scoreboard {
    score: u64,
    level: u32,
    /// Points per level; 0 disables leveling
    level_step: u64,
    over: bool,
}

impl Scoreboard {
    pub fn new(level_step: u64) -> Self {
        Self {
            score: 0,
            level: 1,
            level_step,
            over: false,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Add points; returns true when the level increased this call.
    /// No-op once the run is over.
    pub fn award(&mut self, points: u64) -> bool {
        if self.over {
            return false;
        }
        self.score += points;
        if self.level_step == 0 {
            return false;
        }
        let target = 1 + (self.score / self.level_step) as u32;
        if target > self.level {
            self.level = target;
            true
        } else {
            false
        }
    }

    /// Latch the end of the run. Returns true only the first time, so the
    /// caller emits the game-over callback exactly once.
    pub fn declare_game_over(&mut self) -> bool {
        if self.over {
            false
        } else {
            self.over = true;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_thresholds() {
        let mut board = Scoreboard::new(2500);
        assert_eq!(board.level(), 1);
        assert!(!board.award(2499));
        assert_eq!(board.level(), 1);
        assert!(board.award(1));
        assert_eq!(board.level(), 2);
        // Crossing two thresholds in one award still lands on the right level
        assert!(board.award(5000));
        assert_eq!(board.level(), 4);
    }

    #[test]
    fn test_game_over_idempotent() {
        let mut board = Scoreboard::new(0);
        board.award(300);
        assert!(board.declare_game_over());
        assert!(!board.declare_game_over());
        // Frozen after the run ends
        board.award(1000);
        assert_eq!(board.score(), 300);
    }

    proptest! {
        #[test]
        fn prop_score_monotone(awards in proptest::collection::vec(0u64..10_000, 0..64)) {
            let mut board = Scoreboard::new(2500);
            let mut last_score = 0;
            let mut last_level = 1;
            for points in awards {
                board.award(points);
                prop_assert!(board.score() >= last_score);
                prop_assert!(board.level() >= last_level);
                last_score = board.score();
                last_level = board.level();
            }
        }
    }
}
