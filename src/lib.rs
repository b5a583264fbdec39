//! Shadow Arcade - six touch-driven arcade minigames on one simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation framework and the six game engines
//! - `render`: Canvas2D rendering adapters (snapshot consumers)
//! - `highscores`: Per-mode best-score persistence
//! - `advice`: Flavor-text collaborator with hard-coded fallbacks
//! - `audio`: Procedural sound effects keyed by gameplay events

pub mod advice;
pub mod audio;
pub mod highscores;
pub mod mode;
pub mod render;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use mode::GameMode;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the tuning baseline of all six games)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// How far outside the play area a projectile may travel before removal
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Player defaults shared by the arena shooters
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along an angle
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle of the vector from `from` toward `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}
