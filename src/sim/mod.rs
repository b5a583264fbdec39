//! Deterministic simulation framework
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies
//!
//! The shared leaf modules (entity, collision, spawn, ai, score) implement
//! the per-frame pattern every minigame repeats; the six engine modules
//! compose them with game-specific tuning.

pub mod ai;
pub mod battle;
pub mod clock;
pub mod collision;
pub mod cosmic;
pub mod entity;
pub mod events;
pub mod gravity;
pub mod platformer;
pub mod racer;
pub mod score;
pub mod spawn;
pub mod strike;

pub use clock::FrameClock;
pub use collision::{Aabb, DamagePool, circles_overlap, within_range};
pub use entity::{
    EnemyKind, Fighter, FloatingText, Particle, Pickup, PickupKind, Projectile, ProjectileOwner,
    Weapon,
};
pub use events::GameEvent;
pub use score::Scoreboard;
