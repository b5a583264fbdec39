//! Rendering boundary
//!
//! The simulation hands renderers an immutable borrow of its state - that
//! borrow is the frame snapshot, and drawing never mutates it. When no
//! drawing surface is available the driver skips the render call for that
//! frame and the simulation carries on.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

/// Shared palette; entities carry indexes into this table
pub fn palette(color: u32) -> &'static str {
    match color {
        // Enemy archetypes
        0 => "#ef4444",  // standard
        1 => "#facc15",  // runner
        2 => "#991b1b",  // tank
        3 => "#a855f7",  // sniper
        4 => "#22d3ee",  // sprinter
        5 => "#ea580c",  // heavy
        // Projectiles and effects
        10 => "#60a5fa", // rifle shot
        11 => "#fbbf24", // shotgun shot
        12 => "#60a5fa", // dash ghost
        13 => "#fbbf24", // coin text
        14 => "#f87171", // enemy shot
        15 => "#facc15", // level banner
        16 => "#4ade80", // heal text
        17 => "#06b6d4", // slow-mo text
        18 => "#ffffff", // pickup sparkle
        20 => "#ff4500", // blast core
        21 => "#ffeb3b", // blast fringe
        22 => "#ffffff", // jump dust
        23 => "#ff4500", // stomp burst
        24 => "#ffd700", // coin sparkle
        _ => "#ffffff",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EnemyKind;

    #[test]
    fn test_archetype_colors_distinct() {
        let mut colors: Vec<_> = EnemyKind::ALL
            .iter()
            .map(|k| palette(k.archetype().color))
            .collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), EnemyKind::ALL.len());
    }
}
