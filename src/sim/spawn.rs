//! Spawning policy: Bernoulli trials, population caps, placement helpers,
//! and the monotone difficulty curves every engine shares.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::EnemyKind;

/// A per-category spawn policy: one trial per tick, capped population
#[derive(Debug, Clone, Copy)]
pub struct SpawnPolicy {
    /// Success probability per tick
    pub chance: f32,
    /// Spawn is a no-op at or above this population
    pub cap: usize,
}

impl SpawnPolicy {
    pub const fn new(chance: f32, cap: usize) -> Self {
        Self { chance, cap }
    }

    /// Run this tick's trial. Zero or one spawn per category per tick.
    pub fn roll(&self, rng: &mut Pcg32, population: usize) -> bool {
        population < self.cap && rng.random::<f32>() < self.chance
    }
}

/// A spawn point on the off-screen ring around the viewport
pub fn edge_spawn(rng: &mut Pcg32, bounds: Vec2, margin: f32) -> Vec2 {
    match rng.random_range(0..4u32) {
        0 => Vec2::new(rng.random::<f32>() * bounds.x, -margin),
        1 => Vec2::new(bounds.x + margin, rng.random::<f32>() * bounds.y),
        2 => Vec2::new(rng.random::<f32>() * bounds.x, bounds.y + margin),
        _ => Vec2::new(-margin, rng.random::<f32>() * bounds.y),
    }
}

/// A spawn point above the top edge (vertical scrollers)
pub fn top_spawn(rng: &mut Pcg32, width: f32, clearance: f32) -> Vec2 {
    Vec2::new(rng.random::<f32>() * width, -clearance)
}

/// Uniform pick over the enabled archetype set
pub fn pick_enemy_kind(rng: &mut Pcg32) -> EnemyKind {
    EnemyKind::ALL[rng.random_range(0..EnemyKind::ALL.len())]
}

/// Enemy health multiplier for a difficulty level (monotone in level)
pub fn health_multiplier(level: u32) -> f32 {
    1.0 + 0.25 * level.saturating_sub(1) as f32
}

/// Enemy speed multiplier for a difficulty level (monotone in level)
pub fn speed_multiplier(level: u32) -> f32 {
    1.0 + 0.1 * level.saturating_sub(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_cap_blocks_spawn() {
        let mut rng = Pcg32::seed_from_u64(1);
        let policy = SpawnPolicy::new(1.0, 3);
        assert!(policy.roll(&mut rng, 0));
        assert!(policy.roll(&mut rng, 2));
        assert!(!policy.roll(&mut rng, 3));
        assert!(!policy.roll(&mut rng, 10));
    }

    #[test]
    fn test_zero_chance_never_spawns() {
        let mut rng = Pcg32::seed_from_u64(2);
        let policy = SpawnPolicy::new(0.0, 8);
        for _ in 0..1000 {
            assert!(!policy.roll(&mut rng, 0));
        }
    }

    #[test]
    fn test_edge_spawn_is_off_screen() {
        let mut rng = Pcg32::seed_from_u64(3);
        let bounds = Vec2::new(800.0, 600.0);
        for _ in 0..200 {
            let pos = edge_spawn(&mut rng, bounds, 200.0);
            let inside =
                pos.x >= 0.0 && pos.x <= bounds.x && pos.y >= 0.0 && pos.y <= bounds.y;
            assert!(!inside, "spawned inside the viewport at {pos:?}");
        }
    }

    #[test]
    fn test_top_spawn_above_screen() {
        let mut rng = Pcg32::seed_from_u64(4);
        for _ in 0..50 {
            let pos = top_spawn(&mut rng, 800.0, 50.0);
            assert_eq!(pos.y, -50.0);
            assert!((0.0..=800.0).contains(&pos.x));
        }
    }

    #[test]
    fn test_difficulty_monotone() {
        for level in 1..20 {
            assert!(health_multiplier(level + 1) >= health_multiplier(level));
            assert!(speed_multiplier(level + 1) >= speed_multiplier(level));
        }
        assert_eq!(health_multiplier(1), 1.0);
        assert_eq!(speed_multiplier(1), 1.0);
    }

    #[test]
    fn test_archetype_pick_deterministic_per_seed() {
        let picks_a: Vec<_> = {
            let mut rng = Pcg32::seed_from_u64(99);
            (0..16).map(|_| pick_enemy_kind(&mut rng)).collect()
        };
        let picks_b: Vec<_> = {
            let mut rng = Pcg32::seed_from_u64(99);
            (0..16).map(|_| pick_enemy_kind(&mut rng)).collect()
        };
        assert_eq!(picks_a, picks_b);
    }
}
