//! Collision detection and damage resolution
//!
//! Pure geometry tests plus the per-frame damage aggregation rule: all
//! damage contributions for a frame are pooled per target, then each
//! target's death threshold is checked exactly once. This is what keeps a
//! double hit from double-counting a kill.

use glam::Vec2;

use super::entity::Fighter;

/// Circle-circle overlap: distance between centers < sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// Flat-threshold proximity test (used where the tuning uses one combined
/// radius, e.g. loot collection)
#[inline]
pub fn within_range(a: Vec2, b: Vec2, range: f32) -> bool {
    a.distance_squared(b) < range * range
}

/// Has a point left the play area by more than `margin` on any side
#[inline]
pub fn out_of_bounds(pos: Vec2, bounds: Vec2, margin: f32) -> bool {
    pos.x < -margin || pos.x > bounds.x + margin || pos.y < -margin || pos.y > bounds.y + margin
}

/// Axis-aligned bounding box, min corner + size
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Rectangles collide iff they overlap on both axes
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }
}

/// Vertical resolution against a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalHit {
    /// Landed on top: snap to the platform top, zero vy, grounded
    Landed,
    /// Hit the underside while rising: snap below, zero vy
    Bumped,
}

/// How far above a platform top the mover's previous trailing edge may be
/// and still count as a landing (thin-platform tunneling guard)
const LAND_TOLERANCE: f32 = 15.0;
/// A head bump requires the mover's top to have been below the underside
/// before the move; anything already inside passes through
const BUMP_TOLERANCE: f32 = 1.0;

/// Directional platform resolution.
///
/// `mover` is the post-integration box, `vy_step` the vertical displacement
/// applied this frame. A downward mover lands only if its bottom edge was
/// at or above the platform top before the move; an upward mover from
/// below passes through unless its top edge was below the platform bottom.
pub fn vertical_hit(mover: &Aabb, vy_step: f32, platform: &Aabb) -> Option<VerticalHit> {
    if !mover.overlaps(platform) {
        return None;
    }
    if vy_step >= 0.0 {
        let prev_bottom = mover.max().y - vy_step;
        if prev_bottom <= platform.min.y + LAND_TOLERANCE {
            return Some(VerticalHit::Landed);
        }
    } else {
        let prev_top = mover.min.y - vy_step;
        if prev_top >= platform.max().y - BUMP_TOLERANCE {
            return Some(VerticalHit::Bumped);
        }
    }
    None
}

/// Continuous out-of-zone damage for this frame; zero inside the zone.
/// Independent of collision detection.
pub fn zone_damage(pos: Vec2, center: Vec2, radius: f32, rate_per_sec: f32, dt: f32) -> f32 {
    if pos.distance(center) > radius {
        rate_per_sec * dt
    } else {
        0.0
    }
}

/// Per-frame damage pool: aggregate first, check death once
#[derive(Debug, Default)]
pub struct DamagePool {
    hits: Vec<(u32, f32)>,
}

impl DamagePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: u32, damage: f32) {
        self.hits.push((target, damage));
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Total damage accumulated against one target this frame
    pub fn total_for(&self, target: u32) -> f32 {
        self.hits
            .iter()
            .filter(|(id, _)| *id == target)
            .map(|(_, dmg)| dmg)
            .sum()
    }

    /// Apply all accumulated damage to the fighters, remove those whose
    /// health crossed zero, and return the removed fighters so the caller
    /// can apply death side effects exactly once each.
    pub fn settle(self, fighters: &mut Vec<Fighter>) -> Vec<Fighter> {
        if self.hits.is_empty() {
            return Vec::new();
        }
        for fighter in fighters.iter_mut() {
            let total: f32 = self
                .hits
                .iter()
                .filter(|(id, _)| *id == fighter.id)
                .map(|(_, dmg)| dmg)
                .sum();
            if total > 0.0 {
                fighter.health = (fighter.health - total).max(0.0);
                fighter.hit_flash = 1.0;
            }
        }
        let mut dead = Vec::new();
        fighters.retain(|f| {
            if f.is_dead() {
                dead.push(f.clone());
                false
            } else {
                true
            }
        });
        dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_circle_collision_example() {
        // Player r=20 at (100,100), enemy r=18 at (130,100): dist 30 < 38
        let player = Vec2::new(100.0, 100.0);
        assert!(circles_overlap(player, 20.0, Vec2::new(130.0, 100.0), 18.0));
        // Enemy at (200,100): dist 100, no collision
        assert!(!circles_overlap(player, 20.0, Vec2::new(200.0, 100.0), 18.0));
    }

    #[test]
    fn test_aabb_overlap_requires_both_axes() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Aabb::new(5.0, 5.0, 10.0, 10.0)));
        // Overlap on x only
        assert!(!a.overlaps(&Aabb::new(5.0, 20.0, 10.0, 10.0)));
        // Overlap on y only
        assert!(!a.overlaps(&Aabb::new(20.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn test_landing_from_above() {
        let platform = Aabb::new(0.0, 100.0, 200.0, 10.0);
        // Falling entity whose bottom was above the top before the move
        let mover = Aabb::new(50.0, 70.0, 30.0, 35.0); // bottom = 105
        let hit = vertical_hit(&mover, 8.0, &platform); // prev bottom 97
        assert_eq!(hit, Some(VerticalHit::Landed));
    }

    #[test]
    fn test_upward_pass_through() {
        let platform = Aabb::new(0.0, 100.0, 200.0, 10.0);
        // Rising entity overlapping mid-platform from below: top was not
        // below the platform bottom far enough to count as a head bump
        let mover = Aabb::new(50.0, 95.0, 30.0, 35.0);
        let hit = vertical_hit(&mover, -8.0, &platform);
        assert_eq!(hit, None);
    }

    #[test]
    fn test_head_bump_from_below() {
        let platform = Aabb::new(0.0, 100.0, 200.0, 20.0);
        // Entity whose top edge was just below the platform underside
        let mover = Aabb::new(50.0, 112.0, 30.0, 35.0); // top = 112
        let hit = vertical_hit(&mover, -10.0, &platform); // prev top 122 >= 120 - 15
        assert_eq!(hit, Some(VerticalHit::Bumped));
    }

    #[test]
    fn test_no_landing_when_falling_through_side() {
        let platform = Aabb::new(0.0, 100.0, 200.0, 10.0);
        // Bottom already well below the top before the move: side contact
        let mover = Aabb::new(50.0, 95.0, 30.0, 35.0); // bottom = 130
        let hit = vertical_hit(&mover, 2.0, &platform); // prev bottom 128
        assert_eq!(hit, None);
    }

    #[test]
    fn test_zone_damage_outside_only() {
        let center = Vec2::ZERO;
        // Player at distance 600 from a radius-500 zone
        let hurt = zone_damage(Vec2::new(600.0, 0.0), center, 500.0, 3.0, 1.0 / 60.0);
        assert!((hurt - 0.05).abs() < 1e-6);
        // At distance 400: unchanged
        let safe = zone_damage(Vec2::new(400.0, 0.0), center, 500.0, 3.0, 1.0 / 60.0);
        assert_eq!(safe, 0.0);
    }

    #[test]
    fn test_out_of_bounds_margin() {
        let bounds = Vec2::new(800.0, 600.0);
        assert!(!out_of_bounds(Vec2::new(-50.0, 300.0), bounds, 100.0));
        assert!(out_of_bounds(Vec2::new(-101.0, 300.0), bounds, 100.0));
        assert!(out_of_bounds(Vec2::new(400.0, 701.0), bounds, 100.0));
    }

    #[test]
    fn test_damage_pool_single_death() {
        let mut fighters = vec![Fighter::new(7, Vec2::ZERO, 18.0, 25.0)];
        let mut pool = DamagePool::new();
        // Two projectiles hit the same enemy on the same frame
        pool.add(7, 25.0);
        pool.add(7, 25.0);
        let dead = pool.settle(&mut fighters);
        assert_eq!(dead.len(), 1);
        assert!(fighters.is_empty());
    }

    #[test]
    fn test_damage_pool_survivor_keeps_flash() {
        let mut fighters = vec![Fighter::new(1, Vec2::ZERO, 18.0, 100.0)];
        let mut pool = DamagePool::new();
        pool.add(1, 30.0);
        let dead = pool.settle(&mut fighters);
        assert!(dead.is_empty());
        assert_eq!(fighters[0].health, 70.0);
        assert!(fighters[0].hit_flash > 0.0);
    }

    proptest! {
        #[test]
        fn prop_settle_never_leaves_dead(damages in proptest::collection::vec((1u32..6, 0.0f32..80.0), 0..32)) {
            let mut fighters: Vec<Fighter> = (1..6)
                .map(|id| Fighter::new(id, Vec2::ZERO, 10.0, 50.0))
                .collect();
            let mut pool = DamagePool::new();
            for (id, dmg) in damages {
                pool.add(id, dmg);
            }
            pool.settle(&mut fighters);
            // No logically-dead fighter survives settlement
            prop_assert!(fighters.iter().all(|f| f.health > 0.0));
        }
    }
}
