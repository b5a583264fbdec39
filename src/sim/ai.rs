//! Enemy behavior: seek, patrol, and cooldown-gated ranged attacks
//!
//! Small pure helpers; the engines own the state machines. An enemy's
//! state is one of {Seeking, Patrolling, Attacking, Dead}; Dead is
//! terminal and handled by removal/decay in the engines.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Seeking,
    Patrolling,
    Attacking,
    Dead,
}

/// Chase velocity: unit vector toward the target scaled by speed.
/// Zero when already on top of the target.
pub fn chase_velocity(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    (to - from).normalize_or_zero() * speed
}

/// Ranged attack gate: in engagement range AND cooldown elapsed
pub fn ranged_attack_ready(
    dist: f32,
    range: f32,
    now: f32,
    last_attack: f32,
    cooldown: f32,
) -> bool {
    dist < range && now - last_attack >= cooldown
}

/// Move toward a wander waypoint; re-roll the waypoint on arrival.
/// Returns the facing angle.
pub fn wander_step(
    pos: &mut Vec2,
    target: &mut Vec2,
    speed: f32,
    dt: f32,
    rng: &mut Pcg32,
    map: Vec2,
) -> f32 {
    let delta = *target - *pos;
    if delta.length() < 10.0 {
        *target = Vec2::new(rng.random::<f32>() * map.x, rng.random::<f32>() * map.y);
    } else {
        let dir = delta.normalize_or_zero();
        *pos += dir * speed * dt;
        return dir.y.atan2(dir.x);
    }
    delta.y.atan2(delta.x)
}

/// How close a foot must be to a platform top to count as supported
const FOOT_SNAP: f32 = 10.0;

/// Foot-sensor check: both bottom corners must be over solid ground.
/// A patroller reverses when this fails (it would walk off the edge).
pub fn feet_supported(body: &Aabb, platforms: &[Aabb]) -> bool {
    let bottom = body.max().y;
    let left_foot = body.min.x;
    let right_foot = body.max().x;

    let supported = |x: f32| {
        platforms.iter().any(|p| {
            x > p.min.x && x < p.max().x && (bottom - p.min.y).abs() < FOOT_SNAP
        })
    };
    supported(left_foot) && supported(right_foot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_chase_velocity_is_normalized() {
        let v = chase_velocity(Vec2::ZERO, Vec2::new(300.0, 400.0), 100.0);
        assert!((v.length() - 100.0).abs() < 0.001);
        assert!(v.x > 0.0 && v.y > 0.0);
        // On top of the target: no movement, no NaN
        assert_eq!(chase_velocity(Vec2::ONE, Vec2::ONE, 100.0), Vec2::ZERO);
    }

    #[test]
    fn test_ranged_attack_gate() {
        // Out of range
        assert!(!ranged_attack_ready(600.0, 500.0, 10.0, 0.0, 2.0));
        // In range but cooling down
        assert!(!ranged_attack_ready(400.0, 500.0, 1.5, 0.0, 2.0));
        // In range, cooldown elapsed
        assert!(ranged_attack_ready(400.0, 500.0, 2.0, 0.0, 2.0));
    }

    #[test]
    fn test_wander_rerolls_on_arrival() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pos = Vec2::new(100.0, 100.0);
        let mut target = Vec2::new(105.0, 100.0);
        wander_step(&mut pos, &mut target, 120.0, 1.0 / 60.0, &mut rng, Vec2::splat(2000.0));
        assert_ne!(target, Vec2::new(105.0, 100.0));
        // Position untouched on the re-roll tick
        assert_eq!(pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_wander_moves_toward_target() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut pos = Vec2::new(0.0, 0.0);
        let mut target = Vec2::new(600.0, 0.0);
        wander_step(&mut pos, &mut target, 120.0, 1.0 / 60.0, &mut rng, Vec2::splat(2000.0));
        assert!(pos.x > 0.0);
        assert_eq!(pos.y, 0.0);
    }

    #[test]
    fn test_feet_supported_detects_edge() {
        let platform = Aabb::new(0.0, 100.0, 200.0, 30.0);
        // Fully on the platform
        let body = Aabb::new(50.0, 58.0, 42.0, 42.0);
        assert!(feet_supported(&body, &[platform]));
        // Right foot past the edge
        let body = Aabb::new(180.0, 58.0, 42.0, 42.0);
        assert!(!feet_supported(&body, &[platform]));
    }
}
