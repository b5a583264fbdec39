//! Entity model shared by the six engines
//!
//! Enemy configuration is a closed archetype set resolved once at spawn
//! time; there are no open-ended per-entity attribute bags.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::AiState;

/// Monotonic entity-id allocator, one per game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdGen {
    next: u32,
}

impl Default for IdGen {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGen {
    pub fn next(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Enemy archetypes for the arena shooter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Standard,
    Runner,
    Tank,
    Sniper,
    Sprinter,
    Heavy,
}

/// Fixed attribute tuple an archetype resolves to at spawn time
#[derive(Debug, Clone, Copy)]
pub struct Archetype {
    pub radius: f32,
    pub base_health: f32,
    pub speed_mult: f32,
    /// Ranged engagement range (px)
    pub attack_range: f32,
    /// Minimum seconds between ranged attacks
    pub attack_cooldown: f32,
    pub kill_score: u64,
    /// Palette index for rendering
    pub color: u32,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Standard,
        EnemyKind::Runner,
        EnemyKind::Tank,
        EnemyKind::Sniper,
        EnemyKind::Sprinter,
        EnemyKind::Heavy,
    ];

    pub fn archetype(self) -> Archetype {
        match self {
            EnemyKind::Standard => Archetype {
                radius: 18.0,
                base_health: 50.0,
                speed_mult: 1.0,
                attack_range: 500.0,
                attack_cooldown: 2.5,
                kill_score: 100,
                color: 0,
            },
            EnemyKind::Runner => Archetype {
                radius: 14.0,
                base_health: 30.0,
                speed_mult: 1.8,
                attack_range: 350.0,
                attack_cooldown: 3.0,
                kill_score: 100,
                color: 1,
            },
            EnemyKind::Tank => Archetype {
                radius: 30.0,
                base_health: 180.0,
                speed_mult: 0.6,
                attack_range: 550.0,
                attack_cooldown: 2.0,
                kill_score: 100,
                color: 2,
            },
            EnemyKind::Sniper => Archetype {
                radius: 16.0,
                base_health: 45.0,
                speed_mult: 1.0,
                attack_range: 900.0,
                attack_cooldown: 1.2,
                kill_score: 100,
                color: 3,
            },
            EnemyKind::Sprinter => Archetype {
                radius: 12.0,
                base_health: 25.0,
                speed_mult: 2.8,
                attack_range: 250.0,
                attack_cooldown: 3.5,
                kill_score: 100,
                color: 4,
            },
            EnemyKind::Heavy => Archetype {
                radius: 38.0,
                base_health: 450.0,
                speed_mult: 0.35,
                attack_range: 650.0,
                attack_cooldown: 1.8,
                kill_score: 500,
                color: 5,
            },
        }
    }
}

/// A combat entity: the player, an arena enemy, or a battle bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fighter {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    /// Facing angle in radians
    pub facing: f32,
    /// Enemy archetype; None for the player and battle bots
    pub kind: Option<EnemyKind>,
    /// Sim-time of the last ranged attack (cooldown gate)
    pub last_attack: f32,
    /// Behavior state; Dead is handled by removal or decay timers
    #[serde(default)]
    pub state: AiState,
    /// Cosmetic white-flash timer, decays each tick
    #[serde(skip)]
    pub hit_flash: f32,
}

impl Fighter {
    pub fn new(id: u32, pos: Vec2, radius: f32, health: f32) -> Self {
        Self {
            id,
            pos,
            radius,
            health,
            max_health: health,
            facing: 0.0,
            kind: None,
            last_attack: 0.0,
            state: AiState::Seeking,
            hit_flash: 0.0,
        }
    }

    /// Spawn an enemy of the given archetype, health scaled by the current
    /// level multiplier.
    pub fn enemy(id: u32, pos: Vec2, kind: EnemyKind, health_mult: f32) -> Self {
        let arch = kind.archetype();
        let health = arch.base_health * health_mult;
        Self {
            kind: Some(kind),
            ..Self::new(id, pos, arch.radius, health)
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Heal, clamped to max_health (the only way health increases)
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

/// Who fired a projectile; a projectile never harms its own side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileOwner {
    Player,
    Enemy(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub owner: ProjectileOwner,
    /// Palette index for rendering
    pub color: u32,
    /// Tick the projectile was fired on; it moves that frame but its first
    /// collision check happens the following frame
    #[serde(default)]
    pub born: u64,
}

/// Player weapons shared by the two shooter modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Weapon {
    #[default]
    Rifle,
    Shotgun,
}

impl Weapon {
    pub fn toggled(self) -> Weapon {
        match self {
            Weapon::Rifle => Weapon::Shotgun,
            Weapon::Shotgun => Weapon::Rifle,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Weapon::Rifle => "RIFLE",
            Weapon::Shotgun => "SHOTGUN",
        }
    }
}

/// Transient world object granting an effect on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Heal,
    SlowMo,
    Coin,
    Rifle,
    Shotgun,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: PickupKind,
    /// Remaining life in [0, 1]; expired pickups are removed unclaimed
    pub life: f32,
}

/// Falling/scrolling rectangular hazard (RACER and GRAVITY modes)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub aabb: super::collision::Aabb,
    /// Scroll speed in px/s along the mode's travel axis
    pub speed: f32,
}

/// Destructible explosive barrel (STRIKE mode)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barrel {
    pub id: u32,
    pub pos: Vec2,
    pub health: f32,
    pub exploded: bool,
}

/// Maximum cosmetic particles kept alive at once
pub const MAX_PARTICLES: usize = 256;

/// A particle for visual effects; carries no gameplay state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Palette index for rendering
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Rising score/announcement text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: u32,
    pub life: f32,
    pub large: bool,
}

/// Push a particle, evicting the oldest when the budget is full
pub fn push_particle(particles: &mut Vec<Particle>, particle: Particle) {
    if particles.len() >= MAX_PARTICLES {
        particles.remove(0);
    }
    particles.push(particle);
}

/// Spawn a radial burst of particles at a point
pub fn burst(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    pos: Vec2,
    color: u32,
    count: usize,
    spread_speed: f32,
) {
    for _ in 0..count {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * spread_speed,
            (rng.random::<f32>() - 0.5) * spread_speed,
        );
        push_particle(
            particles,
            Particle {
                pos,
                vel,
                color,
                life: 1.0,
                size: 1.0 + rng.random::<f32>() * 2.0,
            },
        );
    }
}

/// Particle life decay per second (~0.4 s lifetime)
const PARTICLE_DECAY: f32 = 2.4;
/// Floating text decay per second and rise speed
const TEXT_DECAY: f32 = 1.2;
const TEXT_RISE: f32 = 60.0;

/// Advance and cull cosmetic particles
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel * dt;
        p.life -= PARTICLE_DECAY * dt;
    }
    particles.retain(|p| p.life > 0.0);
}

/// Advance and cull floating texts
pub fn update_texts(texts: &mut Vec<FloatingText>, dt: f32) {
    for t in texts.iter_mut() {
        t.pos.y -= TEXT_RISE * dt;
        t.life -= TEXT_DECAY * dt;
    }
    texts.retain(|t| t.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_id_gen_monotonic() {
        let mut ids = IdGen::default();
        let a = ids.next();
        let b = ids.next();
        assert!(b > a);
        assert_eq!(a, 1);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut f = Fighter::new(1, Vec2::ZERO, 20.0, 100.0);
        f.health = 90.0;
        f.heal(25.0);
        assert_eq!(f.health, 100.0);
    }

    #[test]
    fn test_enemy_spawn_scales_health() {
        let e = Fighter::enemy(1, Vec2::ZERO, EnemyKind::Tank, 1.5);
        assert_eq!(e.radius, 30.0);
        assert_eq!(e.health, 270.0);
        assert_eq!(e.max_health, 270.0);
        assert_eq!(e.kind, Some(EnemyKind::Tank));
    }

    #[test]
    fn test_particle_budget_evicts_oldest() {
        let mut particles = Vec::new();
        for i in 0..(MAX_PARTICLES + 10) {
            push_particle(
                &mut particles,
                Particle {
                    pos: Vec2::new(i as f32, 0.0),
                    vel: Vec2::ZERO,
                    color: 0,
                    life: 1.0,
                    size: 1.0,
                },
            );
        }
        assert_eq!(particles.len(), MAX_PARTICLES);
        // The first 10 were evicted
        assert_eq!(particles[0].pos.x, 10.0);
    }

    #[test]
    fn test_particles_expire() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut particles = Vec::new();
        burst(&mut particles, &mut rng, Vec2::ZERO, 0, 8, 100.0);
        assert_eq!(particles.len(), 8);
        for _ in 0..60 {
            update_particles(&mut particles, 1.0 / 60.0);
        }
        assert!(particles.is_empty());
    }
}
