//! STRIKE: top-down arena shooter
//!
//! The player holds the center of a viewport-sized arena against waves of
//! archetyped enemies spawned on an off-screen ring. Rifle/shotgun with
//! cooldowns, a dash with invulnerability frames, explosive barrels, and
//! pickup drops. Difficulty scales with level, which scales with score.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{angle_between, unit_from_angle};

use super::ai::{self, AiState};
use super::collision::{DamagePool, circles_overlap, out_of_bounds, within_range};
use super::entity::{
    Barrel, EnemyKind, Fighter, FloatingText, IdGen, Particle, Pickup, PickupKind, Projectile,
    ProjectileOwner, Weapon, burst, push_particle, update_particles, update_texts,
};
use super::events::GameEvent;
use super::score::Scoreboard;
use super::spawn::{self, SpawnPolicy};

pub const PLAYER_SPEED: f32 = 360.0;

pub const DODGE_DURATION: f32 = 0.25;
pub const DODGE_COOLDOWN: f32 = 1.8;
pub const DODGE_SPEED: f32 = 1080.0;

pub const RIFLE_COOLDOWN: f32 = 0.1;
pub const RIFLE_DAMAGE: f32 = 25.0;
pub const RIFLE_SHOT_SPEED: f32 = 1440.0;
pub const SHOTGUN_COOLDOWN: f32 = 0.45;
pub const SHOTGUN_DAMAGE: f32 = 15.0;
pub const SHOTGUN_SHOT_SPEED: f32 = 1200.0;
const SHOTGUN_SPREAD: f32 = 0.12;

/// Chase speed: base plus a score-proportional ramp (monotone difficulty)
const ENEMY_BASE_SPEED: f32 = 90.0;
const ENEMY_SPEED_PER_POINT: f32 = 0.0075;
const ENEMY_SHOT_DAMAGE: f32 = 8.0;
const ENEMY_SHOT_SPEED: f32 = 420.0;
/// Contact damage while touching an enemy (HP per second at level 1)
const CONTACT_DPS: f32 = 30.0;

const ENEMY_SPAWNS: SpawnPolicy = SpawnPolicy::new(0.008, 8);
const BARREL_SPAWNS: SpawnPolicy = SpawnPolicy::new(0.002, 3);
const SPAWN_MARGIN: f32 = 200.0;

const BARREL_HEALTH: f32 = 20.0;
const BARREL_HIT_RADIUS: f32 = 25.0;
const BLAST_RADIUS: f32 = 250.0;
const BLAST_DAMAGE: f32 = 300.0;
const BLAST_PLAYER_DAMAGE: f32 = 30.0;
const BARREL_KILL_SCORE: u64 = 150;

const PICKUP_DROP_CHANCE: f32 = 0.3;
const PICKUP_RADIUS: f32 = 12.0;
/// Pickup life decay per second (expires unclaimed after ~8 s)
const PICKUP_DECAY: f32 = 0.12;
const HEAL_AMOUNT: f32 = 25.0;
const COIN_SCORE: u64 = 100;
const SLOWMO_DURATION: f32 = 4.0;
const SLOWMO_FACTOR: f32 = 0.4;

pub const LEVEL_STEP: u64 = 2500;

/// Input snapshot for one tick; read-only during the tick
#[derive(Debug, Clone, Default)]
pub struct StrikeInput {
    /// Joystick vector (any length; normalized before use)
    pub move_dir: Option<Vec2>,
    /// Aim angle override while firing
    pub aim: Option<f32>,
    /// Fire button held
    pub fire: bool,
    /// Dash swipe direction (one-shot)
    pub dodge: Option<Vec2>,
    /// Weapon toggle (one-shot)
    pub switch_weapon: bool,
}

/// Kill-streak tracker, HUD-only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KillStreak {
    pub count: u32,
    pub text: String,
    pub life: f32,
    last_kill: f32,
}

impl KillStreak {
    fn record_kill(&mut self, now: f32) {
        self.count += 1;
        self.last_kill = now;
        self.text = match self.count {
            2 => "DOUBLE KILL!",
            3 => "TRIPLE KILL!",
            5 => "RAMPAGE!!",
            n if n >= 7 => "GODLIKE!!!",
            _ => "",
        }
        .to_string();
        if !self.text.is_empty() {
            self.life = 1.0;
        }
    }

    fn decay(&mut self, now: f32, dt: f32) {
        if self.life > 0.0 {
            self.life = (self.life - 0.9 * dt).max(0.0);
        }
        if self.count > 0 && now - self.last_kill > 4.0 {
            self.count = 0;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrikeState {
    pub seed: u64,
    pub rng: Pcg32,
    pub time_ticks: u64,
    /// Play area (viewport) size; updated between ticks on resize
    pub bounds: Vec2,

    pub player: Fighter,
    pub weapon: Weapon,
    pub last_shot: f32,
    dodge_dir: Vec2,
    dodge_until: f32,
    dodge_last_used: f32,
    pub slowmo_until: f32,

    pub enemies: Vec<Fighter>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub barrels: Vec<Barrel>,
    #[serde(skip)]
    pub particles: Vec<Particle>,
    #[serde(skip)]
    pub texts: Vec<FloatingText>,
    pub streak: KillStreak,

    pub board: Scoreboard,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    ids: IdGen,
}

impl StrikeState {
    pub fn new(seed: u64, bounds: Vec2) -> Self {
        let mut ids = IdGen::default();
        let player = Fighter::new(
            ids.next(),
            bounds * 0.5,
            PLAYER_RADIUS,
            PLAYER_MAX_HEALTH,
        );
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            bounds,
            player,
            weapon: Weapon::Rifle,
            last_shot: -1.0,
            dodge_dir: Vec2::ZERO,
            dodge_until: 0.0,
            dodge_last_used: -10.0,
            slowmo_until: 0.0,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            barrels: Vec::new(),
            particles: Vec::new(),
            texts: Vec::new(),
            streak: KillStreak::default(),
            board: Scoreboard::new(LEVEL_STEP),
            events: Vec::new(),
            ids,
        }
    }

    /// Sim time in seconds; every cooldown compares against this
    pub fn time(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    pub fn is_dodging(&self) -> bool {
        self.time() < self.dodge_until
    }

    pub fn dodge_cooldown_fraction(&self) -> f32 {
        ((self.time() - self.dodge_last_used) / DODGE_COOLDOWN).clamp(0.0, 1.0)
    }

    /// Apply a viewport change; runs between ticks only
    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
        let r = self.player.radius;
        self.player.pos = self
            .player
            .pos
            .clamp(Vec2::splat(r), bounds - Vec2::splat(r));
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn announce(&mut self, pos: Vec2, text: &str, color: u32, large: bool) {
        self.texts.push(FloatingText {
            pos,
            text: text.to_string(),
            color,
            life: 1.0,
            large,
        });
    }
}

fn fire_weapon(state: &mut StrikeState, now: f32) {
    let origin = state.player.pos;
    let aim = state.player.facing;
    state.last_shot = now;
    match state.weapon {
        Weapon::Rifle => {
            let id = state.ids.next();
            state.projectiles.push(Projectile {
                id,
                pos: origin,
                vel: unit_from_angle(aim) * RIFLE_SHOT_SPEED,
                damage: RIFLE_DAMAGE,
                owner: ProjectileOwner::Player,
                color: 10,
                born: state.time_ticks,
            });
        }
        Weapon::Shotgun => {
            for i in -2..=2 {
                let id = state.ids.next();
                let theta = aim + i as f32 * SHOTGUN_SPREAD;
                state.projectiles.push(Projectile {
                    id,
                    pos: origin,
                    vel: unit_from_angle(theta) * SHOTGUN_SHOT_SPEED,
                    damage: SHOTGUN_DAMAGE,
                    owner: ProjectileOwner::Player,
                    color: 11,
                    born: state.time_ticks,
                });
            }
        }
    }
    state.events.push(GameEvent::Shoot);
}

/// Advance the arena by one fixed timestep
pub fn tick(state: &mut StrikeState, input: &StrikeInput, dt: f32) {
    if state.board.is_over() {
        return;
    }
    state.time_ticks += 1;
    let now = state.time();
    let level = state.board.level();
    let level_mult = spawn::speed_multiplier(level);
    let slowmo = if now < state.slowmo_until {
        SLOWMO_FACTOR
    } else {
        1.0
    };

    for enemy in &mut state.enemies {
        enemy.hit_flash = (enemy.hit_flash - 9.0 * dt).max(0.0);
    }
    state.streak.decay(now, dt);

    // Player movement (input snapshot is read-only)
    if state.is_dodging() {
        state.player.pos += state.dodge_dir * DODGE_SPEED * dt;
        if state.time_ticks % 2 == 0 {
            push_particle(
                &mut state.particles,
                Particle {
                    pos: state.player.pos,
                    vel: Vec2::ZERO,
                    color: 12,
                    life: 0.6,
                    size: 15.0,
                },
            );
        }
    } else if let Some(dir) = input.move_dir {
        if dir.length_squared() > 1.0 {
            let dir = dir.normalize();
            state.player.pos += dir * PLAYER_SPEED * dt;
            if !input.fire {
                state.player.facing = dir.y.atan2(dir.x);
            }
        }
    }
    if let Some(aim) = input.aim {
        state.player.facing = aim;
    }

    if let Some(swipe) = input.dodge {
        if swipe.length_squared() > 0.0 && now - state.dodge_last_used >= DODGE_COOLDOWN {
            state.dodge_dir = swipe.normalize();
            state.dodge_until = now + DODGE_DURATION;
            state.dodge_last_used = now;
            state.events.push(GameEvent::LevelUp { level });
            let pos = state.player.pos - Vec2::new(0.0, 50.0);
            state.announce(pos, "DASH!", 12, true);
        }
    }
    if input.switch_weapon {
        state.weapon = state.weapon.toggled();
        state.events.push(GameEvent::Pickup);
        let label = format!("UPGRADE: {}", state.weapon.label());
        let pos = state.player.pos - Vec2::new(0.0, 40.0);
        state.announce(pos, &label, 13, true);
    }
    let r = state.player.radius;
    state.player.pos = state
        .player
        .pos
        .clamp(Vec2::splat(r), state.bounds - Vec2::splat(r));

    // Firing, cooldown-gated
    let cooldown = match state.weapon {
        Weapon::Rifle => RIFLE_COOLDOWN,
        Weapon::Shotgun => SHOTGUN_COOLDOWN,
    };
    if input.fire && !state.is_dodging() && now - state.last_shot >= cooldown {
        fire_weapon(state, now);
    }

    // Advance projectiles, particles, texts, pickup timers
    let dodging = state.is_dodging();
    for proj in &mut state.projectiles {
        let scale = match proj.owner {
            ProjectileOwner::Player => 1.0,
            ProjectileOwner::Enemy(_) => slowmo,
        };
        proj.pos += proj.vel * scale * dt;
    }
    let bounds = state.bounds;
    state
        .projectiles
        .retain(|p| !out_of_bounds(p.pos, bounds, OFFSCREEN_MARGIN));
    update_particles(&mut state.particles, dt);
    update_texts(&mut state.texts, dt);
    for pickup in &mut state.pickups {
        pickup.life -= PICKUP_DECAY * dt;
    }
    state.pickups.retain(|p| p.life > 0.0);

    // Enemy behavior: chase, and fire when in range off cooldown
    let player_pos = state.player.pos;
    let chase_base = ENEMY_BASE_SPEED + state.board.score() as f32 * ENEMY_SPEED_PER_POINT;
    let mut enemy_shots: Vec<(Vec2, f32, u32)> = Vec::new();
    for enemy in &mut state.enemies {
        let arch = enemy.kind.unwrap_or(EnemyKind::Standard).archetype();
        enemy.facing = angle_between(enemy.pos, player_pos);
        let speed = chase_base * arch.speed_mult * level_mult * slowmo;
        enemy.pos += ai::chase_velocity(enemy.pos, player_pos, speed) * dt;

        let dist = enemy.pos.distance(player_pos);
        if ai::ranged_attack_ready(dist, arch.attack_range, now, enemy.last_attack, arch.attack_cooldown)
        {
            enemy.last_attack = now;
            enemy.state = AiState::Attacking;
            enemy_shots.push((enemy.pos, enemy.facing, enemy.id));
        } else {
            enemy.state = AiState::Seeking;
        }
    }
    for (pos, theta, owner) in enemy_shots {
        let id = state.ids.next();
        state.projectiles.push(Projectile {
            id,
            pos,
            vel: unit_from_angle(theta) * ENEMY_SHOT_SPEED * level_mult,
            damage: ENEMY_SHOT_DAMAGE * level_mult,
            owner: ProjectileOwner::Enemy(owner),
            color: 14,
            born: state.time_ticks,
        });
    }

    // Collision resolution. Damage accumulates per target across every
    // source this frame; each death threshold is checked exactly once.
    let mut pool = DamagePool::new();
    let mut player_damage = 0.0_f32;
    let mut spent = vec![false; state.projectiles.len()];
    let mut barrel_hits: Vec<(u32, f32)> = Vec::new();
    let mut shot_targets: Vec<u32> = Vec::new();
    let mut impacts: Vec<(Vec2, u32)> = Vec::new();

    for (i, proj) in state.projectiles.iter().enumerate() {
        // Fired this frame: moves now, first collision check next frame
        if proj.born == state.time_ticks {
            continue;
        }
        match proj.owner {
            ProjectileOwner::Player => {
                let mut consumed = false;
                for barrel in &state.barrels {
                    if !barrel.exploded && within_range(proj.pos, barrel.pos, BARREL_HIT_RADIUS) {
                        barrel_hits.push((barrel.id, proj.damage));
                        consumed = true;
                        break;
                    }
                }
                if !consumed {
                    for enemy in &state.enemies {
                        if within_range(proj.pos, enemy.pos, enemy.radius) {
                            let color = enemy.kind.map(|k| k.archetype().color).unwrap_or(0);
                            pool.add(enemy.id, proj.damage);
                            shot_targets.push(enemy.id);
                            impacts.push((proj.pos, color));
                            consumed = true;
                            break;
                        }
                    }
                }
                spent[i] = consumed;
            }
            ProjectileOwner::Enemy(_) => {
                if !dodging && within_range(proj.pos, player_pos, state.player.radius) {
                    player_damage += proj.damage;
                    state.events.push(GameEvent::Damage);
                    spent[i] = true;
                }
            }
        }
    }
    {
        let mut i = 0;
        state.projectiles.retain(|_| {
            let keep = !spent[i];
            i += 1;
            keep
        });
    }
    for (pos, color) in impacts {
        burst(&mut state.particles, &mut state.rng, pos, color, 4, 180.0);
    }

    // Barrels soak projectile damage, then detonate once
    let mut exploded: Vec<(u32, Vec2)> = Vec::new();
    for barrel in &mut state.barrels {
        let total: f32 = barrel_hits
            .iter()
            .filter(|(id, _)| *id == barrel.id)
            .map(|(_, dmg)| dmg)
            .sum();
        if total > 0.0 {
            barrel.health -= total;
            if barrel.health <= 0.0 && !barrel.exploded {
                barrel.exploded = true;
                exploded.push((barrel.id, barrel.pos));
            }
        }
    }
    let mut blast_targets: Vec<u32> = Vec::new();
    for (_, blast_pos) in &exploded {
        state.events.push(GameEvent::Explosion);
        burst(&mut state.particles, &mut state.rng, *blast_pos, 20, 30, 900.0);
        burst(&mut state.particles, &mut state.rng, *blast_pos, 21, 20, 600.0);
        for enemy in &state.enemies {
            if within_range(enemy.pos, *blast_pos, BLAST_RADIUS) {
                pool.add(enemy.id, BLAST_DAMAGE);
                blast_targets.push(enemy.id);
            }
        }
        if within_range(player_pos, *blast_pos, BLAST_RADIUS) {
            player_damage += BLAST_PLAYER_DAMAGE;
            state.events.push(GameEvent::Damage);
        }
    }
    state.barrels.retain(|b| !b.exploded);

    // Settle enemy damage: one death check, one score award per death.
    // Pickup drops are deferred past the collection pass so a drop cannot
    // be collected the frame it appears.
    let mut drops: Vec<(PickupKind, Vec2)> = Vec::new();
    let dead = pool.settle(&mut state.enemies);
    for corpse in &dead {
        let arch = corpse.kind.unwrap_or(EnemyKind::Standard).archetype();
        let points = if shot_targets.contains(&corpse.id) {
            arch.kill_score
        } else if blast_targets.contains(&corpse.id) {
            BARREL_KILL_SCORE
        } else {
            arch.kill_score
        };
        let leveled = state.board.award(points);
        state.events.push(GameEvent::Explosion);
        burst(
            &mut state.particles,
            &mut state.rng,
            corpse.pos,
            arch.color,
            12,
            360.0,
        );
        state.streak.record_kill(now);
        if state.rng.random::<f32>() < PICKUP_DROP_CHANCE {
            let roll = state.rng.random::<f32>();
            let kind = if roll < 0.2 {
                PickupKind::SlowMo
            } else if roll < 0.5 {
                PickupKind::Coin
            } else {
                PickupKind::Heal
            };
            drops.push((kind, corpse.pos));
        }
        if leveled {
            let level = state.board.level();
            state.events.push(GameEvent::LevelUp { level });
            let center = state.bounds * 0.5;
            state.announce(center, &format!("LEVEL {level}"), 15, true);
        }
    }

    // Contact damage from surviving enemies
    if !dodging {
        for enemy in &state.enemies {
            if circles_overlap(enemy.pos, enemy.radius, player_pos, state.player.radius) {
                player_damage += CONTACT_DPS * level_mult * dt;
            }
        }
    }

    // Pickup collection: claimed at most once, removed on claim
    let mut collected: Vec<(PickupKind, Vec2)> = Vec::new();
    let player_radius = state.player.radius;
    state.pickups.retain(|pickup| {
        if circles_overlap(pickup.pos, pickup.radius, player_pos, player_radius) {
            collected.push((pickup.kind, pickup.pos));
            false
        } else {
            true
        }
    });
    for (kind, pos) in collected {
        match kind {
            PickupKind::Heal => {
                state.player.heal(HEAL_AMOUNT);
                state.announce(pos, "+25 HP", 16, true);
            }
            PickupKind::SlowMo => {
                state.slowmo_until = now + SLOWMO_DURATION;
                state.announce(pos, "SLOW MOTION!", 17, true);
            }
            PickupKind::Coin => {
                state.board.award(COIN_SCORE);
                state.announce(pos, "+100 PTS", 13, false);
            }
            // Weapon crates only appear in BATTLE mode
            PickupKind::Rifle | PickupKind::Shotgun => {}
        }
        state.events.push(GameEvent::Pickup);
        burst(&mut state.particles, &mut state.rng, pos, 18, 10, 240.0);
    }
    for (kind, pos) in drops {
        let id = state.ids.next();
        state.pickups.push(Pickup {
            id,
            pos,
            radius: PICKUP_RADIUS,
            kind,
            life: 1.0,
        });
    }

    // All player damage lands at once, then one death check
    if player_damage > 0.0 {
        state.player.health = (state.player.health - player_damage).max(0.0);
        state.player.hit_flash = 1.0;
    }
    if state.player.is_dead() && state.board.declare_game_over() {
        state.events.push(GameEvent::GameOver {
            score: state.board.score(),
        });
        return;
    }

    // Spawn trials, one per category
    if ENEMY_SPAWNS.roll(&mut state.rng, state.enemies.len()) {
        let pos = spawn::edge_spawn(&mut state.rng, state.bounds, SPAWN_MARGIN);
        let kind = spawn::pick_enemy_kind(&mut state.rng);
        let id = state.ids.next();
        state
            .enemies
            .push(Fighter::enemy(id, pos, kind, spawn::health_multiplier(level)));
    }
    if BARREL_SPAWNS.roll(&mut state.rng, state.barrels.len()) {
        let margin = 100.0;
        let pos = Vec2::new(
            margin + state.rng.random::<f32>() * (state.bounds.x - 2.0 * margin),
            margin + state.rng.random::<f32>() * (state.bounds.y - 2.0 * margin),
        );
        let id = state.ids.next();
        state.barrels.push(Barrel {
            id,
            pos,
            health: BARREL_HEALTH,
            exploded: false,
        });
    }

    // Deterministic iteration order
    state.enemies.sort_by_key(|e| e.id);
    state.projectiles.sort_by_key(|p| p.id);
    state.pickups.sort_by_key(|p| p.id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> StrikeState {
        StrikeState::new(12345, Vec2::new(800.0, 600.0))
    }

    fn place_enemy(state: &mut StrikeState, pos: Vec2, health: f32) -> u32 {
        let id = state.ids.next();
        let mut enemy = Fighter::enemy(id, pos, EnemyKind::Standard, 1.0);
        enemy.health = health;
        enemy.max_health = health;
        state.enemies.push(enemy);
        id
    }

    #[test]
    fn test_kill_awards_score_once() {
        let mut state = test_state();
        let enemy_id = place_enemy(&mut state, Vec2::new(400.0, 100.0), 25.0);
        // Two projectiles overlap the enemy on the same frame
        for _ in 0..2 {
            let id = state.ids.next();
            state.projectiles.push(Projectile {
                id,
                pos: Vec2::new(400.0, 100.0),
                vel: Vec2::ZERO,
                damage: 25.0,
                owner: ProjectileOwner::Player,
                color: 10,
                born: 0,
            });
        }
        tick(&mut state, &StrikeInput::default(), SIM_DT);
        // One kill, one award
        assert_eq!(state.board.score(), 100);
        assert!(state.enemies.iter().all(|e| e.id != enemy_id));
        // Both projectiles were consumed by the collision pass
        assert!(state.projectiles.iter().all(|p| p.owner != ProjectileOwner::Player));
    }

    #[test]
    fn test_projectile_out_of_bounds_removed() {
        let mut state = test_state();
        let id = state.ids.next();
        state.projectiles.push(Projectile {
            id,
            pos: Vec2::new(-150.0, 300.0),
            vel: Vec2::ZERO,
            damage: 25.0,
            owner: ProjectileOwner::Player,
            color: 10,
            born: 0,
        });
        tick(&mut state, &StrikeInput::default(), SIM_DT);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_pickup_claimed_exactly_once() {
        let mut state = test_state();
        state.player.health = 50.0;
        let id = state.ids.next();
        state.pickups.push(Pickup {
            id,
            pos: state.player.pos,
            radius: PICKUP_RADIUS,
            kind: PickupKind::Heal,
            life: 1.0,
        });
        tick(&mut state, &StrikeInput::default(), SIM_DT);
        // Effect applied once and the pickup is gone
        assert_eq!(state.player.health, 75.0);
        assert!(state.pickups.is_empty());
        let pickups = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Pickup))
            .count();
        assert_eq!(pickups, 1);
    }

    #[test]
    fn test_heal_never_exceeds_max() {
        let mut state = test_state();
        state.player.health = 90.0;
        let id = state.ids.next();
        state.pickups.push(Pickup {
            id,
            pos: state.player.pos,
            radius: PICKUP_RADIUS,
            kind: PickupKind::Heal,
            life: 1.0,
        });
        tick(&mut state, &StrikeInput::default(), SIM_DT);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_game_over_declared_once() {
        let mut state = test_state();
        state.player.health = 1.0;
        let id = state.ids.next();
        state.projectiles.push(Projectile {
            id,
            pos: state.player.pos,
            vel: Vec2::ZERO,
            damage: 50.0,
            owner: ProjectileOwner::Enemy(999),
            color: 14,
            born: 0,
        });
        tick(&mut state, &StrikeInput::default(), SIM_DT);
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        let score = state.board.score();
        let ticks = state.time_ticks;

        // Further ticks are inert: no new events, frozen score and clock
        tick(&mut state, &StrikeInput::default(), SIM_DT);
        assert!(state.drain_events().is_empty());
        assert_eq!(state.board.score(), score);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = test_state();
        let input = StrikeInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        let after_one = state.projectiles.len();
        assert_eq!(after_one, 1);
        // Rifle cooldown is 0.1 s = 6 ticks; the very next tick must not fire
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.projectiles.len(), after_one);
    }

    #[test]
    fn test_dodge_grants_invulnerability() {
        let mut state = test_state();
        let input = StrikeInput {
            dodge: Some(Vec2::new(1.0, 0.0)),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.is_dodging());

        // An enemy projectile sitting on the player passes through
        let id = state.ids.next();
        state.projectiles.push(Projectile {
            id,
            pos: state.player.pos,
            vel: Vec2::ZERO,
            damage: 50.0,
            owner: ProjectileOwner::Enemy(999),
            color: 14,
            born: 0,
        });
        tick(&mut state, &StrikeInput::default(), SIM_DT);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_determinism() {
        let mut a = test_state();
        let mut b = test_state();
        let input = StrikeInput {
            move_dir: Some(Vec2::new(1.0, 0.3)),
            fire: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.board.score(), b.board.score());
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.player.pos, b.player.pos);
    }

    #[test]
    fn test_no_dead_enemy_survives_a_tick() {
        let mut state = test_state();
        for i in 0..4 {
            place_enemy(&mut state, Vec2::new(100.0 + i as f32 * 60.0, 100.0), 10.0);
        }
        // Blanket the row with lethal projectiles
        for i in 0..4 {
            let id = state.ids.next();
            state.projectiles.push(Projectile {
                id,
                pos: Vec2::new(100.0 + i as f32 * 60.0, 100.0),
                vel: Vec2::ZERO,
                damage: 50.0,
                owner: ProjectileOwner::Player,
                color: 10,
                born: 0,
            });
        }
        tick(&mut state, &StrikeInput::default(), SIM_DT);
        assert!(state.enemies.iter().all(|e| e.health > 0.0));
    }
}
