//! BATTLE: battle-royale zone survival
//!
//! The player and 19 bots drop onto a 2000x2000 map under a shrinking
//! circular safe zone. Standing outside the zone bleeds health at a fixed
//! rate, for bots just as much as for the player. Last one standing wins.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::unit_from_angle;

use super::ai::{self, AiState};
use super::collision::{DamagePool, out_of_bounds, within_range, zone_damage};
use super::entity::{
    Fighter, IdGen, Pickup, PickupKind, Projectile, ProjectileOwner, Weapon,
};
use super::events::GameEvent;
use super::score::Scoreboard;

pub const MAP_SIZE: f32 = 2000.0;
pub const INITIAL_ZONE_RADIUS: f32 = 1200.0;
const ZONE_SHRINK_RATE: f32 = 9.0;
const ZONE_MIN_RADIUS: f32 = 100.0;
/// Out-of-zone damage, HP per second, applied to every fighter
const ZONE_DPS: f32 = 3.0;

const BOT_COUNT: usize = 19;
const BOT_RADIUS: f32 = 20.0;
const BOT_SPEED: f32 = 120.0;
const BOT_ENGAGE_RANGE: f32 = 400.0;
const BOT_FIRE_COOLDOWN: f32 = 1.5;
const BOT_SHOT_DAMAGE: f32 = 10.0;
const BOT_SHOT_SPEED: f32 = 600.0;

const PLAYER_SPEED: f32 = 300.0;
const RIFLE_COOLDOWN: f32 = 0.15;
const RIFLE_DAMAGE: f32 = 25.0;
const RIFLE_SHOT_SPEED: f32 = 900.0;
const SHOTGUN_COOLDOWN: f32 = 0.5;
const SHOTGUN_DAMAGE: f32 = 15.0;
const SHOTGUN_SHOT_SPEED: f32 = 720.0;
const SHOTGUN_SPREAD: f32 = 0.1;

const LOOT_COUNT: usize = 30;
const LOOT_RADIUS: f32 = 15.0;
/// Flat collection threshold (crate center to player center)
const LOOT_COLLECT_RANGE: f32 = 30.0;
const LOOT_HEAL: f32 = 30.0;

pub const KILL_SCORE: u64 = 100;
pub const SURVIVOR_BONUS: u64 = 1000;

/// A bot: a fighter plus its current wander waypoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub body: Fighter,
    pub target: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct BattleInput {
    pub move_dir: Option<Vec2>,
    pub aim: Option<f32>,
    pub fire: bool,
    pub switch_weapon: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub seed: u64,
    pub rng: Pcg32,
    pub time_ticks: u64,

    pub player: Fighter,
    pub weapon: Weapon,
    pub last_shot: f32,
    pub kills: u32,

    pub bots: Vec<Bot>,
    pub projectiles: Vec<Projectile>,
    pub loot: Vec<Pickup>,

    pub zone_center: Vec2,
    pub zone_radius: f32,

    pub board: Scoreboard,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    ids: IdGen,
}

impl BattleState {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = IdGen::default();
        let center = Vec2::splat(MAP_SIZE / 2.0);
        let player = Fighter::new(ids.next(), center, BOT_RADIUS, PLAYER_MAX_HEALTH);

        let mut bots = Vec::with_capacity(BOT_COUNT);
        for _ in 0..BOT_COUNT {
            let pos = Vec2::new(
                rng.random::<f32>() * MAP_SIZE,
                rng.random::<f32>() * MAP_SIZE,
            );
            let target = Vec2::new(
                rng.random::<f32>() * MAP_SIZE,
                rng.random::<f32>() * MAP_SIZE,
            );
            let mut body = Fighter::new(ids.next(), pos, BOT_RADIUS, PLAYER_MAX_HEALTH);
            body.state = AiState::Patrolling;
            bots.push(Bot { body, target });
        }

        let mut loot = Vec::with_capacity(LOOT_COUNT);
        for _ in 0..LOOT_COUNT {
            let pos = Vec2::new(
                rng.random::<f32>() * MAP_SIZE,
                rng.random::<f32>() * MAP_SIZE,
            );
            let kind = if rng.random::<f32>() > 0.5 {
                PickupKind::Heal
            } else if rng.random::<f32>() > 0.5 {
                PickupKind::Rifle
            } else {
                PickupKind::Shotgun
            };
            loot.push(Pickup {
                id: ids.next(),
                pos,
                radius: LOOT_RADIUS,
                kind,
                life: 1.0,
            });
        }

        Self {
            seed,
            rng,
            time_ticks: 0,
            player,
            weapon: Weapon::Rifle,
            last_shot: -1.0,
            kills: 0,
            bots,
            projectiles: Vec::new(),
            loot,
            zone_center: center,
            zone_radius: INITIAL_ZONE_RADIUS,
            board: Scoreboard::new(0),
            events: Vec::new(),
            ids,
        }
    }

    pub fn time(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    pub fn alive_count(&self) -> usize {
        self.bots.len() + 1
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

fn fire_weapon(state: &mut BattleState, now: f32) {
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

/// Advance the battle by one fixed timestep
pub fn tick(state: &mut BattleState, input: &BattleInput, dt: f32) {
    if state.board.is_over() {
        return;
    }
    state.time_ticks += 1;
    let now = state.time();

    // Player movement, clamped to the map
    if let Some(dir) = input.move_dir {
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
    if input.switch_weapon {
        state.weapon = state.weapon.toggled();
        state.events.push(GameEvent::Pickup);
    }
    let r = state.player.radius;
    state.player.pos = state
        .player
        .pos
        .clamp(Vec2::splat(r), Vec2::splat(MAP_SIZE - r));

    // Firing
    let cooldown = match state.weapon {
        Weapon::Rifle => RIFLE_COOLDOWN,
        Weapon::Shotgun => SHOTGUN_COOLDOWN,
    };
    if input.fire && now - state.last_shot >= cooldown {
        fire_weapon(state, now);
    }

    // Zone shrink, floored at the minimum radius
    state.zone_radius = (state.zone_radius - ZONE_SHRINK_RATE * dt).max(ZONE_MIN_RADIUS);

    // Advance projectiles
    for proj in &mut state.projectiles {
        proj.pos += proj.vel * dt;
    }
    let map = Vec2::splat(MAP_SIZE);
    state
        .projectiles
        .retain(|p| !out_of_bounds(p.pos, map, OFFSCREEN_MARGIN));

    // Bot behavior: wander the map, engage the player in range
    let player_pos = state.player.pos;
    let mut bot_shots: Vec<(Vec2, u32)> = Vec::new();
    for bot in &mut state.bots {
        bot.body.facing = ai::wander_step(
            &mut bot.body.pos,
            &mut bot.target,
            BOT_SPEED,
            dt,
            &mut state.rng,
            map,
        );
        let dist = bot.body.pos.distance(player_pos);
        if ai::ranged_attack_ready(
            dist,
            BOT_ENGAGE_RANGE,
            now,
            bot.body.last_attack,
            BOT_FIRE_COOLDOWN,
        ) {
            bot.body.last_attack = now;
            bot.body.state = AiState::Attacking;
            bot_shots.push((bot.body.pos, bot.body.id));
        } else {
            bot.body.state = AiState::Patrolling;
        }
    }
    for (pos, owner) in bot_shots {
        let theta = crate::angle_between(pos, player_pos);
        let id = state.ids.next();
        state.projectiles.push(Projectile {
            id,
            pos,
            vel: unit_from_angle(theta) * BOT_SHOT_SPEED,
            damage: BOT_SHOT_DAMAGE,
            owner: ProjectileOwner::Enemy(owner),
            color: 14,
            born: state.time_ticks,
        });
    }

    // Collision resolution with per-target damage pooling
    let mut pool = DamagePool::new();
    let mut player_damage = 0.0_f32;
    let mut spent = vec![false; state.projectiles.len()];
    let mut shot_targets: Vec<u32> = Vec::new();

    for (i, proj) in state.projectiles.iter().enumerate() {
        // Fired this frame: moves now, first collision check next frame
        if proj.born == state.time_ticks {
            continue;
        }
        match proj.owner {
            ProjectileOwner::Player => {
                for bot in &state.bots {
                    if within_range(proj.pos, bot.body.pos, BOT_RADIUS) {
                        pool.add(bot.body.id, proj.damage);
                        shot_targets.push(bot.body.id);
                        spent[i] = true;
                        break;
                    }
                }
            }
            ProjectileOwner::Enemy(_) => {
                if within_range(proj.pos, player_pos, state.player.radius) {
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

    // Loot collection, claimed at most once
    let mut collected: Vec<PickupKind> = Vec::new();
    state.loot.retain(|pickup| {
        if within_range(pickup.pos, player_pos, LOOT_COLLECT_RANGE) {
            collected.push(pickup.kind);
            false
        } else {
            true
        }
    });
    for kind in collected {
        match kind {
            PickupKind::Heal => state.player.heal(LOOT_HEAL),
            PickupKind::Rifle => state.weapon = Weapon::Rifle,
            PickupKind::Shotgun => state.weapon = Weapon::Shotgun,
            PickupKind::SlowMo | PickupKind::Coin => {}
        }
        state.events.push(GameEvent::Pickup);
    }

    // Continuous zone damage for everyone outside the safe circle
    player_damage += zone_damage(player_pos, state.zone_center, state.zone_radius, ZONE_DPS, dt);
    for bot in &state.bots {
        let bleed = zone_damage(bot.body.pos, state.zone_center, state.zone_radius, ZONE_DPS, dt);
        if bleed > 0.0 {
            pool.add(bot.body.id, bleed);
        }
    }

    // Settle bot damage: aggregate first, one death check per bot.
    // Kill credit only for bots the player actually shot this frame.
    let mut dead_bots: Vec<Fighter> = Vec::new();
    if !pool.is_empty() {
        for bot in &mut state.bots {
            let total = pool.total_for(bot.body.id);
            if total > 0.0 {
                bot.body.health = (bot.body.health - total).max(0.0);
                bot.body.hit_flash = 1.0;
            }
        }
        state.bots.retain(|b| {
            if b.body.is_dead() {
                dead_bots.push(b.body.clone());
                false
            } else {
                true
            }
        });
    }
    for corpse in &dead_bots {
        if shot_targets.contains(&corpse.id) {
            state.kills += 1;
            state.board.award(KILL_SCORE);
        }
        state.events.push(GameEvent::Explosion);
    }

    // Player damage lands at once, then one death check
    if player_damage > 0.0 {
        state.player.health = (state.player.health - player_damage).max(0.0);
        state.player.hit_flash = 1.0;
    }
    if state.player.is_dead() {
        if state.board.declare_game_over() {
            state.events.push(GameEvent::GameOver {
                score: state.board.score(),
            });
        }
        return;
    }

    // Last one standing: the run ends as a win
    if state.bots.is_empty() {
        state.board.award(SURVIVOR_BONUS);
        if state.board.declare_game_over() {
            state.events.push(GameEvent::GameOver {
                score: state.board.score(),
            });
        }
        return;
    }

    state.bots.sort_by_key(|b| b.body.id);
    state.projectiles.sort_by_key(|p| p.id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_state() -> BattleState {
        // Park every bot at the zone center, far from the player, so no
        // shots or zone bleed interfere with the scenario under test.
        let mut state = BattleState::new(42);
        for bot in &mut state.bots {
            bot.body.pos = state.zone_center;
            bot.target = state.zone_center;
        }
        state
    }

    #[test]
    fn test_zone_damage_outside_only() {
        let mut state = quiet_state();
        state.zone_radius = 500.0;
        state.player.pos = state.zone_center + Vec2::new(600.0, 0.0);
        tick(&mut state, &BattleInput::default(), SIM_DT);
        let expected = PLAYER_MAX_HEALTH - ZONE_DPS * SIM_DT;
        assert!((state.player.health - expected).abs() < 1e-4);

        let mut state = quiet_state();
        state.zone_radius = 500.0;
        state.player.pos = state.zone_center + Vec2::new(400.0, 0.0);
        tick(&mut state, &BattleInput::default(), SIM_DT);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
    }

    #[test]
    fn test_zone_floor() {
        let mut state = quiet_state();
        state.zone_radius = ZONE_MIN_RADIUS + 0.05;
        for _ in 0..100 {
            tick(&mut state, &BattleInput::default(), SIM_DT);
            if state.board.is_over() {
                break;
            }
        }
        assert!(state.zone_radius >= ZONE_MIN_RADIUS);
    }

    #[test]
    fn test_bot_kill_credit() {
        let mut state = quiet_state();
        let target = state.bots[0].body.id;
        state.bots[0].body.pos = Vec2::new(500.0, 500.0);
        state.bots[0].body.health = 10.0;
        state.bots[0].target = Vec2::new(500.0, 500.0);
        let id = state.ids.next();
        state.projectiles.push(Projectile {
            id,
            pos: Vec2::new(500.0, 500.0),
            vel: Vec2::ZERO,
            damage: 25.0,
            owner: ProjectileOwner::Player,
            color: 10,
            born: 0,
        });
        tick(&mut state, &BattleInput::default(), SIM_DT);
        assert_eq!(state.kills, 1);
        assert_eq!(state.board.score(), KILL_SCORE);
        assert!(state.bots.iter().all(|b| b.body.id != target));
    }

    #[test]
    fn test_zone_death_gives_no_kill_credit() {
        let mut state = quiet_state();
        state.zone_radius = ZONE_MIN_RADIUS;
        state.bots[0].body.pos = Vec2::ZERO; // far outside
        state.bots[0].target = Vec2::ZERO;
        state.bots[0].body.health = 0.01;
        tick(&mut state, &BattleInput::default(), SIM_DT);
        assert_eq!(state.kills, 0);
        assert_eq!(state.board.score(), 0);
        assert_eq!(state.bots.len(), BOT_COUNT - 1);
    }

    #[test]
    fn test_last_survivor_wins() {
        let mut state = quiet_state();
        state.bots.clear();
        tick(&mut state, &BattleInput::default(), SIM_DT);
        assert!(state.board.is_over());
        assert_eq!(state.board.score(), SURVIVOR_BONUS);
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);

        // A second tick after the win stays silent
        tick(&mut state, &BattleInput::default(), SIM_DT);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_loot_swaps_weapon_once() {
        let mut state = quiet_state();
        state.loot.clear();
        let id = state.ids.next();
        state.loot.push(Pickup {
            id,
            pos: state.player.pos,
            radius: LOOT_RADIUS,
            kind: PickupKind::Shotgun,
            life: 1.0,
        });
        tick(&mut state, &BattleInput::default(), SIM_DT);
        assert_eq!(state.weapon, Weapon::Shotgun);
        assert!(state.loot.is_empty());
    }
}
