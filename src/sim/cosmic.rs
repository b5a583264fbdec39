//! COSMIC: vertical space shooter
//!
//! The ship glides along the bottom edge toward the pointer and fires on a
//! fixed cadence. Invaders fall from above; one leak or one touch ends the
//! run.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

use super::collision::{circles_overlap, out_of_bounds, within_range};
use super::entity::{IdGen, Projectile, ProjectileOwner};
use super::events::GameEvent;
use super::score::Scoreboard;
use super::spawn::{self, SpawnPolicy};

/// Ship center sits this far above the bottom edge
const SHIP_CLEARANCE: f32 = 80.0;
const SHIP_RADIUS: f32 = 20.0;
const FIRE_COOLDOWN: f32 = 0.2;
const SHOT_SPEED: f32 = 600.0;
const SHOT_DAMAGE: f32 = 10.0;

const FALL_BASE_SPEED: f32 = 180.0;
/// Fall speed ramp per score point (monotone difficulty)
const FALL_SPEED_PER_POINT: f32 = 0.06;
const INVADER_SPAWNS: SpawnPolicy = SpawnPolicy::new(0.03, 32);
const INVADER_MIN_RADIUS: f32 = 20.0;
const INVADER_MAX_RADIUS: f32 = 40.0;
pub const KILL_SCORE: u64 = 50;

/// A falling invader; any hit destroys it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invader {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Default)]
pub struct CosmicInput {
    /// Pointer x position; the ship tracks it directly
    pub pointer_x: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CosmicState {
    pub seed: u64,
    pub rng: Pcg32,
    pub time_ticks: u64,
    pub bounds: Vec2,

    pub ship_x: f32,
    pub last_shot: f32,
    pub bullets: Vec<Projectile>,
    pub invaders: Vec<Invader>,

    pub board: Scoreboard,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    ids: IdGen,
}

impl CosmicState {
    pub fn new(seed: u64, bounds: Vec2) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            bounds,
            ship_x: bounds.x / 2.0,
            last_shot: -1.0,
            bullets: Vec::new(),
            invaders: Vec::new(),
            board: Scoreboard::new(0),
            events: Vec::new(),
            ids: IdGen::default(),
        }
    }

    pub fn time(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    pub fn ship_pos(&self) -> Vec2 {
        Vec2::new(self.ship_x, self.bounds.y - SHIP_CLEARANCE)
    }

    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
        self.ship_x = self.ship_x.clamp(SHIP_RADIUS, bounds.x - SHIP_RADIUS);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn end_run(&mut self) {
        if self.board.declare_game_over() {
            self.events.push(GameEvent::GameOver {
                score: self.board.score(),
            });
        }
    }
}

/// Advance the starfield by one fixed timestep
pub fn tick(state: &mut CosmicState, input: &CosmicInput, dt: f32) {
    if state.board.is_over() {
        return;
    }
    state.time_ticks += 1;
    let now = state.time();

    // Ship tracks the pointer
    if let Some(x) = input.pointer_x {
        state.ship_x = x.clamp(SHIP_RADIUS, state.bounds.x - SHIP_RADIUS);
    }
    let ship = state.ship_pos();

    // Autofire on a fixed cadence
    if now - state.last_shot >= FIRE_COOLDOWN {
        state.last_shot = now;
        let id = state.ids.next();
        state.bullets.push(Projectile {
            id,
            pos: ship,
            vel: Vec2::new(0.0, -SHOT_SPEED),
            damage: SHOT_DAMAGE,
            owner: ProjectileOwner::Player,
            color: 10,
            born: state.time_ticks,
        });
        state.events.push(GameEvent::Shoot);
    }

    // Advance bullets and invaders
    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel * dt;
    }
    let bounds = state.bounds;
    state
        .bullets
        .retain(|b| !out_of_bounds(b.pos, bounds, OFFSCREEN_MARGIN));

    let fall_speed = FALL_BASE_SPEED + state.board.score() as f32 * FALL_SPEED_PER_POINT;
    for invader in &mut state.invaders {
        invader.pos.y += fall_speed * dt;
    }

    // Bullet hits: each bullet spends itself on its first target, and a
    // destroyed invader is out of play for the rest of the frame
    let mut spent = vec![false; state.bullets.len()];
    let mut destroyed: Vec<u32> = Vec::new();
    for (i, bullet) in state.bullets.iter().enumerate() {
        if bullet.born == state.time_ticks {
            continue;
        }
        for invader in &state.invaders {
            if destroyed.contains(&invader.id) {
                continue;
            }
            if within_range(bullet.pos, invader.pos, invader.radius) {
                destroyed.push(invader.id);
                spent[i] = true;
                break;
            }
        }
    }
    {
        let mut i = 0;
        state.bullets.retain(|_| {
            let keep = !spent[i];
            i += 1;
            keep
        });
    }
    for _ in &destroyed {
        state.board.award(KILL_SCORE);
        state.events.push(GameEvent::Explosion);
    }
    state.invaders.retain(|inv| !destroyed.contains(&inv.id));

    // A leak or a touch ends the run
    for invader in &state.invaders {
        if invader.pos.y > state.bounds.y
            || circles_overlap(invader.pos, invader.radius, ship, SHIP_RADIUS)
        {
            state.end_run();
            return;
        }
    }

    // Spawn trial
    if INVADER_SPAWNS.roll(&mut state.rng, state.invaders.len()) {
        let radius =
            INVADER_MIN_RADIUS + state.rng.random::<f32>() * (INVADER_MAX_RADIUS - INVADER_MIN_RADIUS);
        let pos = spawn::top_spawn(&mut state.rng, state.bounds.x, radius + 10.0);
        let id = state.ids.next();
        state.invaders.push(Invader { id, pos, radius });
    }

    state.bullets.sort_by_key(|b| b.id);
    state.invaders.sort_by_key(|i| i.id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> CosmicState {
        CosmicState::new(7, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_bullet_kill_scores() {
        let mut state = test_state();
        let id = state.ids.next();
        state.invaders.push(Invader {
            id,
            pos: Vec2::new(400.0, 200.0),
            radius: 30.0,
        });
        let bid = state.ids.next();
        state.bullets.push(Projectile {
            id: bid,
            pos: Vec2::new(400.0, 210.0),
            vel: Vec2::ZERO,
            damage: SHOT_DAMAGE,
            owner: ProjectileOwner::Player,
            color: 10,
            born: 0,
        });
        tick(&mut state, &CosmicInput::default(), SIM_DT);
        assert_eq!(state.board.score(), KILL_SCORE);
        assert!(state.invaders.iter().all(|i| i.id != id));
    }

    #[test]
    fn test_leak_ends_run_once() {
        let mut state = test_state();
        let id = state.ids.next();
        state.invaders.push(Invader {
            id,
            pos: Vec2::new(100.0, 650.0),
            radius: 20.0,
        });
        tick(&mut state, &CosmicInput::default(), SIM_DT);
        assert!(state.board.is_over());
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        tick(&mut state, &CosmicInput::default(), SIM_DT);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_autofire_cadence() {
        let mut state = test_state();
        // 30 ticks = 0.5 s at a 0.2 s cooldown: expect 3 shots
        let mut shots = 0;
        for _ in 0..30 {
            tick(&mut state, &CosmicInput::default(), SIM_DT);
            shots += state
                .drain_events()
                .into_iter()
                .filter(|e| matches!(e, GameEvent::Shoot))
                .count();
            if state.board.is_over() {
                break;
            }
        }
        assert_eq!(shots, 3);
    }

    #[test]
    fn test_spawn_cap_respected() {
        let mut state = test_state();
        for _ in 0..2000 {
            // Sweep invaders back up so they never leak or touch
            for invader in &mut state.invaders {
                invader.pos.y = 50.0;
            }
            tick(&mut state, &CosmicInput::default(), SIM_DT);
            assert!(state.invaders.len() <= 32);
        }
    }
}
