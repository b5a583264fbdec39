//! GRAVITY: gravity-flip runner
//!
//! The runner holds a fixed column while the world scrolls past. A tap
//! flips gravity polarity; obstacles grow from floor and ceiling, and any
//! touch ends the run. Score is distance survived.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

use super::collision::Aabb;
use super::entity::{IdGen, Obstacle};
use super::events::GameEvent;
use super::score::Scoreboard;
use super::spawn::SpawnPolicy;

/// Fixed screen column the runner occupies
pub const RUNNER_X: f32 = 100.0;
pub const RUNNER_SIZE: f32 = 30.0;
const GRAVITY_ACCEL: f32 = 2880.0;

const BASE_SCROLL_SPEED: f32 = 360.0;
/// Scroll speed gain per second (monotone difficulty ramp)
const SCROLL_RAMP: f32 = 3.6;

const OBSTACLE_SPAWNS: SpawnPolicy = SpawnPolicy::new(0.02, 16);
const OBSTACLE_WIDTH: f32 = 30.0;
const OBSTACLE_MIN_HEIGHT: f32 = 40.0;
const OBSTACLE_MAX_HEIGHT: f32 = 100.0;

/// Survival score rate, points per second
const SCORE_RATE: f32 = 6.0;

/// Which way gravity currently pulls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GravityDir {
    #[default]
    Down,
    Up,
}

#[derive(Debug, Clone, Default)]
pub struct GravityInput {
    /// Flip gravity polarity (one-shot tap)
    pub flip: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravityState {
    pub seed: u64,
    pub rng: Pcg32,
    pub time_ticks: u64,
    pub bounds: Vec2,

    pub runner_y: f32,
    pub vy: f32,
    pub gravity: GravityDir,
    pub scroll_speed: f32,
    distance: f32,

    pub obstacles: Vec<Obstacle>,

    pub board: Scoreboard,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    ids: IdGen,
}

impl GravityState {
    pub fn new(seed: u64, bounds: Vec2) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            bounds,
            runner_y: bounds.y / 2.0,
            vy: 0.0,
            gravity: GravityDir::Down,
            scroll_speed: BASE_SCROLL_SPEED,
            distance: 0.0,
            obstacles: Vec::new(),
            board: Scoreboard::new(0),
            events: Vec::new(),
            ids: IdGen::default(),
        }
    }

    pub fn runner_box(&self) -> Aabb {
        Aabb::new(RUNNER_X, self.runner_y, RUNNER_SIZE, RUNNER_SIZE)
    }

    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
        self.runner_y = self.runner_y.clamp(0.0, bounds.y - RUNNER_SIZE);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Advance the run by one fixed timestep
pub fn tick(state: &mut GravityState, input: &GravityInput, dt: f32) {
    if state.board.is_over() {
        return;
    }
    state.time_ticks += 1;

    if input.flip {
        state.gravity = match state.gravity {
            GravityDir::Down => GravityDir::Up,
            GravityDir::Up => GravityDir::Down,
        };
        state.events.push(GameEvent::Shoot);
    }

    // Gravity integration; polarity flips the sign
    let g = match state.gravity {
        GravityDir::Down => GRAVITY_ACCEL,
        GravityDir::Up => -GRAVITY_ACCEL,
    };
    state.vy += g * dt;
    state.runner_y += state.vy * dt;

    // Hard floor and ceiling
    let floor = state.bounds.y - RUNNER_SIZE;
    if state.runner_y < 0.0 {
        state.runner_y = 0.0;
        state.vy = 0.0;
    } else if state.runner_y > floor {
        state.runner_y = floor;
        state.vy = 0.0;
    }

    // Obstacles scroll toward the runner
    for obs in &mut state.obstacles {
        obs.aabb.min.x -= state.scroll_speed * dt;
    }
    state
        .obstacles
        .retain(|o| o.aabb.min.x > -OFFSCREEN_MARGIN);

    // Any overlap ends the run
    let runner = state.runner_box();
    if state.obstacles.iter().any(|o| o.aabb.overlaps(&runner)) {
        state.events.push(GameEvent::Damage);
        if state.board.declare_game_over() {
            state.events.push(GameEvent::GameOver {
                score: state.board.score(),
            });
        }
        return;
    }

    // Spawn trial at the leading edge, attached to floor or ceiling
    if OBSTACLE_SPAWNS.roll(&mut state.rng, state.obstacles.len()) {
        let height =
            OBSTACLE_MIN_HEIGHT + state.rng.random::<f32>() * (OBSTACLE_MAX_HEIGHT - OBSTACLE_MIN_HEIGHT);
        let on_ceiling = state.rng.random::<f32>() > 0.5;
        let y = if on_ceiling { 0.0 } else { state.bounds.y - height };
        let id = state.ids.next();
        state.obstacles.push(Obstacle {
            id,
            aabb: Aabb::new(state.bounds.x, y, OBSTACLE_WIDTH, height),
            speed: state.scroll_speed,
        });
    }

    // Monotone ramps: scroll speed and survival score
    state.scroll_speed += SCROLL_RAMP * dt;
    state.distance += SCORE_RATE * dt;
    let banked = state.board.score();
    let earned = state.distance as u64;
    if earned > banked {
        state.board.award(earned - banked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> GravityState {
        GravityState::new(3, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_flip_inverts_acceleration() {
        let mut state = test_state();
        tick(&mut state, &GravityInput::default(), SIM_DT);
        assert!(state.vy > 0.0);

        let mut state = test_state();
        let flip = GravityInput { flip: true };
        tick(&mut state, &flip, SIM_DT);
        assert_eq!(state.gravity, GravityDir::Up);
        assert!(state.vy < 0.0);
    }

    #[test]
    fn test_floor_and_ceiling_stop_the_runner() {
        let mut state = test_state();
        for _ in 0..300 {
            tick(&mut state, &GravityInput::default(), SIM_DT);
            if state.board.is_over() {
                return;
            }
        }
        assert_eq!(state.runner_y, state.bounds.y - RUNNER_SIZE);
        assert_eq!(state.vy, 0.0);
    }

    #[test]
    fn test_collision_ends_run_once() {
        let mut state = test_state();
        let id = state.ids.next();
        state.obstacles.push(Obstacle {
            id,
            aabb: Aabb::new(RUNNER_X, state.runner_y, OBSTACLE_WIDTH, 60.0),
            speed: 0.0,
        });
        tick(&mut state, &GravityInput::default(), SIM_DT);
        assert!(state.board.is_over());
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        tick(&mut state, &GravityInput::default(), SIM_DT);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_speed_and_score_ramp_monotone() {
        let mut state = test_state();
        let mut last_speed = state.scroll_speed;
        let mut last_score = 0;
        for _ in 0..600 {
            tick(&mut state, &GravityInput::default(), SIM_DT);
            if state.board.is_over() {
                break;
            }
            assert!(state.scroll_speed >= last_speed);
            assert!(state.board.score() >= last_score);
            last_speed = state.scroll_speed;
            last_score = state.board.score();
        }
        assert!(state.board.score() > 0 || state.board.is_over());
    }
}
