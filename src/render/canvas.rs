//! Canvas2D drawing for all six engines
//!
//! Pure readers: every function takes the state by immutable borrow and a
//! 2D context, draws one frame, and returns. Layout mirrors each mode's
//! original look - flat shapes, glow accents, HUD text drawn by the DOM.

use std::f64::consts::TAU;

use glam::Vec2;
use web_sys::CanvasRenderingContext2d;

use super::palette;
use crate::sim::battle::BattleState;
use crate::sim::cosmic::CosmicState;
use crate::sim::entity::{Fighter, FloatingText, Particle, PickupKind, Projectile};
use crate::sim::gravity::{GravityState, RUNNER_SIZE, RUNNER_X};
use crate::sim::platformer::{PlatformKind, PlatformerState, PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::sim::racer::RacerState;
use crate::sim::strike::StrikeState;

fn clear(ctx: &CanvasRenderingContext2d, bounds: Vec2, color: &str) {
    ctx.set_fill_style_str(color);
    ctx.fill_rect(0.0, 0.0, bounds.x as f64, bounds.y as f64);
}

fn fill_circle(ctx: &CanvasRenderingContext2d, pos: Vec2, radius: f32, color: &str) {
    ctx.set_fill_style_str(color);
    ctx.begin_path();
    let _ = ctx.arc(pos.x as f64, pos.y as f64, radius as f64, 0.0, TAU);
    ctx.fill();
}

fn draw_fighter(ctx: &CanvasRenderingContext2d, fighter: &Fighter, color: &str, gun_len: f64) {
    ctx.save();
    let _ = ctx.translate(fighter.pos.x as f64, fighter.pos.y as f64);
    let _ = ctx.rotate(fighter.facing as f64);
    ctx.set_fill_style_str(if fighter.hit_flash > 0.1 { "#ffffff" } else { color });
    ctx.begin_path();
    let _ = ctx.arc(0.0, 0.0, fighter.radius as f64, 0.0, TAU);
    ctx.fill();
    ctx.set_fill_style_str("#000000");
    ctx.fill_rect(fighter.radius as f64 - 2.0, -3.0, gun_len, 6.0);
    ctx.restore();
}

fn draw_projectiles(ctx: &CanvasRenderingContext2d, projectiles: &[Projectile]) {
    for proj in projectiles {
        fill_circle(ctx, proj.pos, 4.0, palette(proj.color));
    }
}

fn draw_particles(ctx: &CanvasRenderingContext2d, particles: &[Particle]) {
    for p in particles {
        ctx.save();
        ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
        fill_circle(ctx, p.pos, p.size * p.life, palette(p.color));
        ctx.restore();
    }
}

fn draw_texts(ctx: &CanvasRenderingContext2d, texts: &[FloatingText]) {
    for t in texts {
        ctx.save();
        ctx.set_global_alpha(t.life.clamp(0.0, 1.0) as f64);
        ctx.set_fill_style_str(palette(t.color));
        ctx.set_text_align("center");
        ctx.set_font(if t.large {
            "bold 24px Orbitron, sans-serif"
        } else {
            "bold 16px Inter, sans-serif"
        });
        let _ = ctx.fill_text(&t.text, t.pos.x as f64, t.pos.y as f64);
        ctx.restore();
    }
}

/// STRIKE: dark arena, viewport-sized
pub fn draw_strike(ctx: &CanvasRenderingContext2d, state: &StrikeState) {
    clear(
        ctx,
        state.bounds,
        if state.slowmo_until > state.time() {
            "#050a10"
        } else {
            "#0a0a0a"
        },
    );

    for barrel in &state.barrels {
        ctx.save();
        let _ = ctx.translate(barrel.pos.x as f64, barrel.pos.y as f64);
        ctx.set_fill_style_str("#991b1b");
        ctx.fill_rect(-15.0, -20.0, 30.0, 40.0);
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("bold 10px Orbitron, sans-serif");
        ctx.set_text_align("center");
        let _ = ctx.fill_text("TNT", 0.0, 5.0);
        ctx.restore();
    }

    for pickup in &state.pickups {
        let color = match pickup.kind {
            PickupKind::Heal => "#166534",
            PickupKind::SlowMo => "#083344",
            _ => "#713f12",
        };
        fill_circle(ctx, pickup.pos, pickup.radius, color);
        ctx.set_fill_style_str("#ffffff");
        ctx.set_text_align("center");
        ctx.set_font("12px sans-serif");
        let glyph = match pickup.kind {
            PickupKind::Heal => "+",
            PickupKind::SlowMo => "~",
            _ => "$",
        };
        let _ = ctx.fill_text(glyph, pickup.pos.x as f64, pickup.pos.y as f64 + 5.0);
    }

    for enemy in &state.enemies {
        let color = palette(enemy.kind.map(|k| k.archetype().color).unwrap_or(0));
        draw_fighter(ctx, enemy, color, 10.0);
    }

    ctx.save();
    if state.is_dodging() {
        ctx.set_global_alpha(0.5);
    }
    draw_fighter(ctx, &state.player, "#3b82f6", 20.0);
    ctx.restore();

    draw_projectiles(ctx, &state.projectiles);
    draw_particles(ctx, &state.particles);
    draw_texts(ctx, &state.texts);

    if state.streak.life > 0.0 && !state.streak.text.is_empty() {
        ctx.save();
        ctx.set_global_alpha(state.streak.life as f64);
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font("bold 40px Orbitron, sans-serif");
        ctx.set_text_align("center");
        ctx.set_shadow_blur(20.0);
        ctx.set_shadow_color("#ef4444");
        let _ = ctx.fill_text(&state.streak.text, (state.bounds.x / 2.0) as f64, 180.0);
        ctx.restore();
    }
}

/// BATTLE: camera-follow over the big map, zone ring, minimap
pub fn draw_battle(ctx: &CanvasRenderingContext2d, state: &BattleState, viewport: Vec2) {
    use crate::sim::battle::MAP_SIZE;

    clear(ctx, viewport, "#1a2e1a");

    let cam = state.player.pos - viewport * 0.5;
    ctx.save();
    let _ = ctx.translate(-cam.x as f64, -cam.y as f64);

    // Ground grid
    ctx.set_stroke_style_str("#2d4a2d");
    ctx.set_line_width(1.0);
    let mut x = 0.0f64;
    while x <= MAP_SIZE as f64 {
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.line_to(x, MAP_SIZE as f64);
        ctx.stroke();
        x += 100.0;
    }
    let mut y = 0.0f64;
    while y <= MAP_SIZE as f64 {
        ctx.begin_path();
        ctx.move_to(0.0, y);
        ctx.line_to(MAP_SIZE as f64, y);
        ctx.stroke();
        y += 100.0;
    }

    // Safe zone ring
    ctx.set_stroke_style_str("#3b82f6");
    ctx.set_line_width(10.0);
    ctx.begin_path();
    let _ = ctx.arc(
        state.zone_center.x as f64,
        state.zone_center.y as f64,
        state.zone_radius as f64,
        0.0,
        TAU,
    );
    ctx.stroke();

    for crate_ in &state.loot {
        ctx.set_fill_style_str(match crate_.kind {
            PickupKind::Heal => "#4ade80",
            _ => "#fbbf24",
        });
        ctx.fill_rect(
            crate_.pos.x as f64 - 10.0,
            crate_.pos.y as f64 - 10.0,
            20.0,
            20.0,
        );
    }

    for bot in &state.bots {
        draw_fighter(ctx, &bot.body, "#ef4444", 15.0);
    }
    draw_fighter(ctx, &state.player, "#3b82f6", 20.0);
    draw_projectiles(ctx, &state.projectiles);

    ctx.restore();

    // Minimap
    let mm = 120.0f64;
    let mx = viewport.x as f64 - mm - 20.0;
    let my = 20.0f64;
    ctx.set_fill_style_str("rgba(0,0,0,0.7)");
    ctx.fill_rect(mx, my, mm, mm);
    ctx.set_stroke_style_str("#ffffff");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(mx, my, mm, mm);

    let scale = mm / MAP_SIZE as f64;
    fill_circle(
        ctx,
        Vec2::new(
            (mx + state.player.pos.x as f64 * scale) as f32,
            (my + state.player.pos.y as f64 * scale) as f32,
        ),
        3.0,
        "#3b82f6",
    );
    ctx.set_stroke_style_str("#3b82f6");
    ctx.begin_path();
    let _ = ctx.arc(
        mx + state.zone_center.x as f64 * scale,
        my + state.zone_center.y as f64 * scale,
        state.zone_radius as f64 * scale,
        0.0,
        TAU,
    );
    ctx.stroke();
}

/// COSMIC: starfield shooter
pub fn draw_cosmic(ctx: &CanvasRenderingContext2d, state: &CosmicState) {
    clear(ctx, state.bounds, "#050510");

    // Static starfield keyed off the tick so it shimmers
    ctx.set_fill_style_str("#ffffff");
    for i in 0..50u64 {
        let hash = i
            .wrapping_mul(2654435761)
            .wrapping_add(state.time_ticks / 8);
        let sx = (hash.wrapping_mul(31) % 1000) as f64 / 1000.0 * state.bounds.x as f64;
        let sy = (hash.wrapping_mul(101) % 1000) as f64 / 1000.0 * state.bounds.y as f64;
        ctx.set_global_alpha(((hash % 70) as f64 + 30.0) / 100.0);
        ctx.fill_rect(sx, sy, 2.0, 2.0);
    }
    ctx.set_global_alpha(1.0);

    // Ship
    let ship = state.ship_pos();
    ctx.set_fill_style_str("#3b82f6");
    ctx.begin_path();
    ctx.move_to(ship.x as f64, ship.y as f64 - 20.0);
    ctx.line_to(ship.x as f64 - 20.0, ship.y as f64 + 20.0);
    ctx.line_to(ship.x as f64 + 20.0, ship.y as f64 + 20.0);
    ctx.fill();

    for invader in &state.invaders {
        fill_circle(ctx, invader.pos, invader.radius, "#ef4444");
    }

    ctx.set_fill_style_str("#fbbf24");
    for bullet in &state.bullets {
        ctx.fill_rect(bullet.pos.x as f64 - 2.0, bullet.pos.y as f64, 4.0, 10.0);
    }
}

/// RACER: neon road
pub fn draw_racer(ctx: &CanvasRenderingContext2d, state: &RacerState) {
    clear(ctx, state.bounds, "#050505");

    // Scrolling grid for the speed feel
    ctx.set_stroke_style_str("#1e1e1e");
    ctx.set_line_width(2.0);
    let mut x = 0.0f64;
    while x < state.bounds.x as f64 {
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.line_to(x, state.bounds.y as f64);
        ctx.stroke();
        x += 100.0;
    }
    let offset = (state.time_ticks as f64 * 1.6) % 100.0;
    let mut y = -100.0f64;
    while y < state.bounds.y as f64 {
        ctx.begin_path();
        ctx.move_to(0.0, y + offset);
        ctx.line_to(state.bounds.x as f64, y + offset);
        ctx.stroke();
        y += 100.0;
    }

    ctx.set_shadow_blur(15.0);
    ctx.set_shadow_color("#ef4444");
    ctx.set_fill_style_str("#ef4444");
    for obs in &state.obstacles {
        ctx.fill_rect(
            obs.aabb.min.x as f64,
            obs.aabb.min.y as f64,
            obs.aabb.size.x as f64,
            obs.aabb.size.y as f64,
        );
    }

    ctx.set_shadow_color("#4ade80");
    ctx.set_shadow_blur(20.0);
    for pickup in &state.pickups {
        fill_circle(ctx, pickup.pos, pickup.radius, "#4ade80");
    }

    // Player wedge with thrusters
    let p = state.ship_pos();
    ctx.set_shadow_color("#3b82f6");
    ctx.set_fill_style_str("#3b82f6");
    ctx.begin_path();
    ctx.move_to(p.x as f64, p.y as f64 - 40.0);
    ctx.line_to(p.x as f64 - 25.0, p.y as f64 + 20.0);
    ctx.line_to(p.x as f64 + 25.0, p.y as f64 + 20.0);
    ctx.fill();
    ctx.set_shadow_blur(0.0);
    ctx.set_fill_style_str("#60a5fa");
    let flicker = (state.time_ticks % 5) as f64 * 2.0;
    ctx.fill_rect(p.x as f64 - 15.0, p.y as f64 + 20.0, 10.0, 10.0 + flicker);
    ctx.fill_rect(p.x as f64 + 5.0, p.y as f64 + 20.0, 10.0, 10.0 + flicker);
}

/// GRAVITY: minimal runner corridor
pub fn draw_gravity(ctx: &CanvasRenderingContext2d, state: &GravityState) {
    clear(ctx, state.bounds, "#0a0a0a");

    ctx.set_fill_style_str("#f87171");
    for obs in &state.obstacles {
        ctx.fill_rect(
            obs.aabb.min.x as f64,
            obs.aabb.min.y as f64,
            obs.aabb.size.x as f64,
            obs.aabb.size.y as f64,
        );
    }

    ctx.set_shadow_blur(15.0);
    ctx.set_shadow_color("#a855f7");
    ctx.set_fill_style_str("#a855f7");
    ctx.fill_rect(
        RUNNER_X as f64,
        state.runner_y as f64,
        RUNNER_SIZE as f64,
        RUNNER_SIZE as f64,
    );
    ctx.set_shadow_blur(0.0);
}

/// PLATFORMER: camera-scrolled hills, pipes, and walkers
pub fn draw_platformer(ctx: &CanvasRenderingContext2d, state: &PlatformerState) {
    clear(ctx, state.bounds, "#1e3799");

    ctx.save();
    let _ = ctx.translate(-state.camera_x as f64, 0.0);

    // Background hills with light parallax
    ctx.set_fill_style_str("#0a3d62");
    for i in 0..30 {
        let hill_x = i as f64 * 900.0 - (state.camera_x as f64 * 0.2) % 900.0;
        ctx.begin_path();
        let _ = ctx.arc(hill_x + 450.0, 560.0, 300.0, 0.0, TAU);
        ctx.fill();
    }

    for platform in &state.platforms {
        let a = &platform.aabb;
        match platform.kind {
            PlatformKind::Pipe => {
                ctx.set_fill_style_str("#009432");
                ctx.fill_rect(
                    a.min.x as f64,
                    a.min.y as f64,
                    a.size.x as f64,
                    a.size.y as f64,
                );
                ctx.set_fill_style_str("#a3cb38");
                ctx.fill_rect(a.min.x as f64 - 8.0, a.min.y as f64, a.size.x as f64 + 16.0, 28.0);
            }
            _ => {
                ctx.set_fill_style_str("#747d8c");
                ctx.fill_rect(
                    a.min.x as f64,
                    a.min.y as f64,
                    a.size.x as f64,
                    a.size.y as f64,
                );
                ctx.set_fill_style_str("#2ed573");
                ctx.fill_rect(a.min.x as f64, a.min.y as f64, a.size.x as f64, 15.0);
            }
        }
    }

    for coin in &state.coins {
        ctx.save();
        let hover = (coin.phase.sin() * 8.0) as f64;
        let _ = ctx.translate(coin.pos.x as f64, coin.pos.y as f64 + hover);
        let _ = ctx.scale((coin.phase * 1.5).cos().abs().max(0.1) as f64, 1.0);
        ctx.set_fill_style_str("#f1c40f");
        ctx.begin_path();
        let _ = ctx.arc(0.0, 0.0, 15.0, 0.0, TAU);
        ctx.fill();
        ctx.restore();
    }

    for walker in &state.patrollers {
        let a = &walker.aabb;
        if walker.state == crate::sim::ai::AiState::Dead {
            // Squashed remains
            ctx.set_fill_style_str("#ffa502");
            ctx.fill_rect(
                a.min.x as f64 - 10.0,
                a.max().y as f64 - 8.0,
                a.size.x as f64 + 20.0,
                8.0,
            );
            continue;
        }
        ctx.set_fill_style_str("#2f3542");
        ctx.fill_rect(
            a.min.x as f64,
            a.min.y as f64,
            a.size.x as f64,
            a.size.y as f64,
        );
        ctx.set_fill_style_str("#ffffff");
        ctx.fill_rect(a.min.x as f64 + 8.0, a.min.y as f64 + 10.0, 6.0, 12.0);
        ctx.fill_rect(a.max().x as f64 - 14.0, a.min.y as f64 + 10.0, 6.0, 12.0);
    }

    // Player
    let p = &state.player;
    ctx.save();
    let _ = ctx.translate(
        (p.pos.x + PLAYER_WIDTH / 2.0) as f64,
        (p.pos.y + PLAYER_HEIGHT / 2.0) as f64,
    );
    if !p.facing_right {
        let _ = ctx.scale(-1.0, 1.0);
    }
    ctx.set_fill_style_str("#ff4757");
    ctx.fill_rect(
        -(PLAYER_WIDTH / 2.0) as f64,
        -(PLAYER_HEIGHT / 2.0) as f64 + 5.0,
        PLAYER_WIDTH as f64,
        PLAYER_HEIGHT as f64 - 15.0,
    );
    ctx.set_fill_style_str("#ffeaa7");
    ctx.begin_path();
    let _ = ctx.arc(0.0, -22.0, 19.0, 0.0, TAU);
    ctx.fill();
    ctx.set_fill_style_str("#000000");
    ctx.begin_path();
    let _ = ctx.arc(9.0, -24.0, 3.5, 0.0, TAU);
    ctx.fill();
    ctx.begin_path();
    let _ = ctx.arc(-1.0, -24.0, 3.5, 0.0, TAU);
    ctx.fill();
    ctx.set_fill_style_str("#ff4757");
    ctx.fill_rect(-24.0, -42.0, 48.0, 14.0);
    ctx.restore();

    draw_particles(ctx, &state.particles);
    ctx.restore();
}
