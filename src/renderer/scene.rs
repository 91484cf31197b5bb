//! Frame composition
//!
//! Turns a [`GameWorld`] into one triangle list. Pure: the world is only
//! borrowed immutably, so drawing can never disturb the simulation, and it
//! works in every phase (menu and pause just show the last known state).

use std::ops::Range;

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::PARTICLE_LIFE;
use crate::sim::{
    Bullet, Enemy, EnemyArchetype, GameWorld, Particle, ParticleTint, Player, PowerUp, PowerUpKind,
};

/// Circle tessellation for small and large shapes
const SMALL_SEGMENTS: u32 = 12;
const LARGE_SEGMENTS: u32 = 24;

/// Draw layers, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Particles,
    PowerUps,
    Bullets,
    Enemies,
    Player,
}

impl Layer {
    pub const ORDER: [Layer; 6] = [
        Layer::Background,
        Layer::Particles,
        Layer::PowerUps,
        Layer::Bullets,
        Layer::Enemies,
        Layer::Player,
    ];
}

/// One composed frame
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Triangle list in field coordinates
    pub vertices: Vec<Vertex>,
    /// Vertex range of every layer, in draw order
    pub layers: Vec<(Layer, Range<usize>)>,
    /// Field size the vertices were built for
    pub field: Vec2,
}

impl Scene {
    /// Vertices drawn for one layer
    pub fn layer(&self, layer: Layer) -> &[Vertex] {
        self.layers
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, range)| &self.vertices[range.clone()])
            .unwrap_or(&[])
    }

    fn push_layer(&mut self, layer: Layer, draw: impl FnOnce(&mut Vec<Vertex>)) {
        let start = self.vertices.len();
        draw(&mut self.vertices);
        self.layers.push((layer, start..self.vertices.len()));
    }
}

/// Build the frame for `world` at host time `time_ms`
///
/// `star_count` comes from the quality preset.
pub fn build_scene(world: &GameWorld, time_ms: f64, star_count: usize) -> Scene {
    let mut scene = Scene {
        field: world.field,
        ..Default::default()
    };

    scene.push_layer(Layer::Background, |out| {
        draw_background(out, world.field, time_ms, star_count)
    });
    scene.push_layer(Layer::Particles, |out| {
        world.particles.iter().for_each(|p| draw_particle(out, p))
    });
    scene.push_layer(Layer::PowerUps, |out| {
        world
            .powerups
            .iter()
            .for_each(|p| draw_powerup(out, p, time_ms))
    });
    scene.push_layer(Layer::Bullets, |out| {
        world.bullets.iter().for_each(|b| draw_bullet(out, b))
    });
    scene.push_layer(Layer::Enemies, |out| {
        world.enemies.iter().for_each(|e| draw_enemy(out, e))
    });
    scene.push_layer(Layer::Player, |out| draw_player(out, &world.player));

    scene
}

/// Color for a particle tint
pub fn tint_color(tint: ParticleTint) -> [f32; 4] {
    match tint {
        ParticleTint::Shot => colors::BULLET,
        ParticleTint::Enemy(archetype) => enemy_color(archetype),
        ParticleTint::Pickup => colors::PICKUP_SPARK,
    }
}

pub fn enemy_color(archetype: EnemyArchetype) -> [f32; 4] {
    match archetype {
        EnemyArchetype::Crimson => colors::ENEMY_CRIMSON,
        EnemyArchetype::Amber => colors::ENEMY_AMBER,
        EnemyArchetype::Emerald => colors::ENEMY_EMERALD,
    }
}

pub fn powerup_color(kind: PowerUpKind) -> [f32; 4] {
    match kind {
        PowerUpKind::ExtraLife => colors::POWERUP_LIFE,
        PowerUpKind::RapidFire => colors::POWERUP_RAPID_FIRE,
        PowerUpKind::ScoreBonus => colors::POWERUP_BONUS,
    }
}

/// Gradient sky plus a twinkling starfield
fn draw_background(out: &mut Vec<Vertex>, field: Vec2, time_ms: f64, star_count: usize) {
    if field.x <= 0.0 || field.y <= 0.0 {
        return;
    }
    out.extend(shapes::gradient_rect(
        Vec2::ZERO,
        field,
        colors::BACKGROUND_TOP,
        colors::BACKGROUND_BOTTOM,
    ));

    let t = time_ms * 0.001;
    for i in 0..star_count {
        let fi = i as f32;
        let pos = Vec2::new((fi * 13.7) % field.x, (fi * 7.3) % field.y);
        let wave = (t + i as f64).sin() as f32;
        let size = wave * 1.5 + 1.5;
        if size <= 0.0 {
            continue;
        }
        let color = colors::with_alpha(colors::STAR, 0.5 + wave * 0.3);
        out.extend(shapes::rect(pos, Vec2::splat(size), color));
    }
}

/// Fades out over the particle's lifetime
fn draw_particle(out: &mut Vec<Vertex>, p: &Particle) {
    let alpha = (p.life as f32 / PARTICLE_LIFE as f32).clamp(0.0, 1.0);
    let color = colors::with_alpha(tint_color(p.tint), alpha);
    out.extend(shapes::circle(p.pos, p.radius, color, SMALL_SEGMENTS));
}

fn draw_powerup(out: &mut Vec<Vertex>, p: &PowerUp, time_ms: f64) {
    let pulse = (time_ms * 0.01).sin() as f32 * 2.0;
    let size = p.size + pulse;
    out.extend(shapes::circle(
        p.pos,
        size / 2.0,
        powerup_color(p.kind),
        LARGE_SEGMENTS,
    ));

    // Extra life wears a cross
    if p.kind == PowerUpKind::ExtraLife {
        out.extend(shapes::rect(
            p.pos + Vec2::new(-size / 4.0, -3.0),
            Vec2::new(size / 2.0, 6.0),
            colors::POWERUP_GLYPH,
        ));
        out.extend(shapes::rect(
            p.pos + Vec2::new(-3.0, -size / 4.0),
            Vec2::new(6.0, size / 2.0),
            colors::POWERUP_GLYPH,
        ));
    }
}

/// Core beam plus a wider translucent glow
fn draw_bullet(out: &mut Vec<Vertex>, b: &Bullet) {
    out.extend(shapes::rect(
        Vec2::new(b.pos.x - b.width / 2.0, b.pos.y),
        Vec2::new(b.width, b.height),
        colors::BULLET,
    ));
    out.extend(shapes::rect(
        Vec2::new(b.pos.x - b.width, b.pos.y),
        Vec2::new(b.width * 2.0, b.height),
        colors::BULLET_GLOW,
    ));
}

fn draw_enemy(out: &mut Vec<Vertex>, e: &Enemy) {
    out.extend(shapes::circle(
        e.pos,
        e.size / 2.0,
        enemy_color(e.archetype),
        LARGE_SEGMENTS,
    ));
    for side in [-1.0, 1.0] {
        let eye = e.pos + Vec2::new(side * e.size / 4.0, -e.size / 6.0);
        out.extend(shapes::circle(
            eye,
            e.size / 8.0,
            colors::ENEMY_HIGHLIGHT,
            SMALL_SEGMENTS,
        ));
    }
}

/// Triangle hull, cockpit, and the flare while thrusting
fn draw_player(out: &mut Vec<Vertex>, player: &Player) {
    let pos = player.pos;
    let (w, h) = (player.width, player.height);

    out.extend(shapes::triangle(
        pos + Vec2::new(0.0, -h / 2.0),
        pos + Vec2::new(-w / 2.0, h / 2.0),
        pos + Vec2::new(w / 2.0, h / 2.0),
        colors::PLAYER,
    ));
    out.extend(shapes::ellipse(
        pos + Vec2::new(0.0, -h / 4.0),
        Vec2::new(w / 4.0, h / 4.0),
        colors::COCKPIT,
        LARGE_SEGMENTS,
    ));

    if player.thrusting {
        out.extend(shapes::ellipse(
            pos + Vec2::new(0.0, h / 2.0 + 10.0),
            Vec2::new(w / 3.0, 15.0),
            colors::THRUSTER,
            LARGE_SEGMENTS,
        ));
    }
}
