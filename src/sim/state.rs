//! Game state and core simulation types
//!
//! Everything the simulation step reads or writes lives in [`GameWorld`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle, waiting for start
    Menu,
    /// Simulation running
    Playing,
    /// Simulation frozen, scene still drawn
    Paused,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player fired a bullet
    ShotFired,
    /// A bullet destroyed an enemy worth `score_value`
    EnemyDestroyed { score_value: u64 },
    /// An enemy rammed the player
    LifeLost { lives: u8 },
    LivesChanged { lives: u8 },
    ScoreChanged { score: u64 },
    PowerUpCollected { kind: PowerUpKind },
    /// Rapid-fire boost ran out
    FireRateRestored,
    /// Lives exhausted
    GameOver { final_score: u64 },
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Ship center
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Pixels per tick
    pub speed: f32,
    /// Ticks until the next shot is allowed
    pub shoot_cooldown: u32,
    /// Cooldown applied after each shot (lowered by rapid-fire)
    pub shoot_delay: u32,
    /// Shoot intent seen on the last tick
    pub shooting: bool,
    /// Tick at which a rapid-fire boost reverts
    pub boost_expires_at_tick: Option<u64>,
    /// Upward intent on the last tick (thruster flare)
    pub thrusting: bool,
}

impl Player {
    pub fn new(field: Vec2, shoot_delay: u32) -> Self {
        Self {
            pos: Vec2::new(field.x / 2.0, field.y - PLAYER_SPAWN_OFFSET),
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            shoot_cooldown: 0,
            shoot_delay,
            shooting: false,
            boost_expires_at_tick: None,
            thrusting: false,
        }
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Tip of the triangle hull, where bullets leave
    pub fn nose(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - self.height / 2.0)
    }
}

/// Enemy templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyArchetype {
    /// Big and slow
    Crimson,
    Amber,
    /// Small and fast
    Emerald,
}

impl EnemyArchetype {
    pub const ALL: [EnemyArchetype; 3] = [Self::Crimson, Self::Amber, Self::Emerald];

    pub fn size(self) -> f32 {
        match self {
            Self::Crimson => 30.0,
            Self::Amber => 25.0,
            Self::Emerald => 20.0,
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            Self::Crimson => 1.5,
            Self::Amber => 2.0,
            Self::Emerald => 2.5,
        }
    }

    pub fn score(self) -> u64 {
        match self {
            Self::Crimson => 10,
            Self::Amber => 20,
            Self::Emerald => 30,
        }
    }
}

/// A homing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub archetype: EnemyArchetype,
    pub pos: Vec2,
    /// Diameter
    pub size: f32,
    pub speed: f32,
    pub score: u64,
}

impl Enemy {
    pub fn new(id: u32, archetype: EnemyArchetype, pos: Vec2) -> Self {
        Self {
            id,
            archetype,
            pos,
            size: archetype.size(),
            speed: archetype.speed(),
            score: archetype.score(),
        }
    }
}

/// A player projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    /// Center x, top y
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Bullet {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            width: BULLET_WIDTH,
            height: BULLET_HEIGHT,
            speed: BULLET_SPEED,
        }
    }
}

/// Particle color source (resolved to RGBA by the renderer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleTint {
    /// Muzzle flash
    Shot,
    Enemy(EnemyArchetype),
    Pickup,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub tint: ParticleTint,
    /// Ticks remaining
    pub life: u32,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    ExtraLife,
    RapidFire,
    ScoreBonus,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [Self::ExtraLife, Self::RapidFire, Self::ScoreBonus];
}

/// A falling power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub size: f32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameWorld {
    /// Seed of the current session
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Play field size in pixels
    pub field: Vec2,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Ticks simulated this session
    pub ticks: u64,
    pub player: Player,
    /// Pools, in spawn order
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub powerups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Live particle ceiling (quality setting)
    pub particle_cap: usize,
    next_id: u32,
}

impl GameWorld {
    /// Create an idle world sized to the given field
    pub fn new(seed: u64, field: Vec2, tuning: Tuning) -> Self {
        let player = Player::new(field, tuning.default_shoot_delay);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            lives: tuning.starting_lives,
            tuning,
            field,
            phase: GamePhase::Menu,
            score: 0,
            ticks: 0,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            particle_cap: MAX_PARTICLES,
            next_id: 1,
        }
    }

    /// Reset everything for a fresh session (phase is left to the caller)
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.ticks = 0;
        self.player = Player::new(self.field, self.tuning.default_shoot_delay);
        self.enemies.clear();
        self.bullets.clear();
        self.powerups.clear();
        self.particles.clear();
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn an enemy of a random archetype along the top edge
    pub fn spawn_enemy(&mut self) -> u32 {
        let archetype = EnemyArchetype::ALL[self.rng.random_range(0..EnemyArchetype::ALL.len())];
        let span = (self.field.x - 2.0 * ENEMY_SPAWN_INSET).max(0.0);
        let x = self.rng.random::<f32>() * span + ENEMY_SPAWN_INSET;
        self.spawn_enemy_at(archetype, Vec2::new(x, ENEMY_SPAWN_Y))
    }

    /// Spawn a specific enemy (also used by tests)
    pub fn spawn_enemy_at(&mut self, archetype: EnemyArchetype, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, archetype, pos));
        id
    }

    pub fn spawn_particles(&mut self, pos: Vec2, tint: ParticleTint, count: usize) {
        spawn_burst(
            &mut self.particles,
            &mut self.rng,
            self.particle_cap,
            pos,
            tint,
            count,
        );
    }
}

/// Push up to `count` particles, stopping at `cap`
///
/// Takes the pools directly so callers can burst while iterating other pools.
pub fn spawn_burst(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    cap: usize,
    pos: Vec2,
    tint: ParticleTint,
    count: usize,
) {
    let room = cap.min(MAX_PARTICLES).saturating_sub(particles.len());
    for _ in 0..count.min(room) {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED,
            (rng.random::<f32>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED,
        );
        particles.push(Particle {
            pos,
            vel,
            radius: rng.random::<f32>() * PARTICLE_RADIUS_SPREAD + PARTICLE_MIN_RADIUS,
            tint,
            life: PARTICLE_LIFE,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Vec2 {
        Vec2::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT)
    }

    #[test]
    fn test_new_world_is_idle() {
        let world = GameWorld::new(1, field(), Tuning::default());
        assert_eq!(world.phase, GamePhase::Menu);
        assert_eq!(world.lives, 3);
        assert_eq!(world.player.pos, Vec2::new(400.0, 500.0));
        assert_eq!(world.player.shoot_delay, 15);
    }

    #[test]
    fn test_spawned_enemy_on_top_band() {
        let mut world = GameWorld::new(7, field(), Tuning::default());
        for _ in 0..50 {
            world.spawn_enemy();
        }
        for enemy in &world.enemies {
            assert_eq!(enemy.pos.y, ENEMY_SPAWN_Y);
            assert!(enemy.pos.x >= 25.0 && enemy.pos.x < 775.0);
            assert_eq!(enemy.size, enemy.archetype.size());
        }
        // Ids are unique and increasing
        assert!(world.enemies.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_burst_respects_cap() {
        let mut world = GameWorld::new(3, field(), Tuning::default());
        world.particle_cap = 10;
        world.spawn_particles(Vec2::ZERO, ParticleTint::Pickup, 8);
        world.spawn_particles(Vec2::ZERO, ParticleTint::Pickup, 8);
        assert_eq!(world.particles.len(), 10);
        for p in &world.particles {
            assert!(p.vel.x.abs() <= PARTICLE_MAX_SPEED && p.vel.y.abs() <= PARTICLE_MAX_SPEED);
            assert!(p.radius >= 1.0 && p.radius < 4.0);
            assert_eq!(p.life, PARTICLE_LIFE);
        }
    }

    #[test]
    fn test_reset_clears_pools() {
        let mut world = GameWorld::new(3, field(), Tuning::default());
        world.spawn_enemy();
        world.spawn_particles(Vec2::ZERO, ParticleTint::Shot, 3);
        world.score = 120;
        world.lives = 1;
        world.reset(4);
        assert!(world.enemies.is_empty() && world.particles.is_empty());
        assert_eq!(world.score, 0);
        assert_eq!(world.lives, 3);
        assert_eq!(world.seed, 4);
    }
}
