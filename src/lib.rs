//! Star Shooter - A vertical arcade space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, input, collisions, game state)
//! - `game`: Frame driver and menu/playing/paused state machine
//! - `renderer`: Procedural shape drawing + WebGPU pipeline
//! - `platform`: Browser/native platform abstraction
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{FrameSink, Game};
pub use settings::{InputModePreference, QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate (one tick per display frame)
    pub const TICKS_PER_SECOND: u64 = 60;

    /// Default play field used by the headless runner and tests
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;

    /// Player ship (hitbox = triangle bounding box)
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Distance of the spawn point above the bottom edge
    pub const PLAYER_SPAWN_OFFSET: f32 = 100.0;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 15.0;
    pub const BULLET_SPEED: f32 = 10.0;
    /// Bullets above this y are gone
    pub const BULLET_EXIT_Y: f32 = -20.0;

    /// Enemies spawn this far above the top edge
    pub const ENEMY_SPAWN_Y: f32 = -50.0;
    /// Horizontal inset of the spawn band
    pub const ENEMY_SPAWN_INSET: f32 = 25.0;
    /// Enemies this far below the bottom edge are culled
    pub const ENEMY_EXIT_MARGIN: f32 = 50.0;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 20.0;
    pub const POWERUP_EXIT_MARGIN: f32 = 20.0;

    /// Particles
    pub const PARTICLE_LIFE: u32 = 30;
    pub const PARTICLE_MAX_SPEED: f32 = 4.0;
    pub const PARTICLE_MIN_RADIUS: f32 = 1.0;
    pub const PARTICLE_RADIUS_SPREAD: f32 = 3.0;
    /// Particles smaller than this are invisible and culled
    pub const PARTICLE_VISIBLE_RADIUS: f32 = 0.1;
    /// Hard upper bound on live particles
    pub const MAX_PARTICLES: usize = 2000;

    /// Burst sizes
    pub const SHOT_BURST: usize = 3;
    pub const HIT_BURST: usize = 20;
    pub const KILL_BURST: usize = 25;
    pub const PICKUP_BURST: usize = 15;
    /// Shot burst appears this far above the ship center
    pub const SHOT_BURST_OFFSET: f32 = 20.0;

    /// Virtual joystick travel radius (pixels)
    pub const JOYSTICK_RADIUS: f32 = 60.0;
}
