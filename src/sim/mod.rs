//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no wall-clock reads
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod state;
pub mod tick;

pub use collision::{circles_overlap, confine};
pub use input::{InputAggregator, InputMode, Joystick, Key, TickInput};
pub use state::{
    Bullet, Enemy, EnemyArchetype, GameEvent, GamePhase, GameWorld, Particle, ParticleTint,
    Player, PowerUp, PowerUpKind,
};
pub use tick::tick;
