//! Data-driven game balance
//!
//! Every gameplay constant that isn't pure geometry lives here so it can be
//! overridden from JSON. Defaults are the shipped balance.

use serde::{Deserialize, Serialize};

use crate::consts::TICKS_PER_SECOND;

/// Hard ceiling on the life pool
pub const LIVES_CEILING: u8 = 5;

/// Longest boost a config may ask for (ten minutes)
pub const MAX_BOOST_TICKS: u64 = 10 * 60 * TICKS_PER_SECOND;

/// Slowest power-up fall; anything slower could never leave the field
const MIN_FALL_SPEED: f32 = 0.1;

/// Balance knobs consumed by the simulation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Per-tick probability of spawning an enemy
    pub enemy_spawn_chance: f64,
    /// Fraction of an enemy's rated speed used when homing
    pub enemy_steer_factor: f32,
    /// Total width of the per-axis jitter band (centered on zero)
    pub enemy_jitter: f32,
    /// Probability that a kill drops a power-up
    pub powerup_drop_chance: f64,
    /// Power-up fall speed (pixels/tick)
    pub powerup_fall_speed: f32,
    /// Lives at session start
    pub starting_lives: u8,
    /// Life pool ceiling
    pub max_lives: u8,
    /// Ticks between shots without a boost
    pub default_shoot_delay: u32,
    /// Lowest shoot delay a boost can reach
    pub min_shoot_delay: u32,
    /// Shoot delay reduction per rapid-fire pickup
    pub rapid_fire_reduction: u32,
    /// How long a rapid-fire boost lasts
    pub rapid_fire_ticks: u64,
    /// Score granted by the bonus power-up
    pub score_bonus: u64,
    /// Downward acceleration applied to particles (pixels/tick²)
    pub particle_gravity: f32,
    /// Per-tick particle radius multiplier
    pub particle_shrink: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemy_spawn_chance: 0.02,
            enemy_steer_factor: 0.7,
            enemy_jitter: 0.5,
            powerup_drop_chance: 0.2,
            powerup_fall_speed: 2.0,
            starting_lives: 3,
            max_lives: 5,
            default_shoot_delay: 15,
            min_shoot_delay: 5,
            rapid_fire_reduction: 3,
            rapid_fire_ticks: 10 * TICKS_PER_SECOND,
            score_bonus: 50,
            particle_gravity: 0.1,
            particle_shrink: 0.97,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut tuning: Self = serde_json::from_str(json)?;
        tuning.sanitize();
        Ok(tuning)
    }

    /// Parse overrides, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring malformed tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Clamp values that would break simulation invariants
    fn sanitize(&mut self) {
        self.enemy_spawn_chance = self.enemy_spawn_chance.clamp(0.0, 1.0);
        self.powerup_drop_chance = self.powerup_drop_chance.clamp(0.0, 1.0);
        self.max_lives = self.max_lives.clamp(1, LIVES_CEILING);
        self.starting_lives = self.starting_lives.clamp(1, self.max_lives);
        self.min_shoot_delay = self.min_shoot_delay.max(1);
        self.default_shoot_delay = self.default_shoot_delay.max(self.min_shoot_delay);
        self.rapid_fire_ticks = self.rapid_fire_ticks.min(MAX_BOOST_TICKS);
        // f32::max also maps NaN to the floor
        self.powerup_fall_speed = self.powerup_fall_speed.max(MIN_FALL_SPEED);
        self.enemy_steer_factor = self.enemy_steer_factor.max(0.0);
    }
}
