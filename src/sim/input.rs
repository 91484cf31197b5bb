//! Input aggregation
//!
//! Folds keyboard, the on-screen shoot button and the virtual joystick into
//! one [`TickInput`] per tick. Nothing here moves the ship; the tick does.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::JOYSTICK_RADIUS;

/// Per-axis scale that keeps diagonal speed equal to axial speed
const DIAGONAL_SCALE: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Joystick y below this counts as thrusting forward
const THRUST_DEADZONE: f32 = -0.1;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Displacement to apply this tick (pixels)
    pub movement: Vec2,
    /// Fire while held
    pub shoot: bool,
    /// Forward intent (draws the thruster)
    pub thrust: bool,
}

/// How the host delivers movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputMode {
    #[default]
    Keyboard,
    /// Touch screen with a virtual joystick
    Touch,
}

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Fire,
    Pause,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value; both arrows and WASD are bound
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "arrowleft" | "a" => Some(Key::Left),
            "arrowright" | "d" => Some(Key::Right),
            "arrowup" | "w" => Some(Key::Up),
            "arrowdown" | "s" => Some(Key::Down),
            " " | "spacebar" => Some(Key::Fire),
            "p" | "escape" => Some(Key::Pause),
            _ => None,
        }
    }
}

/// Virtual joystick driven by pointer events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joystick {
    /// Center of the joystick pad (client coordinates)
    pub base: Vec2,
    pub radius: f32,
    /// Unit vector (or zero)
    pub direction: Vec2,
    /// Deflection in [0, 1]
    pub magnitude: f32,
    pub active: bool,
}

impl Default for Joystick {
    fn default() -> Self {
        Self {
            base: Vec2::ZERO,
            radius: JOYSTICK_RADIUS,
            direction: Vec2::ZERO,
            magnitude: 0.0,
            active: false,
        }
    }
}

impl Joystick {
    pub fn start(&mut self, pointer: Vec2) {
        self.active = true;
        self.track(pointer);
    }

    /// Update deflection from a pointer position; ignored while inactive
    pub fn track(&mut self, pointer: Vec2) {
        if !self.active || !pointer.is_finite() {
            return;
        }
        let delta = pointer - self.base;
        let distance = delta.length();
        self.magnitude = (distance / self.radius).min(1.0);
        self.direction = if distance > 0.0 {
            delta / distance
        } else {
            Vec2::ZERO
        };
    }

    pub fn end(&mut self) {
        self.active = false;
        self.magnitude = 0.0;
        self.direction = Vec2::ZERO;
    }

    /// Handle offset from the pad center, for drawing the knob
    pub fn handle_offset(&self) -> Vec2 {
        self.direction * self.magnitude * self.radius
    }
}

/// Raw input state accumulated between ticks
#[derive(Debug, Clone, Default)]
pub struct InputAggregator {
    mode: InputMode,
    held: HashSet<Key>,
    /// On-screen shoot button
    shoot_button: bool,
    pub joystick: Joystick,
}

impl InputAggregator {
    pub fn new(mode: InputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    /// Record a key press; returns the parsed key so the driver can react
    /// to controls like pause
    pub fn key_down(&mut self, key: &str) -> Option<Key> {
        let key = Key::from_dom_key(key)?;
        if key != Key::Pause {
            self.held.insert(key);
        }
        Some(key)
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(key) = Key::from_dom_key(key) {
            self.held.remove(&key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn shoot_button(&mut self, pressed: bool) {
        self.shoot_button = pressed;
    }

    pub fn set_joystick_base(&mut self, base: Vec2) {
        if base.is_finite() {
            self.joystick.base = base;
        }
    }

    pub fn joystick_start(&mut self, pointer: Vec2) {
        if pointer.is_finite() {
            self.joystick.start(pointer);
        }
    }

    pub fn joystick_move(&mut self, pointer: Vec2) {
        self.joystick.track(pointer);
    }

    pub fn joystick_end(&mut self) {
        self.joystick.end();
    }

    /// Drop everything held (focus loss, session start)
    pub fn clear(&mut self) {
        self.held.clear();
        self.shoot_button = false;
        self.joystick.end();
    }

    /// Build this tick's input for a ship moving at `speed` pixels/tick
    pub fn sample(&self, speed: f32) -> TickInput {
        let movement = if self.mode == InputMode::Touch && self.joystick.active {
            self.joystick.direction * self.joystick.magnitude.clamp(0.0, 1.0) * speed
        } else {
            self.keyboard_vector(speed)
        };

        let thrust = self.is_held(Key::Up)
            || (self.joystick.active && self.joystick.direction.y < THRUST_DEADZONE);

        TickInput {
            movement,
            shoot: self.shoot_button || self.is_held(Key::Fire),
            thrust,
        }
    }

    fn keyboard_vector(&self, speed: f32) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.is_held(Key::Left) {
            v.x -= speed;
        }
        if self.is_held(Key::Right) {
            v.x += speed;
        }
        if self.is_held(Key::Up) {
            v.y -= speed;
        }
        if self.is_held(Key::Down) {
            v.y += speed;
        }
        if v.x != 0.0 && v.y != 0.0 {
            v *= DIAGONAL_SCALE;
        }
        v
    }
}
