//! Frame driver and session state machine
//!
//! The host calls [`Game::frame`] once per display refresh and reschedules
//! itself unconditionally. Each frame runs at most one simulation tick (only
//! while playing) and always exactly one render.
//!
//! Valid transitions:
//! - Menu → Playing (`start`)
//! - Playing → Paused (`pause`, `visibility_lost`)
//! - Paused → Playing (`resume`)
//! - Paused → Menu (`back_to_menu`)
//! - Playing → Menu (lives exhausted, inside the tick)
//!
//! Anything else is a no-op.

use glam::Vec2;

use crate::renderer::{Scene, build_scene};
use crate::settings::{QualityPreset, Settings};
use crate::sim::{GameEvent, GamePhase, GameWorld, InputAggregator, Key, tick};
use crate::tuning::Tuning;

/// Something that can show a composed frame
pub trait FrameSink {
    fn present(&mut self, scene: &Scene);
}

/// Frames are dropped until the surface exists
impl<S: FrameSink> FrameSink for Option<S> {
    fn present(&mut self, scene: &Scene) {
        if let Some(sink) = self {
            sink.present(scene);
        }
    }
}

/// Sink that only counts what it was given (native runner, tests)
#[derive(Debug, Default)]
pub struct Headless {
    pub frames: u64,
    pub last_vertex_count: usize,
}

impl FrameSink for Headless {
    fn present(&mut self, scene: &Scene) {
        self.frames += 1;
        self.last_vertex_count = scene.vertices.len();
    }
}

/// Rolling frames-per-second estimate over the last 60 frames
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FrameClock {
    /// Record a frame timestamp (milliseconds)
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the one we'll overwrite next; it spans
        // len - 1 frame intervals up to this one
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                let intervals = (self.frame_times.len() - 1) as f64;
                self.fps = (intervals * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// One running game: world, input and the phase machine around them
pub struct Game {
    world: GameWorld,
    input: InputAggregator,
    settings: Settings,
    touch_capable: bool,
    events: Vec<GameEvent>,
    clock: FrameClock,
}

impl Game {
    /// `touch_capable` is the host's capability flag; the simulation never
    /// sniffs the platform itself.
    pub fn new(seed: u64, field: Vec2, tuning: Tuning, settings: Settings, touch_capable: bool) -> Self {
        let mut world = GameWorld::new(seed, field, tuning);
        world.particle_cap = settings.max_particles();
        let input = InputAggregator::new(settings.input_mode.resolve(touch_capable));
        Self {
            world,
            input,
            settings,
            touch_capable,
            events: Vec::new(),
            clock: FrameClock::default(),
        }
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    pub fn input(&self) -> &InputAggregator {
        &self.input
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    pub fn score(&self) -> u64 {
        self.world.score
    }

    pub fn lives(&self) -> u8 {
        self.world.lives
    }

    pub fn fps(&self) -> u32 {
        self.clock.fps()
    }

    /// Swap in new preferences (particle cap and input mode apply immediately)
    pub fn apply_settings(&mut self, settings: Settings) {
        self.world.particle_cap = settings.max_particles();
        self.input
            .set_mode(settings.input_mode.resolve(self.touch_capable));
        self.settings = settings;
    }

    /// Step to the next quality preset and apply it
    pub fn cycle_quality(&mut self) -> QualityPreset {
        let settings = Settings {
            quality: self.settings.quality.next(),
            ..self.settings.clone()
        };
        self.apply_settings(settings);
        log::info!("Quality set to {}", self.settings.quality.as_str());
        self.settings.quality
    }

    /// Play field resized (CSS pixels)
    pub fn resize(&mut self, width: f32, height: f32) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.world.field = Vec2::new(width, height);
        }
    }

    /// Events raised since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run one display frame
    pub fn frame(&mut self, time_ms: f64, sink: &mut impl FrameSink) {
        self.clock.record(time_ms);

        if self.world.phase == GamePhase::Playing {
            let input = self.input.sample(self.world.player.speed);
            let events = tick(&mut self.world, &input);
            self.events.extend(events);
        }

        let scene = build_scene(&self.world, time_ms, self.settings.star_count());
        sink.present(&scene);
    }

    // ------------------------------------------------------------------
    // Phase commands
    // ------------------------------------------------------------------

    /// Begin a fresh session; only valid from the menu
    pub fn start(&mut self, seed: u64) -> bool {
        if self.world.phase != GamePhase::Menu {
            return false;
        }
        self.world.reset(seed);
        log::info!("Session started with seed: {}", seed);
        self.set_phase(GamePhase::Playing);
        self.events.push(GameEvent::ScoreChanged {
            score: self.world.score,
        });
        self.events.push(GameEvent::LivesChanged {
            lives: self.world.lives,
        });
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.world.phase != GamePhase::Playing {
            return false;
        }
        self.set_phase(GamePhase::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.world.phase != GamePhase::Paused {
            return false;
        }
        self.set_phase(GamePhase::Playing);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.world.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::Menu => false,
        }
    }

    /// Abandon a paused session
    pub fn back_to_menu(&mut self) -> bool {
        if self.world.phase != GamePhase::Paused {
            return false;
        }
        self.set_phase(GamePhase::Menu);
        true
    }

    /// Page hidden or window blurred; never resumes on its own
    pub fn visibility_lost(&mut self) -> bool {
        // Key-up events won't arrive while hidden
        self.input.clear();
        let paused = self.pause();
        if paused {
            log::info!("Auto-paused (visibility lost)");
        }
        paused
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.world.phase;
        self.world.phase = to;
        log::info!("Phase {:?} -> {:?}", from, to);
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    // ------------------------------------------------------------------
    // Input forwarding
    // ------------------------------------------------------------------

    pub fn key_down(&mut self, key: &str) {
        if self.input.key_down(key) == Some(Key::Pause) {
            self.toggle_pause();
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    pub fn shoot_button(&mut self, pressed: bool) {
        self.input.shoot_button(pressed);
    }

    pub fn set_joystick_base(&mut self, base: Vec2) {
        self.input.set_joystick_base(base);
    }

    pub fn joystick_start(&mut self, pointer: Vec2) {
        self.input.joystick_start(pointer);
    }

    pub fn joystick_move(&mut self, pointer: Vec2) {
        self.input.joystick_move(pointer);
    }

    pub fn joystick_end(&mut self) {
        self.input.joystick_end();
    }
}
