//! Star Shooter entry point
//!
//! On the web this wires DOM events into [`star_shooter::Game`] and drives it
//! from `requestAnimationFrame`. Natively it runs a headless autopilot session
//! and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use star_shooter::platform;
    use star_shooter::renderer::RenderState;
    use star_shooter::sim::{GameEvent, GamePhase, Key};
    use star_shooter::{Game, QualityPreset, Settings, Tuning};

    /// Half the joystick knob size in CSS pixels
    const HANDLE_HALF: f32 = 25.0;

    /// Everything the page callbacks share
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        document: Document,
    }

    impl App {
        /// Match the field to the canvas' CSS size and the surface to its
        /// backing store
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let client_w = self.canvas.client_width().max(1);
            let client_h = self.canvas.client_height().max(1);
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);

            self.game.resize(client_w as f32, client_h as f32);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
        }

        /// Run one frame, then push drained events into the DOM
        fn frame(&mut self, time: f64) {
            self.game.frame(time, &mut self.render_state);
            self.update_hud();
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            for event in self.game.drain_events() {
                match event {
                    GameEvent::ScoreChanged { score } => {
                        set_text(&self.document, "scoreValue", &score.to_string());
                    }
                    GameEvent::LivesChanged { lives } => {
                        set_text(&self.document, "livesValue", &lives.to_string());
                    }
                    GameEvent::GameOver { final_score } => {
                        log::info!("Game over, final score {}", final_score);
                        set_text(
                            &self.document,
                            "startButton",
                            &format!("PLAY AGAIN (Score: {})", final_score),
                        );
                    }
                    GameEvent::PhaseChanged { to, .. } => self.show_screens(to),
                    GameEvent::PowerUpCollected { kind } => {
                        log::debug!("Picked up {:?}", kind);
                    }
                    _ => {}
                }
            }

            if self.game.settings().show_fps {
                set_text(&self.document, "fpsValue", &self.game.fps().to_string());
            }
        }

        fn show_screens(&self, phase: GamePhase) {
            let doc = &self.document;
            match phase {
                GamePhase::Playing => {
                    set_display(doc, "menuScreen", "none");
                    set_display(doc, "gameUI", "flex");
                    set_display(doc, "pauseScreen", "none");
                }
                GamePhase::Paused => {
                    set_display(doc, "pauseScreen", "flex");
                    set_text(doc, "pauseScore", &format!("Score: {}", self.game.score()));
                }
                GamePhase::Menu => {
                    set_display(doc, "menuScreen", "flex");
                    set_display(doc, "gameUI", "none");
                    set_display(doc, "pauseScreen", "none");
                }
            }
        }

        /// Draw the joystick knob where the stick currently points
        fn update_joystick_visual(&self) {
            let Some(container) = html_element(&self.document, "joystickContainer") else {
                return;
            };
            let Some(handle) = html_element(&self.document, "joystickHandle") else {
                return;
            };
            let center = Vec2::new(
                container.offset_width() as f32 / 2.0,
                container.offset_height() as f32 / 2.0,
            );
            let knob = center + self.game.input().joystick.handle_offset();
            let _ = handle.style().set_property(
                "transform",
                &format!(
                    "translate({}px, {}px)",
                    knob.x - HANDLE_HALF,
                    knob.y - HANDLE_HALF
                ),
            );
        }
    }

    fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_display(document: &Document, id: &str, display: &str) {
        if let Some(el) = html_element(document, id) {
            let _ = el.style().set_property("display", display);
        }
    }

    fn first_touch(event: &TouchEvent) -> Option<Vec2> {
        event
            .touches()
            .get(0)
            .map(|t| Vec2::new(t.client_x() as f32, t.client_y() as f32))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Star Shooter starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::load();
        let touch = platform::touch_capable();
        let seed = platform::session_seed();
        let field = Vec2::new(
            canvas.client_width().max(1) as f32,
            canvas.client_height().max(1) as f32,
        );
        let game = Game::new(seed, field, Tuning::default(), settings, touch);
        log::info!(
            "Game initialized (input mode {:?})",
            game.input().mode()
        );

        let app = Rc::new(RefCell::new(App {
            game,
            render_state: None,
            canvas: canvas.clone(),
            document: document.clone(),
        }));
        app.borrow_mut().resize();

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (width, height) = (canvas.width(), canvas.height());
        let render_state = RenderState::new(surface, &adapter, width, height).await;
        app.borrow_mut().render_state = Some(render_state);

        setup_keyboard(app.clone());
        setup_shoot_button(app.clone());
        setup_joystick(app.clone());
        setup_buttons(app.clone());
        setup_quality_button(app.clone());
        setup_auto_pause(app.clone());
        setup_resize(app.clone());

        // Start game loop
        request_animation_frame(app);

        log::info!("Star Shooter running!");
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if Key::from_dom_key(&key).is_some() {
                    event.prevent_default();
                }
                app.borrow_mut().game.key_down(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.key());
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_shoot_button(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(btn) = document.get_element_by_id("shootButton") else {
            return;
        };

        for (event_name, pressed) in [("mousedown", true), ("mouseup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.shoot_button(pressed);
            });
            let _ = btn.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for (event_name, pressed) in [("touchstart", true), ("touchend", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().game.shoot_button(pressed);
            });
            let _ = btn.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_joystick(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(container) = document.get_element_by_id("joystickContainer") else {
            return;
        };

        // Touch start: re-read the pad center, then engage
        {
            let app = app.clone();
            let pad = container.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let rect = pad.get_bounding_client_rect();
                let base = Vec2::new(
                    (rect.left() + pad.client_width() as f64 / 2.0) as f32,
                    (rect.top() + pad.client_height() as f64 / 2.0) as f32,
                );
                let mut a = app.borrow_mut();
                a.game.set_joystick_base(base);
                if let Some(point) = first_touch(&event) {
                    a.game.joystick_start(point);
                }
                a.update_joystick_visual();
            });
            let _ = container
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(point) = first_touch(&event) {
                    let mut a = app.borrow_mut();
                    a.game.joystick_move(point);
                    a.update_joystick_visual();
                }
            });
            let _ = container
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel
        for event_name in ["touchend", "touchcancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                a.game.joystick_end();
                a.update_joystick_visual();
            });
            let _ = container
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let actions: [(&str, fn(&mut Game)); 4] = [
            ("startButton", |g| {
                g.start(platform::session_seed());
            }),
            ("pauseButton", |g| {
                g.toggle_pause();
            }),
            ("resumeButton", |g| {
                g.resume();
            }),
            ("menuButton", |g| {
                g.back_to_menu();
            }),
        ];

        for (id, action) in actions {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{}", id);
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                action(&mut a.game);
                // Screens change right away, not on the next frame
                a.update_hud();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn quality_label(quality: QualityPreset) -> String {
        format!("QUALITY: {}", quality.as_str().to_uppercase())
    }

    /// Menu toggle: cycle the preset, apply it live and persist it
    fn setup_quality_button(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(btn) = document.get_element_by_id("qualityButton") else {
            return;
        };
        btn.set_text_content(Some(&quality_label(app.borrow().game.settings().quality)));

        let label = btn.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut a = app.borrow_mut();
            let quality = a.game.cycle_quality();
            a.game.settings().save();
            label.set_text_content(Some(&quality_label(quality)));
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    a.game.visibility_lost();
                    a.update_hud();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                a.game.visibility_lost();
                a.update_hud();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use star_shooter::consts::*;
    use star_shooter::game::Headless;
    use star_shooter::sim::{GameEvent, GamePhase};
    use star_shooter::{Game, Settings, Tuning, platform};

    /// Longest session the runner will simulate (five minutes)
    const MAX_FRAMES: u64 = 5 * 60 * TICKS_PER_SECOND;

    /// Horizontal slack before the autopilot steers
    const AIM_SLACK: f32 = 5.0;

    /// Usage: `star-shooter [seed] [tuning.json]`
    pub fn run() {
        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or_else(platform::session_seed);
        let tuning = match args.next() {
            Some(path) => match std::fs::read_to_string(&path) {
                Ok(json) => Tuning::from_json_or_default(&json),
                Err(e) => {
                    log::warn!("Can't read {}: {}", path, e);
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        };

        let field = Vec2::new(DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT);
        let mut game = Game::new(seed, field, tuning, Settings::default(), false);
        let mut sink = Headless::default();

        game.start(seed);
        // Fire continuously
        game.key_down(" ");

        let frame_ms = 1000.0 / TICKS_PER_SECOND as f64;
        let mut kills = 0u32;
        let mut pickups = 0u32;

        for frame in 0..MAX_FRAMES {
            steer(&mut game);
            game.frame(frame as f64 * frame_ms, &mut sink);

            for event in game.drain_events() {
                match event {
                    GameEvent::EnemyDestroyed { .. } => kills += 1,
                    GameEvent::PowerUpCollected { kind } => {
                        pickups += 1;
                        log::debug!("Frame {}: picked up {:?}", frame, kind);
                    }
                    GameEvent::LifeLost { lives } => {
                        log::info!("Frame {}: life lost, {} left", frame, lives);
                    }
                    GameEvent::GameOver { final_score } => {
                        log::info!("Frame {}: game over with {}", frame, final_score);
                    }
                    _ => {}
                }
            }

            if game.phase() != GamePhase::Playing {
                break;
            }
        }

        log::info!(
            "Seed {}: score {}, {} kills, {} pickups, {} frames rendered",
            seed,
            game.score(),
            kills,
            pickups,
            sink.frames
        );
        println!("{}", game.score());
    }

    /// Track the lowest enemy horizontally
    fn steer(game: &mut Game) {
        let world = game.world();
        let player_x = world.player.pos.x;
        let target = world
            .enemies
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.pos.x);

        let (left, right) = match target {
            Some(x) if x < player_x - AIM_SLACK => (true, false),
            Some(x) if x > player_x + AIM_SLACK => (false, true),
            _ => (false, false),
        };

        for (key, held) in [("ArrowLeft", left), ("ArrowRight", right)] {
            if held {
                game.key_down(key);
            } else {
                game.key_up(key);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Star Shooter (native) starting...");
    log::info!("Native mode runs a headless autopilot session - use `trunk serve` for the web version");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
