//! Brick Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use brick_rush::consts::*;
    use brick_rush::renderer::{CanvasRenderer, HudInfo};
    use brick_rush::sim::{GameEvent, GameState, TickInput, tick};
    use brick_rush::{HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        settings: Settings,
        highscores: HighScores,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(width: f32, renderer: CanvasRenderer, settings: Settings) -> Self {
            let mut state = GameState::new(width);
            state.miss_policy = settings.miss_policy;
            state.game_over_policy = settings.game_over_policy;
            Self {
                state,
                renderer,
                settings,
                highscores: HighScores::load(),
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause = false;
                self.input.drag_x = None;
            }

            self.handle_events();

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// React to events the simulation emitted this frame
        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::BrickDestroyed { column, row } => {
                        log::debug!("Brick destroyed at ({column}, {row})");
                    }
                    GameEvent::LifeLost { remaining } => {
                        log::info!("Life lost, {remaining} remaining");
                    }
                    GameEvent::StageCleared { stage } => {
                        log::info!("Stage {stage} cleared");
                    }
                    GameEvent::GameOver { score, stage } => {
                        let timestamp = js_sys::Date::now();
                        if let Some(rank) = self.highscores.add_score(score, stage, timestamp) {
                            log::info!("Game over: score {score} ranked #{rank}");
                            self.highscores.save();
                        } else {
                            log::info!("Game over: score {score}");
                        }
                    }
                    GameEvent::ReloadRequested => {
                        if let Some(window) = web_sys::window() {
                            let _ = window.location().reload();
                        }
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&self) {
            let hud = HudInfo {
                fps: if self.settings.show_fps {
                    Some(self.fps)
                } else {
                    None
                },
                best: self.highscores.top_score(),
            };
            self.renderer.render(&self.state, &hud);
        }

        /// Apply a viewport resize to canvas, renderer, and state
        fn resize(&mut self, canvas: &HtmlCanvasElement, viewport_width: f32) {
            let width = viewport_width.min(MAX_CANVAS_WIDTH);
            canvas.set_width(width as u32);
            canvas.set_height(TOTAL_HEIGHT as u32);
            self.renderer.resize(width, TOTAL_HEIGHT);
            self.state.resize(width);
        }
    }

    fn viewport_width(window: &web_sys::Window) -> f32 {
        window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .map(|w| w as f32)
            .unwrap_or(MAX_CANVAS_WIDTH)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Brick Rush starting...");

        // Missing window/document/canvas/context are fatal startup
        // preconditions, not silently skipped frames.
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let width = viewport_width(&window).min(MAX_CANVAS_WIDTH);
        canvas.set_width(width as u32);
        canvas.set_height(TOTAL_HEIGHT as u32);

        let renderer = CanvasRenderer::new(&canvas).expect("no 2d context");
        let settings = Settings::load();
        let touch_controls = settings.touch_controls;

        let game = Rc::new(RefCell::new(Game::new(width, renderer, settings)));
        log::info!("Game initialized at {width}px wide");

        setup_keyboard(game.clone());
        setup_touch_drag(&canvas, game.clone());
        if touch_controls {
            setup_touch_buttons(game.clone());
        }
        setup_resize(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Brick Rush running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Right" | "ArrowRight" => g.input.right = true,
                    "Left" | "ArrowLeft" => g.input.left = true,
                    "Escape" => g.input.pause = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Right" | "ArrowRight" => g.input.right = false,
                    "Left" | "ArrowLeft" => g.input.left = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch_drag(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            event.prevent_default();
            if let Some(touch) = event.touches().get(0) {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = touch.client_x() as f32 - rect.left() as f32;
                game.borrow_mut().input.drag_x = Some(x);
            }
        });
        let _ =
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// On-screen left/right buttons in the strip below the play area
    fn setup_touch_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window()
            .expect("no window")
            .document()
            .expect("no document");
        let body = document.body().expect("no body");

        let make_button = |label: &str, side: &str| -> web_sys::HtmlElement {
            let btn: web_sys::HtmlElement = document
                .create_element("button")
                .expect("create button")
                .dyn_into()
                .expect("not an element");
            btn.set_text_content(Some(label));
            let style = btn.style();
            let _ = style.set_property("position", "absolute");
            let _ = style.set_property("bottom", "50px");
            let _ = style.set_property(side, "50px");
            let _ = style.set_property("width", "100px");
            let _ = style.set_property("height", "100px");
            let _ = style.set_property("font-size", "40px");
            let _ = style.set_property("z-index", "10");
            body.append_child(&btn).expect("append button");
            btn
        };

        let left_btn = make_button("\u{25C0}", "left");
        let right_btn = make_button("\u{25B6}", "right");

        let press = |btn: &web_sys::HtmlElement,
                     event: &str,
                     game: Rc<RefCell<Game>>,
                     set: fn(&mut TickInput, bool),
                     value: bool| {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                set(&mut game.borrow_mut().input, value);
            });
            let _ = btn.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        };

        fn set_left(input: &mut TickInput, value: bool) {
            input.left = value;
        }
        fn set_right(input: &mut TickInput, value: bool) {
            input.right = value;
        }

        press(&left_btn, "touchstart", game.clone(), set_left, true);
        press(&left_btn, "touchend", game.clone(), set_left, false);
        press(&right_btn, "touchstart", game.clone(), set_right, true);
        press(&right_btn, "touchend", game, set_right, false);
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let window = web_sys::window().expect("no window");
            let width = viewport_width(&window);
            game.borrow_mut().resize(&canvas, width);
            log::info!("Resized canvas to {width}px");
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brick Rush (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    smoke_sim();
}

/// Headless simulation smoke run: a perfect paddle plays 30 seconds
#[cfg(not(target_arch = "wasm32"))]
fn smoke_sim() {
    use brick_rush::consts::*;
    use brick_rush::sim::{GamePhase, GameState, TickInput, tick};

    let mut state = GameState::new(960.0);
    let mut input = TickInput::default();

    for _ in 0..(30.0 / SIM_DT) as u64 {
        input.drag_x = Some(state.ball.pos.x);
        tick(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            log::debug!("{event:?}");
        }
    }

    assert_ne!(state.phase, GamePhase::GameOver, "perfect paddle never misses");
    assert!(state.lives == STARTING_LIVES);
    log::info!(
        "Smoke run: score {} on stage {} after {} ticks",
        state.score,
        state.stage,
        state.time_ticks
    );
    println!("✓ Simulation smoke run passed!");
}
