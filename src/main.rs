//! Horace Skis entry point
//!
//! The browser build is the playable game. The native binary runs headless
//! autopilot sessions against the real score file.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use horace_skis::consts::*;
    use horace_skis::highscores::LocalScoreStore;
    use horace_skis::platform::{FrameClock, SystemClock};
    use horace_skis::renderer::SdfRenderState;
    use horace_skis::sim::GameEvent;
    use horace_skis::ui::{Anchor, UiModel};
    use horace_skis::{Game, Settings, Tuning};

    /// Browser app holding the game plus everything tied to the page
    struct App {
        game: Game<LocalScoreStore>,
        settings: Settings,
        render_state: Option<SdfRenderState>,
        frames: FrameClock<SystemClock>,
        held_left: bool,
        held_right: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Last UI written to the DOM
        shown_ui: Option<UiModel>,
    }

    impl App {
        fn new(seed: u64) -> Self {
            Self {
                game: Game::new(seed, Tuning::default(), LocalScoreStore),
                settings: Settings::load(),
                render_state: None,
                frames: FrameClock::new(SystemClock::new()),
                held_left: false,
                held_right: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                shown_ui: None,
            }
        }

        fn sync_steer(&mut self) {
            self.game.set_steer(self.held_left, self.held_right);
        }

        fn release_keys(&mut self) {
            self.held_left = false;
            self.held_right = false;
            self.sync_steer();
        }

        /// Run simulation ticks
        fn update(&mut self, time: f64) {
            let dt = self.frames.delta(SIM_DT);
            for event in self.game.update(dt) {
                if let GameEvent::SpeedIncreased { .. } = event {
                    flash_hud();
                }
            }

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

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let scene = self.game.scene();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&scene, &self.settings, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Rebuild the text overlay when it changes
        fn update_ui(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let ui = self.game.ui();
            if self.shown_ui.as_ref() != Some(&ui) {
                if let Some(root) = document.get_element_by_id("ui") {
                    root.set_inner_html("");
                    for line in &ui.lines {
                        if let Err(e) = append_line(&document, &root, line) {
                            log::warn!("Could not draw UI line: {:?}", e);
                        }
                    }
                }
                self.shown_ui = Some(ui);
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                let _ = el
                    .class_list()
                    .toggle_with_force("hidden", !self.settings.show_fps);
            }
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }
        }
    }

    fn append_line(
        document: &Document,
        root: &web_sys::Element,
        line: &horace_skis::ui::UiLine,
    ) -> Result<(), JsValue> {
        let el = document.create_element("div")?;
        el.set_text_content(Some(&line.text));
        el.set_attribute("class", line.style.css_class())?;
        let [r, g, b] = line.style.color();
        let position = match line.anchor {
            Anchor::Center => format!(
                "top: {:.2}%; left: 50%; transform: translate(-50%, -50%);",
                line.y * 100.0
            ),
            Anchor::TopLeft => format!("top: {:.2}%; left: 10px;", line.y * 100.0),
        };
        let style = format!("{} color: rgb({}, {}, {});", position, r, g, b);
        el.set_attribute("style", &style)?;
        root.append_child(&el)?;
        Ok(())
    }

    /// Pulse the HUD on a speed-up
    fn flash_hud() {
        let el = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("ui"));
        if let Some(el) = el {
            let classes = el.class_list();
            let _ = classes.remove_1("pop");
            let _ = classes.add_1("pop");
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Horace Skis starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "not a canvas")?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed)));
        log::info!(
            "Game initialized with seed: {} (quality {})",
            seed,
            app.borrow().settings.quality.as_str()
        );

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = SdfRenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {}", e)))?;
        render_state.set_start_time(window.performance().map(|p| p.now()).unwrap_or(0.0));
        app.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&window, &document, app.clone());

        request_animation_frame(app);

        log::info!("Horace Skis running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, document: &Document, app: Rc<RefCell<App>>) {
        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => {
                        event.prevent_default();
                        a.held_left = true;
                        a.sync_steer();
                    }
                    "ArrowRight" => {
                        event.prevent_default();
                        a.held_right = true;
                        a.sync_steer();
                    }
                    "Enter" => a.game.press_start(),
                    "r" | "R" => a.game.press_restart(),
                    "i" | "I" => {
                        a.game.toggle_autopilot();
                    }
                    "q" | "Q" => {
                        a.settings.quality = a.settings.quality.next();
                        log::info!("Quality: {}", a.settings.quality.as_str());
                        a.settings.save();
                    }
                    "f" | "F" => {
                        a.settings.show_fps = !a.settings.show_fps;
                        a.settings.save();
                    }
                    "m" | "M" => {
                        a.settings.reduced_motion = !a.settings.reduced_motion;
                        a.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => a.held_left = false,
                    "ArrowRight" => a.held_right = false,
                    _ => return,
                }
                a.sync_steer();
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside) drops held keys, their keyup never arrives
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().release_keys();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Visibility change (tab switch, minimize)
        {
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().release_keys();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
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
        {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render(time);
            a.update_ui();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use horace_skis::consts::SIM_DT;
    use horace_skis::platform::{Clock, FrameClock, ManualClock};
    use horace_skis::sim::{GameEvent, GamePhase};
    use horace_skis::{FileScoreStore, Game, Tuning};

    /// Tuning overrides read from the working directory
    pub const TUNING_FILE: &str = "horace_tuning.json";
    /// Autopilot sessions per launch
    pub const DEMO_RUNS: u32 = 3;
    /// Give up on a run that the autopilot keeps alive this long
    const MAX_RUN_SECONDS: f64 = 600.0;

    /// Play `runs` autopilot sessions and record their scores
    pub fn run(runs: u32, seed: u64) {
        let tuning = Tuning::load(TUNING_FILE);
        let mut game = Game::new(seed, tuning, FileScoreStore::default());
        game.set_autopilot(true);

        let frame_ms = SIM_DT as f64 * 1000.0;
        let mut frames = FrameClock::new(ManualClock::new(0.0));

        for run in 1..=runs {
            game.press_start();
            let started_ms = frames.clock().now_ms();

            while game.phase() != GamePhase::GameOver {
                frames.clock().advance(frame_ms);
                for event in game.update(frames.delta(SIM_DT)) {
                    if let GameEvent::GameOver { score, cause } = event {
                        log::info!("Demo run {}: {} points ({:?})", run, score, cause);
                    }
                }
                if frames.clock().now_ms() - started_ms > MAX_RUN_SECONDS * 1000.0 {
                    log::warn!(
                        "Demo run {} still going after {}s at {} points, stopping",
                        run,
                        MAX_RUN_SECONDS,
                        game.state().score
                    );
                    return;
                }
            }

            game.press_restart();
            game.update(SIM_DT);
        }

        let board = game.high_scores();
        println!("High Scores:");
        for (i, score) in board.scores().iter().enumerate() {
            println!("{:>2}. {}", i + 1, score);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Horace Skis (native) starting...");
    log::info!("Native mode runs autopilot demos - run with `trunk serve` to play");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("Running {} demo runs with seed {}", demo::DEMO_RUNS, seed);

    demo::run(demo::DEMO_RUNS, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
