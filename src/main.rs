//! Tilt Bar entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use tilt_bar::Settings;
    use tilt_bar::consts::*;
    use tilt_bar::renderer::{Scene, SdfRenderState};
    use tilt_bar::sim::{ClockChange, GameState, SimEvent, Viewport, tick};

    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<SdfRenderState>,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn new(settings: Settings, viewport: Viewport) -> Self {
            Self {
                state: GameState::new(&settings, viewport),
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                for event in tick(&mut self.state, SIM_DT) {
                    log_event(&event);
                }
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let scene = Scene::from_state(&self.state);
                match render_state.render(&scene) {
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

        fn key_down(&mut self, label: &str) {
            if let Some(key) = self.settings.bindings.resolve(label) {
                if self.state.input.on_key_down(key) == ClockChange::Started {
                    log::debug!("Actuation started ({key:?})");
                }
            }
        }

        fn key_up(&mut self, label: &str) {
            if let Some(key) = self.settings.bindings.resolve(label) {
                if self.state.input.on_key_up(key) == ClockChange::Stopped {
                    log::debug!("Actuation stopped");
                }
            }
        }
    }

    fn log_event(event: &SimEvent) {
        match event {
            SimEvent::FellIn(entry) if entry.winning => {
                log::info!("Ball fell into winning hole {}", entry.label)
            }
            SimEvent::FellIn(entry) => log::info!("Ball fell into hole {}", entry.label),
            SimEvent::Reset => log::info!("Table reset"),
            SimEvent::TransitionEnded => log::debug!("Post transition ended"),
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tilt Bar starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let container = document
            .get_element_by_id("container")
            .expect("no container");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Canvas matches the container, in physical pixels
        let dpr = window.device_pixel_ratio();
        let client_w = container.client_width();
        let client_h = container.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let viewport = Viewport::new(client_w as f32, client_h as f32);
        let game = Rc::new(RefCell::new(Game::new(settings, viewport)));

        log::info!(
            "Table {}x{} with {} holes",
            client_w,
            client_h,
            game.borrow().state.holes.len()
        );

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

        let render_state = SdfRenderState::new(surface, &adapter, width, height, dpr as f32).await;
        game.borrow_mut().render_state = Some(render_state);

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_input_handlers(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Tilt Bar running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().key_down(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: key-up events never arrive, so let go of everything
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if game.borrow_mut().state.input.release_all() == ClockChange::Stopped {
                    log::info!("Released held keys (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tilt Bar (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the playable web version");

    let path = std::env::args().nth(1);
    let settings = tilt_bar::Settings::load(path.as_deref());
    headless::run(&settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted playthrough against the simulation, for tuning without a browser
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use tilt_bar::Settings;
    use tilt_bar::consts::SIM_DT;
    use tilt_bar::sim::{ControlKey, GameState, SimEvent, Viewport, tick};

    /// (step, key, pressed)
    const SCRIPT: [(u64, ControlKey, bool); 6] = [
        (30, ControlKey::LeftUp, true),
        (90, ControlKey::LeftUp, false),
        (150, ControlKey::RightUp, true),
        (260, ControlKey::RightUp, false),
        (300, ControlKey::LeftUp, true),
        (340, ControlKey::LeftUp, false),
    ];
    const STEPS: u64 = 1200;

    pub fn run(settings: &Settings) {
        let mut state = GameState::new(settings, Viewport::new(1280.0, 720.0));
        log::info!("Table 1280x720 with {} holes", state.holes.len());

        let mut falls = 0;
        for step in 0..STEPS {
            for &(at, key, pressed) in SCRIPT.iter().filter(|(at, ..)| *at == step) {
                log::debug!("step {at}: {key:?} {}", if pressed { "down" } else { "up" });
                if pressed {
                    state.input.on_key_down(key);
                } else {
                    state.input.on_key_up(key);
                }
            }

            for event in tick(&mut state, SIM_DT) {
                match event {
                    SimEvent::FellIn(entry) => {
                        falls += 1;
                        log::info!(
                            "step {step}: fell into {} hole {}",
                            if entry.winning { "winning" } else { "plain" },
                            entry.label
                        );
                    }
                    SimEvent::Reset => log::info!("step {step}: reset"),
                    SimEvent::TransitionEnded => log::debug!("step {step}: transition ended"),
                }
            }
        }

        println!(
            "{} steps, {} falls, ball at {:.1} (v = {:.3}), posts at {:.0}/{:.0}",
            STEPS,
            falls,
            state.ball.position,
            state.ball.velocity,
            state.posts[0].offset,
            state.posts[1].offset
        );
        match serde_json::to_string_pretty(&state.ball) {
            Ok(json) => println!("{json}"),
            Err(e) => log::warn!("Could not serialize ball: {e}"),
        }
    }
}
