//! Irrigate entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement, MouseEvent};

    use irrigate::Settings;
    use irrigate::consts::*;
    use irrigate::renderer::CanvasRenderer;
    use irrigate::sim::{Game, PhysicsWorld, RapierWorld, TickInput};

    /// Everything the page keeps alive between frames
    struct App {
        game: Game<RapierWorld>,
        settings: Settings,
        renderer: Option<CanvasRenderer>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Mouse button held over the canvas
        pointer_held: bool,
        /// Meter percentage last written to the DOM
        shown_percentage: Option<f64>,
    }

    impl App {
        fn new(settings: Settings) -> Self {
            Self {
                game: Game::new(RapierWorld::new(), settings.tuning.clone()),
                settings,
                renderer: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                pointer_held: false,
                shown_percentage: None,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.game.tick(&self.input, SIM_DT);
                self.input.clear();
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        fn render(&mut self) {
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.render(&self.game.world().snapshot(), &self.settings);
            }
        }

        /// Push meter, start button and end-of-round panel into the DOM
        fn update_hud(&mut self, document: &Document) {
            if let Some(btn) = document
                .get_element_by_id("start-button")
                .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
            {
                btn.set_disabled(!self.game.start_enabled());
            }

            let meter = self.game.meter();
            if self.shown_percentage != Some(meter.percentage) {
                if let Some(bar) = document
                    .get_element_by_id("water-level-bar")
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                {
                    let style = bar.style();
                    let _ = style.set_property("height", &format!("{}%", meter.percentage));
                    let _ = style.set_property("background-color", meter.color());
                }
                self.shown_percentage = Some(meter.percentage);
            }

            if let Some(container) = document.get_element_by_id("message-container") {
                let classes = container.class_list();
                match self.game.message() {
                    Some(message) => {
                        let won = self.game.phase().outcome().is_some_and(|o| o.is_win());
                        let _ = classes.toggle_with_force("win", won);
                        let _ = classes.toggle_with_force("lose", !won);
                        if let Some(el) = document.get_element_by_id("message-title") {
                            el.set_text_content(Some(message.title));
                        }
                        if let Some(el) = document.get_element_by_id("message-text") {
                            el.set_text_content(Some(message.text));
                        }
                        let _ = classes.remove_1("hidden");
                    }
                    None => {
                        let _ = classes.add_1("hidden");
                    }
                }
            }
        }

        fn toggle_wireframes(&mut self) {
            self.settings.wireframes = !self.settings.wireframes;
            self.settings.save();
            log::info!("Wireframes: {}", self.settings.wireframes);
        }
    }

    /// Canvas-space position of a mouse event (the canvas may be CSS-scaled)
    fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
        let client_w = canvas.client_width().max(1) as f32;
        let client_h = canvas.client_height().max(1) as f32;
        Vec2::new(
            event.offset_x() as f32 * canvas.width() as f32 / client_w,
            event.offset_y() as f32 * canvas.height() as f32 / client_h,
        )
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Irrigate starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(GAME_WIDTH as u32);
        canvas.set_height(GAME_HEIGHT as u32);

        let settings = Settings::load();
        let app = Rc::new(RefCell::new(App::new(settings)));

        match CanvasRenderer::new(&canvas) {
            Ok(renderer) => app.borrow_mut().renderer = Some(renderer),
            Err(e) => log::error!("Canvas 2D unavailable: {:?}", e),
        }

        setup_pointer_handlers(&canvas, app.clone());
        setup_buttons(&document, app.clone());
        setup_keyboard(app.clone());

        request_animation_frame(app);

        log::info!("Irrigate running!");
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.pointer_held = true;
                a.input.pointer_down = true;
                // Pressed again before the release was applied: stay pressed
                a.input.pointer_up = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.pointer_held = false;
                a.input.pointer_up = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = canvas_point(&canvas_clone, &event);
                let mut a = app.borrow_mut();
                if a.pointer_held {
                    a.input.pointer_moves.push(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        let buttons: [(&str, fn(&mut TickInput)); 3] = [
            ("start-button", |input| input.start_flow = true),
            ("reset-button", |input| input.reset = true),
            ("next-level-button", |input| input.next_level = true),
        ];

        for (id, press) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{}", id);
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                press(&mut app.borrow_mut().input);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut app = app.borrow_mut();
            match event.key().as_str() {
                " " | "Enter" => app.input.start_flow = true,
                "r" | "R" => app.input.reset = true,
                "w" | "W" => app.toggle_wireframes(),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
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
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            a.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_hud(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Headless round: dig a shaft under the faucet, open it and report the result
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use irrigate::Settings;
    use irrigate::consts::*;
    use irrigate::sim::{Game, RapierWorld, TickInput};

    env_logger::init();
    log::info!("Irrigate (native) starting...");
    log::info!("Run with `trunk serve` for the playable web version");

    let settings = Settings::load();
    let mut game = Game::new(RapierWorld::new(), settings.tuning);

    // Two columns either side of the spout, top row to bottom row
    let moves = [FAUCET_SPOUT.0 - 10.0, FAUCET_SPOUT.0 + 10.0]
        .into_iter()
        .flat_map(|x| {
            (DIRT_FIRST_ROW..=DIRT_LAST_ROW).map(move |row| {
                Vec2::new(x, row as f32 * DIRT_BLOCK_SIZE + DIRT_BLOCK_SIZE / 2.0)
            })
        })
        .collect();
    game.tick(
        &TickInput {
            pointer_down: true,
            pointer_moves: moves,
            pointer_up: true,
            ..Default::default()
        },
        SIM_DT,
    );
    log::info!("{} dirt blocks left after digging", game.session().dirt.len());

    game.tick(
        &TickInput {
            start_flow: true,
            ..Default::default()
        },
        SIM_DT,
    );

    let idle = TickInput::default();
    let max_ticks = (20.0 / SIM_DT) as u32;
    for _ in 0..max_ticks {
        if game.phase().is_ended() {
            break;
        }
        game.tick(&idle, SIM_DT);
    }

    match game.phase().outcome() {
        Some(outcome) => log::info!(
            "{:?} with {:.1}% ({} particles in the pot) after {:.1}s",
            outcome,
            game.water_percentage(),
            game.water_in_pot(),
            game.now_ms() / 1000.0
        ),
        None => log::warn!("Round did not finish"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
