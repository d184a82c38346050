//! Flap Gates entry point
//!
//! Browser: wires the canvas 2D context, DOM events and requestAnimationFrame
//! to the orchestrator. Native: runs the game headless on autopilot and prints
//! a JSON summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, HtmlImageElement,
        KeyboardEvent, MouseEvent,
    };

    use flap_gates::renderer::{Assets, Color, ImageId, RenderSurface, TextStyle};
    use flap_gates::sim::Rect;
    use flap_gates::{FrameScheduler, Game, GameConfig, Hud};

    /// Image files, indexed by `ImageId` (see `Assets::default`)
    const IMAGE_SOURCES: [&str; 5] = [
        "assets/flyer.png",
        "assets/gate-0.png",
        "assets/gate-1.png",
        "assets/gate-2.png",
        "assets/banner.png",
    ];

    /// Canvas 2D implementation of the drawing capabilities
    struct CanvasSurface {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        images: Vec<HtmlImageElement>,
    }

    impl CanvasSurface {
        fn image(&self, image: ImageId) -> Option<&HtmlImageElement> {
            self.images.get(image.0)
        }
    }

    impl RenderSurface for CanvasSurface {
        fn clear(&mut self) {
            self.ctx.clear_rect(
                0.0,
                0.0,
                self.canvas.width() as f64,
                self.canvas.height() as f64,
            );
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx
                .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
        }

        fn draw_image(&mut self, image: ImageId, dest: Rect) {
            if let Some(img) = self.image(image) {
                let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    img,
                    dest.x as f64,
                    dest.y as f64,
                    dest.w as f64,
                    dest.h as f64,
                );
            }
        }

        fn draw_image_rotated(&mut self, image: ImageId, dest: Rect, angle: f32) {
            let Some(img) = self.image(image) else {
                return;
            };
            let center = dest.center();
            self.ctx.save();
            let _ = self.ctx.translate(center.x as f64, center.y as f64);
            let _ = self.ctx.rotate(angle as f64);
            let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                img,
                -dest.w as f64 / 2.0,
                -dest.h as f64 / 2.0,
                dest.w as f64,
                dest.h as f64,
            );
            self.ctx.restore();
        }

        fn draw_text(&mut self, text: &str, pos: Vec2, style: &TextStyle) {
            self.ctx.set_fill_style_str(&style.color.to_css());
            self.ctx.set_font(style.font);
            self.ctx.set_text_align(style.align.as_str());
            let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
            self.ctx.set_text_align("left");
        }

        fn image_size(&self, image: ImageId) -> Option<Vec2> {
            let img = self.image(image)?;
            if img.complete() && img.natural_width() > 0 && img.natural_height() > 0 {
                Some(Vec2::new(
                    img.natural_width() as f32,
                    img.natural_height() as f32,
                ))
            } else {
                None
            }
        }
    }

    /// Score box and restart button
    struct DomHud {
        score_box: Option<HtmlElement>,
        restart_btn: Option<HtmlElement>,
    }

    impl Hud for DomHud {
        fn show_score(&mut self, score: u32) {
            if let Some(el) = &self.score_box {
                el.set_text_content(Some(&format!("Score: {}", score)));
            }
        }

        fn show_restart(&mut self, top: f32) {
            if let Some(btn) = &self.restart_btn {
                let style = btn.style();
                let _ = style.set_property("display", "block");
                let _ = style.set_property("top", &format!("{}px", top));
            }
        }

        fn hide_restart(&mut self) {
            if let Some(btn) = &self.restart_btn {
                let _ = btn.style().set_property("display", "none");
            }
        }
    }

    /// Records frame requests; the loop turns them into animation frames
    #[derive(Default)]
    struct FrameRequest {
        requested: bool,
    }

    impl FrameRequest {
        fn take(&mut self) -> bool {
            std::mem::take(&mut self.requested)
        }
    }

    impl FrameScheduler for FrameRequest {
        fn schedule_next_frame(&mut self) {
            self.requested = true;
        }
    }

    struct App {
        game: Game,
        surface: CanvasSurface,
        hud: DomHud,
        frames: FrameRequest,
    }

    fn html_element(id: &str) -> Option<HtmlElement> {
        web_sys::window()?
            .document()?
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    /// Optional `<script id="game-config" type="application/json">` block
    fn load_config() -> GameConfig {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("game-config"))
            .and_then(|el| el.text_content());
        match json {
            Some(json) => GameConfig::from_json_or_default(&json),
            None => GameConfig::default(),
        }
    }

    fn load_images() -> Vec<HtmlImageElement> {
        IMAGE_SOURCES
            .iter()
            .filter_map(|src| {
                let img = HtmlImageElement::new().ok()?;
                img.set_src(src);
                Some(img)
            })
            .collect()
    }

    /// Match the canvas to the window and tell the game
    fn fit_canvas(app: &mut App) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        app.surface.canvas.set_width(width as u32);
        app.surface.canvas.set_height(height as u32);
        app.game.resize(width as f32, height as f32);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flap Gates starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let config = load_config();
        let app = Rc::new(RefCell::new(App {
            game: Game::new(seed, config, Assets::default()),
            surface: CanvasSurface {
                canvas,
                ctx,
                images: load_images(),
            },
            hud: DomHud {
                score_box: html_element("scoreBox"),
                restart_btn: html_element("restart"),
            },
            frames: FrameRequest::default(),
        }));
        log::info!("Game initialized with seed: {}", seed);

        {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            fit_canvas(a);
            a.game.start(&mut a.frames, &mut a.hud);
        }

        setup_input_handlers(app.clone());
        setup_restart_button(app.clone());
        setup_resize(app.clone());

        pump(app);

        log::info!("Flap Gates running!");
    }

    /// Turn a pending frame request into an animation frame callback
    fn pump(app: Rc<RefCell<App>>) {
        let requested = app.borrow_mut().frames.take();
        if requested {
            request_animation_frame(app);
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            a.game.run_frame(&mut a.surface, &mut a.frames, &mut a.hud);
        }
        pump(app);
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard: Space flaps, A toggles autopilot
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        a.game.request_impulse();
                    }
                    "KeyA" => {
                        let on = !a.game.autopilot();
                        a.game.set_autopilot(on);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click / tap anywhere flaps
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().game.request_impulse();
            });
            let _ = window
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(app: Rc<RefCell<App>>) {
        let Some(btn) = html_element("restart") else {
            log::warn!("No restart button found");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            // Keep the click from reaching the window flap handler
            event.stop_propagation();
            {
                let mut guard = app.borrow_mut();
                let a = &mut *guard;
                a.game.restart(&mut a.frames, &mut a.hud);
            }
            pump(app.clone());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            fit_canvas(&mut app.borrow_mut());
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;
    use serde::Serialize;

    use flap_gates::renderer::{Assets, RecordingSurface};
    use flap_gates::sim::GameState;
    use flap_gates::{FrameScheduler, Game, GameConfig, Hud};

    const DEFAULT_FRAMES: u64 = 5000;
    const DEFAULT_SEED: u64 = 1;

    #[derive(Default)]
    struct ManualScheduler {
        pending: bool,
    }

    impl FrameScheduler for ManualScheduler {
        fn schedule_next_frame(&mut self) {
            self.pending = true;
        }
    }

    struct LogHud;

    impl Hud for LogHud {
        fn show_score(&mut self, score: u32) {
            log::debug!("Score: {}", score);
        }

        fn show_restart(&mut self, top: f32) {
            log::debug!("Restart shown at {}px", top);
        }

        fn hide_restart(&mut self) {}
    }

    #[derive(Serialize)]
    struct RunRecord {
        score: u32,
        ticks: u64,
    }

    #[derive(Serialize)]
    struct Summary<'a> {
        seed: u64,
        frames: u64,
        runs: Vec<RunRecord>,
        best: Option<u32>,
        draw_calls: usize,
        final_state: &'a GameState,
    }

    fn load_config(path: Option<String>) -> GameConfig {
        let Some(path) = path else {
            return GameConfig::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => GameConfig::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Cannot read config {}: {}", path, e);
                GameConfig::default()
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let max_frames = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_FRAMES);
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        let config = load_config(args.next());

        let assets = Assets::default();
        let mut surface = RecordingSurface::new();
        surface.set_image_size(assets.flyer, Vec2::new(34.0, 24.0));
        surface.set_image_size(assets.banner, Vec2::new(600.0, 300.0));

        let mut game = Game::new(seed, config, assets);
        let mut scheduler = ManualScheduler::default();
        let mut hud = LogHud;

        game.set_autopilot(true);
        game.resize(480.0, 640.0);
        game.start(&mut scheduler, &mut hud);

        log::info!("Headless run: {} frames, seed {}", max_frames, seed);

        let mut frames = 0;
        let mut runs = Vec::new();
        while frames < max_frames {
            if !std::mem::take(&mut scheduler.pending) {
                // Loop stopped on the terminal frame
                let session = &game.state().session;
                runs.push(RunRecord {
                    score: session.score,
                    ticks: session.ticks,
                });
                game.restart(&mut scheduler, &mut hud);
                continue;
            }
            game.run_frame(&mut surface, &mut scheduler, &mut hud);
            frames += 1;
        }

        let summary = Summary {
            seed,
            frames,
            runs,
            best: game.high_scores().top_score(),
            draw_calls: surface.total_calls(),
            final_state: game.state(),
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to encode summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flap Gates (native) starting...");
    log::info!("Browser build runs with `trunk serve`; native mode runs headless on autopilot");
    headless::run();
}
