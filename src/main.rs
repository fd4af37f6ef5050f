//! Piste Panic entry point
//!
//! Handles platform-specific initialization and drives the shell.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use piste_panic::hud::HudModel;
    use piste_panic::platform::web::{BrowserScheduler, FrameCallback};
    use piste_panic::renderer::{RenderState, ShapeBatch};
    use piste_panic::{Screen, Settings, Shell, Tuning};

    /// Game instance holding all state
    struct Game {
        shell: Shell<BrowserScheduler>,
        render_state: Option<RenderState>,
        batch: ShapeBatch,
        canvas: HtmlCanvasElement,
        document: Document,
    }

    impl Game {
        /// One animation frame: update and draw the run, present, sync the DOM
        fn frame(&mut self) {
            let canvas = self.render_state.is_some().then_some(&mut self.batch);
            if let Some(report) = self.shell.frame(canvas) {
                log::info!(
                    "Outcome {:?} after {} frames",
                    report.outcome,
                    report.frames
                );
            }
            self.render();
            self.sync_dom();
        }

        /// Render the current batch
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.batch) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let (w, h) = render_state.size;
                        let logical = render_state.logical_size;
                        render_state.resize(w, h, logical);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Match the backing store to the viewport height
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (physical, logical) = size_canvas(&window, &self.canvas, self.shell.tuning());
            self.batch.resize(logical);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(physical.0, physical.1, logical);
            }
        }

        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            if self.shell.start(seed) {
                log::info!("Run started with seed: {}", seed);
            }
            self.sync_dom();
        }

        /// Update overlay elements in the DOM
        fn sync_dom(&self) {
            let doc = &self.document;
            let screen = self.shell.screen();

            if let Some(root) = doc.get_element_by_id("app") {
                let _ = root.set_attribute("data-screen", screen.as_str());
            }
            set_hidden(doc, "menu", screen != Screen::Menu);
            set_hidden(doc, "hud", screen != Screen::Playing);
            set_hidden(doc, "result", !screen.is_result());
            if screen != Screen::Playing {
                set_hidden(doc, "hint", true);
            }
            set_hidden(doc, "autopilot-badge", !self.shell.autopilot());

            match screen {
                Screen::Menu => {
                    let best = self
                        .shell
                        .highscores()
                        .top_score()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    set_text(doc, "best-score", &best);
                }
                Screen::Playing => self.sync_hud(),
                Screen::Won | Screen::Exploded | Screen::Crashed => self.sync_result(),
            }
        }

        fn sync_hud(&self) {
            let doc = &self.document;
            let Some(state) = self.shell.run_state() else {
                return;
            };
            let hud = HudModel::from_state(state, self.shell.tuning());

            set_text(doc, "pressure-value", &hud.pressure_readout.to_string());
            if let Some(el) = doc.get_element_by_id("pressure-fill") {
                let _ = el.set_attribute("style", &format!("width: {:.1}%", hud.pressure_percent));
                let _ = el.set_attribute(
                    "class",
                    &format!("fill {}", hud.pressure_tier.css_class()),
                );
            }

            set_text(doc, "speed-value", &hud.speed_kmh.to_string());
            if let Some(el) = doc.get_element_by_id("speed-fill") {
                let _ = el.set_attribute("style", &format!("width: {:.1}%", hud.speed_percent));
                let class = if hud.speed_is_fast { "fill fast" } else { "fill" };
                let _ = el.set_attribute("class", class);
            }

            if let Some(el) = doc.get_element_by_id("progress-fill") {
                let _ = el.set_attribute(
                    "style",
                    &format!("width: {:.1}%", hud.progress_percent),
                );
            }

            set_hidden(
                doc,
                "hint",
                !(hud.show_hint && self.shell.settings().show_hint),
            );

            if let Some(el) = doc.get_element_by_id("labels") {
                let html: String = self
                    .batch
                    .labels()
                    .iter()
                    .map(|label| {
                        let [r, g, b, a] = label.color;
                        format!(
                            "<span class=\"label\" style=\"left:{:.0}px;top:{:.0}px;font-size:{:.0}px;color:rgba({},{},{},{:.2})\">{}</span>",
                            label.center.x,
                            label.center.y,
                            label.size,
                            (r * 255.0) as u8,
                            (g * 255.0) as u8,
                            (b * 255.0) as u8,
                            a,
                            label.text
                        )
                    })
                    .collect();
                el.set_inner_html(&html);
            }
        }

        fn sync_result(&self) {
            let doc = &self.document;
            let title = match self.shell.screen() {
                Screen::Won => "Made it!",
                Screen::Exploded => "Bladder burst!",
                _ => "Wipeout!",
            };
            set_text(doc, "result-title", title);
            set_text(doc, "result-score", &self.shell.display_score().to_string());

            match self.shell.rank() {
                Some(rank) => {
                    set_hidden(doc, "result-rank", false);
                    set_text(doc, "result-rank", rank.title());
                    if let Some(el) = doc.get_element_by_id("result-rank") {
                        let _ = el.set_attribute("class", &format!("rank {}", rank.tier()));
                    }
                }
                None => set_hidden(doc, "result-rank", true),
            }

            match self.shell.last_placement() {
                Some(place) => {
                    set_hidden(doc, "result-placement", false);
                    set_text(doc, "result-placement", &format!("#{} this session", place));
                }
                None => set_hidden(doc, "result-placement", true),
            }

            if let Some(el) = doc.get_element_by_id("labels") {
                el.set_inner_html("");
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    /// Size the canvas to the world width and the viewport height
    ///
    /// Returns the physical backing size and the logical drawing size.
    fn size_canvas(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        tuning: &Tuning,
    ) -> ((u32, u32), Vec2) {
        let dpr = window.device_pixel_ratio();
        let css_h = window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(800.0);
        let css_w = tuning.world_width as f64;

        let _ = canvas.set_attribute(
            "style",
            &format!("width: {}px; height: {}px", css_w, css_h),
        );
        let width = (css_w * dpr) as u32;
        let height = (css_h * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        ((width, height), Vec2::new(css_w as f32, css_h as f32))
    }

    /// Tuning overrides from `<script id="tuning" type="application/json">`
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
            .filter(|text| !text.trim().is_empty())
        else {
            return Tuning::default();
        };

        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning overrides: {}", e);
                Tuning::default()
            }
        }
    }

    async fn init_gpu(
        canvas: &HtmlCanvasElement,
        size: (u32, u32),
        logical: Vec2,
    ) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, size.0, size.1, logical).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to initialise renderer: {}", e);
                None
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Piste Panic starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let tuning = load_tuning(&document);
        let settings = Settings::from_query(&window.location().search().unwrap_or_default());
        log::info!("Settings: {:?}", settings);

        let (physical, logical) = size_canvas(&window, &canvas, &tuning);
        let render_state = init_gpu(&canvas, physical, logical).await;
        if render_state.is_none() {
            log::error!("WebGPU unavailable; the run will not be drawn");
        }

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let Some(scheduler) = BrowserScheduler::new(callback.clone()) else {
            log::error!("No frame scheduler available");
            return;
        };

        let game = Rc::new(RefCell::new(Game {
            shell: Shell::new(tuning, settings, scheduler),
            render_state,
            batch: ShapeBatch::new(logical),
            canvas: canvas.clone(),
            document: document.clone(),
        }));

        // Every frame request points at this closure
        {
            let game = game.clone();
            *callback.borrow_mut() = Some(Closure::new(move |_time: f64| {
                game.borrow_mut().frame();
            }));
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(game.clone());

        game.borrow().sync_dom();
        log::info!("Piste Panic ready!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer down - left or right half of the surface
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let width = canvas_clone.client_width() as f32;
                game.borrow_mut().shell.tap(event.offset_x() as f32, width);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => {
                        if g.shell.screen() != Screen::Playing {
                            event.prevent_default();
                            g.start();
                        }
                    }
                    "Escape" => {
                        if g.shell.return_to_menu() {
                            g.sync_dom();
                        }
                    }
                    "i" | "I" => {
                        g.shell.toggle_autopilot();
                        g.sync_dom();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        // Start and restart both begin a fresh run
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().start();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                if g.shell.return_to_menu() {
                    g.sync_dom();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Piste Panic (native) starting...");
    log::info!("Native mode runs headless autopilot demos - use `trunk serve` to play");

    demo_runs(5);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Let the autopilot ski a few runs and report how they went
#[cfg(not(target_arch = "wasm32"))]
fn demo_runs(count: u64) {
    use glam::Vec2;
    use piste_panic::platform::ManualScheduler;
    use piste_panic::renderer::ShapeBatch;
    use piste_panic::{Settings, Shell, Tuning};

    /// Far more frames than the bladder can last
    const FRAME_LIMIT: u32 = 10_000;

    let tuning = Tuning::default();
    let scheduler = ManualScheduler::new();
    let mut canvas = ShapeBatch::new(Vec2::new(tuning.world_width, 800.0));
    let mut shell = Shell::new(tuning, Settings::default(), scheduler.clone());
    shell.toggle_autopilot();

    for seed in 1..=count {
        shell.start(seed);

        let mut report = None;
        for _ in 0..FRAME_LIMIT {
            scheduler.fire();
            report = shell.frame(Some(&mut canvas));
            if report.is_some() {
                break;
            }
        }

        match report {
            Some(report) => match shell.rank() {
                Some(rank) => println!(
                    "Run {}: {:?} in {} frames, {} points ({})",
                    seed,
                    shell.screen(),
                    report.frames,
                    shell.display_score(),
                    rank.title()
                ),
                None => println!(
                    "Run {}: {:?} in {} frames",
                    seed,
                    shell.screen(),
                    report.frames
                ),
            },
            None => log::warn!("Run {} did not finish within {} frames", seed, FRAME_LIMIT),
        }
    }

    match shell.highscores().top_score() {
        Some(best) => println!("\nBest score this session: {}", best),
        None => println!("\nNo wins this session"),
    }
}
