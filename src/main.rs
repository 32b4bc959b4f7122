//! Juggler entry point
//!
//! Handles platform-specific initialization and drives the fixed-step scheduler.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement,
        MouseEvent, TouchEvent,
    };

    use juggler::platform::{PointerHands, PointerId};
    use juggler::sim::{FixedStepScheduler, FrameHost, Snapshot, World};
    use juggler::{CeilingMode, WorldConfig};

    /// Acceleration arrows are tiny per tick; scale them up to be visible
    const ACCEL_DRAW_SCALE: f64 = 20.0;

    /// Canvas 2D render adapter
    struct CanvasHost {
        ctx: CanvasRenderingContext2d,
        width: f64,
        height: f64,
        wants_frame: bool,
    }

    impl CanvasHost {
        fn circle(&self, pos: Vec2, radius: f32) {
            self.ctx.begin_path();
            let _ = self
                .ctx
                .arc(pos.x as f64, pos.y as f64, radius as f64, 0.0, TAU);
            self.ctx.stroke();
        }

        fn line(&self, from: Vec2, delta: Vec2) {
            self.ctx.begin_path();
            self.ctx.move_to(from.x as f64, from.y as f64);
            self.ctx.line_to(
                from.x as f64 + delta.x as f64 * ACCEL_DRAW_SCALE,
                from.y as f64 + delta.y as f64 * ACCEL_DRAW_SCALE,
            );
            self.ctx.stroke();
        }
    }

    impl FrameHost for CanvasHost {
        fn request_frame(&mut self) {
            self.wants_frame = true;
        }

        fn state_changed(&mut self, snapshot: &Snapshot) {
            self.ctx.clear_rect(0.0, 0.0, self.width, self.height);

            self.ctx.set_stroke_style_str("red");
            for ball in &snapshot.balls {
                self.circle(ball.pos, snapshot.ball_radius);
            }
            if snapshot.show_acceleration {
                self.ctx.set_stroke_style_str("blue");
                for ball in &snapshot.balls {
                    self.line(ball.pos, ball.acceleration);
                }
            }

            self.ctx.set_stroke_style_str("black");
            for hand in &snapshot.hands {
                self.circle(hand.pos, snapshot.hand_radius);
            }
        }
    }

    /// App instance holding all state
    struct App {
        world: World,
        scheduler: FixedStepScheduler,
        input: PointerHands,
        host: CanvasHost,
        canvas: HtmlCanvasElement,
    }

    impl App {
        /// Canvas-relative position of a touch
        fn touch_pos(&self, touch: &web_sys::Touch) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(
                (touch.client_x() as f64 - rect.left()) as f32,
                (touch.client_y() as f64 - rect.top()) as f32,
            )
        }

        /// Rebind hands to the event's current touch list
        fn sync_touches(&mut self, event: &TouchEvent) {
            let touches = event.touches();
            let mut active = Vec::with_capacity(touches.length() as usize);
            for i in 0..touches.length() {
                if let Some(touch) = touches.get(i) {
                    let pos = self.touch_pos(&touch);
                    let pointer = PointerId::Touch(touch.identifier());
                    self.input.pointer_down(&mut self.world, pointer, pos);
                    active.push(touch.identifier());
                }
            }
            self.input.retain_touches(&mut self.world, &active);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Juggler starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
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

        // Leave room below the field for the control panel
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .map(|h| h - 100.0)
            .unwrap_or(600.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let mut config = WorldConfig::default();
        if let Err(e) = config.set_bounds(width as f32, height as f32) {
            log::warn!("Window too small ({}), using default field", e);
        }

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App {
            world: World::new(config, seed),
            scheduler: FixedStepScheduler::default(),
            input: PointerHands::new(),
            host: CanvasHost {
                ctx,
                width,
                height,
                wants_frame: false,
            },
            canvas: canvas.clone(),
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_controls(&document, app.clone());

        {
            let mut a = app.borrow_mut();
            let snapshot = a.world.snapshot();
            a.host.state_changed(&snapshot);
            a.scheduler.start(js_sys::Date::now());
        }
        request_animation_frame(app);

        log::info!("Juggler running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Mouse move - the mouse owns one hand for the whole session
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let a = &mut *a;
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                a.input.pointer_move(&mut a.world, PointerId::Mouse, pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start/move/end all resync against the current touch list
        for name in ["touchstart", "touchmove", "touchend", "touchcancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().sync_touches(&event);
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_controls(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        // Gravity slider
        if let Some(input) = document
            .get_element_by_id("gravity-toggle")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&app.borrow().world.config().gravity().to_string());
            let app = app.clone();
            let slider = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                match slider.value().parse::<f32>() {
                    Ok(g) => {
                        let _ = app.borrow_mut().world.set_gravity(g);
                    }
                    Err(_) => log::warn!("Gravity slider value is not a number"),
                }
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Ceiling mode select
        if let Some(select) = document
            .get_element_by_id("ceiling-mode")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            let app = app.clone();
            let picker = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(mode) = CeilingMode::from_str(&picker.value()) {
                    app.borrow_mut().world.set_ceiling_mode(mode);
                }
            });
            let _ =
                select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Spawn button
        if let Some(btn) = document.get_element_by_id("spawn-ball") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().world.spawn_ball();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Acceleration overlay
        if let Some(checkbox) = document
            .get_element_by_id("show-acceleration")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let toggle = checkbox.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut()
                    .world
                    .set_damping_visualization(toggle.checked());
            });
            let _ = checkbox
                .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            on_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_frame(app: Rc<RefCell<App>>) {
        let wants_frame = {
            let mut a = app.borrow_mut();
            let App {
                world,
                scheduler,
                host,
                ..
            } = &mut *a;
            host.wants_frame = false;
            scheduler.on_frame(world, js_sys::Date::now(), host);
            host.wants_frame
        };
        if wants_frame {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_host::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use juggler::WorldConfig;
    use juggler::sim::{FixedStepScheduler, FrameHost, HandId, Snapshot, World};

    /// Simulated display refresh
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const RUN_SECONDS: f64 = 20.0;
    const SPAWN_AT_MS: f64 = 5000.0;

    #[derive(Default)]
    struct HeadlessHost {
        wants_frame: bool,
        redraws: u64,
        last: Option<Snapshot>,
    }

    impl FrameHost for HeadlessHost {
        fn request_frame(&mut self) {
            self.wants_frame = true;
        }

        fn state_changed(&mut self, snapshot: &Snapshot) {
            self.redraws += 1;
            self.last = Some(snapshot.clone());
        }
    }

    /// Steer the hand under the lowest falling ball and lift into it
    fn autopilot(world: &mut World, hand: HandId) {
        let config = world.config();
        let rest_y = config.height() - config.hand_radius() / 2.0;
        let half = config.height() / 2.0;
        let target = world
            .balls
            .iter()
            .filter(|b| b.vel.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|b| {
                if b.pos.y > half {
                    b.pos
                } else {
                    glam::Vec2::new(b.pos.x, rest_y)
                }
            });
        if let Some(target) = target {
            world.set_hand_target(hand, target);
        }
    }

    pub fn load_config(path: &str) -> WorldConfig {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Cannot read config {}: {}", path, e);
                return WorldConfig::default();
            }
        };
        match WorldConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::error!("Invalid config {}: {}", path, e);
                WorldConfig::default()
            }
        }
    }

    pub fn run(config: WorldConfig, seed: u64) {
        let mut world = World::new(config, seed);
        let start_x = world.config().width() / 2.0;
        let start_y = world.config().height();
        let hand = world.add_hand(glam::Vec2::new(start_x, start_y));

        let mut scheduler = FixedStepScheduler::default();
        let mut host = HeadlessHost::default();
        let mut spawned = false;

        let mut now = 0.0;
        scheduler.start(now);
        host.wants_frame = true;
        while host.wants_frame && now < RUN_SECONDS * 1000.0 {
            now += FRAME_MS;
            if !spawned && now >= SPAWN_AT_MS {
                world.spawn_ball();
                spawned = true;
            }
            autopilot(&mut world, hand);
            host.wants_frame = false;
            scheduler.on_frame(&mut world, now, &mut host);
        }
        scheduler.stop();

        log::info!(
            "Ran {} ticks over {} redraws ({} balls)",
            world.time_ticks,
            host.redraws,
            world.balls.len()
        );

        match host.last.as_ref().map(serde_json::to_string_pretty) {
            Some(Ok(json)) => println!("{}", json),
            Some(Err(e)) => log::error!("Snapshot export failed: {}", e),
            None => log::warn!("No ticks ran"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Juggler (native) starting...");
    log::info!("Headless run - serve the wasm build for the interactive version");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => headless::load_config(&path),
        None => juggler::WorldConfig::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5eed);
    headless::run(config, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
