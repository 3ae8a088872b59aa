//! Cactus Dash entry point
//!
//! Browser: wires DOM events to the run controller and drives frames with
//! requestAnimationFrame. Native: plays a few autopiloted runs headlessly.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use cactus_dash::leaderboard::AnyLeaderboard;
    use cactus_dash::platform::FrameLatch;
    use cactus_dash::platform::web::{DialogPrompt, DomHud, TimeoutDelay};
    use cactus_dash::sim::{RunPhase, StepOutcome};
    use cactus_dash::{RunController, Settings};

    type Controller = RunController<AnyLeaderboard, DialogPrompt, DomHud, TimeoutDelay>;

    /// Game instance shared by the event handlers
    struct Game {
        /// `None` while the post-run flow owns the controller
        controller: Option<Controller>,
        /// Viewport size seen while the controller was away
        pending_resize: Option<(f32, f32)>,
    }

    fn viewport() -> Option<(f32, f32)> {
        let window = web_sys::window()?;
        let w = window.inner_width().ok()?.as_f64()?;
        let h = window.inner_height().ok()?.as_f64()?;
        Some((w as f32, h as f32))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cactus Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let leaderboard = AnyLeaderboard::from_url(settings.leaderboard_url.as_deref());

        let mut controller = RunController::new(
            &settings,
            seed,
            leaderboard,
            DialogPrompt,
            DomHud::new(document),
            TimeoutDelay,
        );
        if let Some((w, h)) = viewport() {
            controller.resize(w, h);
        }

        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            controller: Some(controller),
            pending_resize: None,
        }));

        setup_resize(game.clone());
        setup_keyboard(game.clone());
        setup_visibility(settings.reload_on_hidden);

        log::info!("Cactus Dash ready, press any key");
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some((w, h)) = viewport() else {
                return;
            };
            let mut g = game.borrow_mut();
            match g.controller.as_mut() {
                Some(controller) => controller.resize(w, h),
                None => g.pending_resize = Some((w, h)),
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut latch = FrameLatch::default();
            {
                let mut g = game.borrow_mut();
                let Some(controller) = g.controller.as_mut() else {
                    log::debug!("Input ignored during post-run flow");
                    return;
                };
                let code = event.code();
                match code.as_str() {
                    "KeyI" => {
                        let enabled = !controller.autopilot();
                        controller.set_autopilot(enabled);
                        log::info!("Autopilot: {}", enabled);
                        return;
                    }
                    "Space" | "ArrowUp" => {
                        event.prevent_default();
                    }
                    // Any key starts a run; only the jump keys jump
                    _ if controller.phase() == RunPhase::Running => return,
                    _ => {}
                }
                controller.activate(&mut latch);
            }
            if latch.wants_frame() {
                request_animation_frame(game.clone());
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_visibility(reload_on_hidden: bool) {
        let document = web_sys::window().unwrap().document().unwrap();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() != web_sys::VisibilityState::Visible {
                if reload_on_hidden {
                    log::warn!("Tab hidden, reloading");
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().reload();
                    }
                } else {
                    log::warn!("Tab hidden");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
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
        let mut latch = FrameLatch::default();
        let outcome = {
            let mut g = game.borrow_mut();
            let Some(controller) = g.controller.as_mut() else {
                return;
            };
            controller.frame(time, &mut latch)
        };

        if latch.wants_frame() {
            request_animation_frame(game);
        } else if outcome == Some(StepOutcome::Collision) {
            conclude_run(game);
        }
    }

    /// Hand the controller to the post-run flow, then give it back
    fn conclude_run(game: Rc<RefCell<Game>>) {
        let Some(mut controller) = game.borrow_mut().controller.take() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            controller.conclude().await;
            let mut g = game.borrow_mut();
            if let Some((w, h)) = g.pending_resize.take() {
                controller.resize(w, h);
            }
            g.controller = Some(controller);
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Autopiloted runs played by the native demo
#[cfg(not(target_arch = "wasm32"))]
const DEMO_RUNS: u32 = 5;
/// Frame cadence of the native demo (ms)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_FRAME_MS: f64 = 16.0;
/// A run still alive after this long is abandoned (ms)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_MAX_RUN_MS: f64 = 5.0 * 60.0 * 1000.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use cactus_dash::leaderboard::LocalLeaderboard;
    use cactus_dash::platform::FrameLatch;
    use cactus_dash::platform::headless::{ImmediateDelay, LogHud, ScriptedPrompt};
    use cactus_dash::sim::RunPhase;
    use cactus_dash::{RunController, Settings};

    env_logger::init();
    log::info!("Cactus Dash (native) starting...");
    log::info!("Native mode plays autopiloted runs - run with `trunk serve` for the web version");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or(0x00CA_C705);
    let mut controller = RunController::new(
        &settings,
        seed,
        LocalLeaderboard::load(),
        ScriptedPrompt::always("BOT"),
        LogHud::default(),
        ImmediateDelay::default(),
    );
    controller.set_autopilot(true);
    controller.resize(1280.0, 720.0);

    for run in 1..=DEMO_RUNS {
        let mut latch = FrameLatch::default();
        controller.activate(&mut latch);

        let mut time = 0.0;
        while latch.wants_frame() && time <= DEMO_MAX_RUN_MS {
            latch = FrameLatch::default();
            controller.frame(time, &mut latch);
            time += DEMO_FRAME_MS;
        }

        if controller.phase() == RunPhase::Running {
            log::info!(
                "Run {} still alive after {:.0}s, stopping demo",
                run,
                DEMO_MAX_RUN_MS / 1000.0
            );
            break;
        }

        let score = controller.run().display_score();
        let outcome = pollster::block_on(controller.conclude());
        println!("Run {}: score {} ({:?})", run, score, outcome);
    }

    for line in &controller.hud().results {
        println!("{}", line);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
