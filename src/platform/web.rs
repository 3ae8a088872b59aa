//! Browser collaborators
//!
//! The world is plain DOM: positioned elements inside `[data-world]`, sized
//! in percent of the world box so only the box itself needs pixel sizes.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement};

use super::{Delay, Hud, NamePrompt, timer_ms};
use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::leaderboard::{LeaderboardEntry, format_result_line, rank_message};
use crate::sim::{PlayerFrame, World};

fn percent_x(x: f32) -> String {
    format!("{}%", x / WORLD_WIDTH * 100.0)
}

fn percent_y(y: f32) -> String {
    format!("{}%", y / WORLD_HEIGHT * 100.0)
}

fn html(element: Option<Element>) -> Option<HtmlElement> {
    element.and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

fn query_all(document: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// HUD and world drawn with DOM elements
pub struct DomHud {
    document: Document,
    world: Option<HtmlElement>,
    score: Option<Element>,
    start_screen: Option<Element>,
    results: Option<Element>,
    grounds: Vec<HtmlElement>,
    player: Option<HtmlImageElement>,
    player_frame: Option<PlayerFrame>,
    obstacles: HashMap<u32, HtmlElement>,
}

impl DomHud {
    pub fn new(document: Document) -> Self {
        let world = html(document.query_selector("[data-world]").ok().flatten());
        let score = document.query_selector("[data-score]").ok().flatten();
        let start_screen = document.query_selector("[data-start-screen]").ok().flatten();
        let results = document.get_element_by_id("results");
        let grounds = query_all(&document, "[data-ground]");
        let player = document
            .query_selector("[data-player]")
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<HtmlImageElement>().ok());

        if world.is_none() {
            log::warn!("No [data-world] element, nothing will be drawn");
        }

        Self {
            document,
            world,
            score,
            start_screen,
            results,
            grounds,
            player,
            player_frame: None,
            obstacles: HashMap::new(),
        }
    }

    fn sprite_for(frame: PlayerFrame) -> String {
        match frame {
            PlayerFrame::Stationary => "imgs/player-stationary.png".to_string(),
            PlayerFrame::Run(i) => format!("imgs/player-run-{}.png", i),
            PlayerFrame::Lose => "imgs/player-lose.png".to_string(),
        }
    }

    fn sync_obstacles(&mut self, world: &World) {
        let Some(container) = self.world.as_ref() else {
            return;
        };

        self.obstacles.retain(|id, element| {
            let alive = world.obstacles.obstacles.iter().any(|o| o.id == *id);
            if !alive {
                element.remove();
            }
            alive
        });

        for obstacle in &world.obstacles.obstacles {
            if !self.obstacles.contains_key(&obstacle.id) {
                let Ok(element) = self.document.create_element("img") else {
                    continue;
                };
                let Ok(element) = element.dyn_into::<HtmlImageElement>() else {
                    continue;
                };
                element.set_src(&format!("imgs/{}.png", obstacle.kind.sprite()));
                let _ = element.set_attribute("data-obstacle", "");
                let style = element.style();
                let _ = style.set_property("width", &percent_x(obstacle.size.x));
                let _ = style.set_property("height", &percent_y(obstacle.size.y));
                let _ = style.set_property("bottom", "0");
                let _ = container.append_child(&element);
                self.obstacles.insert(obstacle.id, element.into());
            }
            if let Some(element) = self.obstacles.get(&obstacle.id) {
                let _ = element.style().set_property("left", &percent_x(obstacle.x));
            }
        }
    }
}

impl Hud for DomHud {
    fn set_world_size(&mut self, width_px: f32, height_px: f32) {
        if let Some(world) = &self.world {
            let style = world.style();
            let _ = style.set_property("width", &format!("{}px", width_px));
            let _ = style.set_property("height", &format!("{}px", height_px));
        }
    }

    fn set_score(&mut self, score: u64) {
        if let Some(el) = &self.score {
            el.set_text_content(Some(&score.to_string()));
        }
    }

    fn set_start_overlay(&mut self, visible: bool) {
        if let Some(el) = &self.start_screen {
            let classes = el.class_list();
            let _ = if visible {
                classes.remove_1("hide")
            } else {
                classes.add_1("hide")
            };
        }
    }

    fn draw(&mut self, world: &World) {
        for (element, segment) in self.grounds.iter().zip(&world.ground.segments) {
            let _ = element.style().set_property("left", &percent_x(segment.x));
        }

        if let Some(player) = &self.player {
            let _ = player
                .style()
                .set_property("bottom", &percent_y(world.player.elevation));
            if self.player_frame != Some(world.player.frame) {
                player.set_src(&Self::sprite_for(world.player.frame));
                self.player_frame = Some(world.player.frame);
            }
        }

        self.sync_obstacles(world);
    }

    fn show_results(&mut self, results: &[LeaderboardEntry]) {
        let Some(container) = &self.results else {
            return;
        };
        while let Some(child) = container.first_child() {
            let _ = container.remove_child(&child);
        }
        for (i, entry) in results.iter().enumerate() {
            if let Ok(line) = self.document.create_element("p") {
                line.set_text_content(Some(&format_result_line(i, entry)));
                let _ = container.append_child(&line);
            }
        }
    }

    fn show_rank(&mut self, rank: u32) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(&rank_message(rank));
        }
    }
}

/// `window.prompt`
pub struct DialogPrompt;

impl NamePrompt for DialogPrompt {
    fn ask(&mut self, default: &str) -> Option<String> {
        let window = web_sys::window()?;
        window
            .prompt_with_message_and_default(
                "Enter a name to save your score in the top 10 (Cancel to skip):",
                default,
            )
            .ok()
            .flatten()
    }
}

/// `setTimeout` wrapped in a promise
pub struct TimeoutDelay;

impl Delay for TimeoutDelay {
    async fn wait(&self, ms: u32) {
        let timeout = timer_ms(ms);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            if let Some(window) = web_sys::window() {
                let _ = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout);
            }
        });
        let _ = JsFuture::from(promise).await;
    }
}
