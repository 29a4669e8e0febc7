//! Browser binding
//!
//! The page owns the canvas, the event listeners and the drawing. It calls
//! [`WebGame::frame`] from `requestAnimationFrame`, forwards pointer events
//! as canvas-local coordinates, and reads entity state back as JSON.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use super::FrameClock;
use crate::settings::Settings;
use crate::sim::{GameState, ObstacleKind, input, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("Gravity Ball starting...");
}

/// Game instance owned by the page
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    clock: FrameClock,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, seed: f64) -> WebGame {
        let settings = Settings::with_canvas(width, height);
        log::info!("Game initialized with seed: {}", seed as u64);
        WebGame {
            state: GameState::new(settings, seed as u64),
            clock: FrameClock::new(),
        }
    }

    /// Advance one animation frame (`performance.now()` timestamp)
    pub fn frame(&mut self, now_ms: f64) {
        self.clock.frame(&mut self.state, now_ms);
    }

    /// Entities, score, timer and phase for drawing
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.state.snapshot()).unwrap_or_else(|e| {
            log::error!("Snapshot serialization failed: {}", e);
            String::from("{}")
        })
    }

    /// Events since the last call (score popups, game over, ...)
    pub fn drain_events_json(&mut self) -> String {
        let events = self.state.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("Event serialization failed: {}", e);
            String::from("[]")
        })
    }

    pub fn select_level(&mut self, level: usize) -> Result<(), JsValue> {
        tick::select_level(&mut self.state, level).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Effect quality by preset name ("low", "medium", "high")
    pub fn set_quality(&mut self, name: &str) -> bool {
        self.state.settings.set_quality(name)
    }

    /// Live physics tuning; gravity stays with the level
    pub fn set_physics(&mut self, damping: f32, friction: f32, elasticity: f32, spring_force: f32) {
        let physics = self.state.physics_mut();
        physics.set_damping(damping.clamp(0.0, 1.0));
        physics.set_friction(friction.clamp(0.0, 1.0));
        physics.set_elasticity(elasticity.clamp(0.0, 1.0));
        physics.set_spring_force(spring_force.max(0.0));
    }

    /// Obstacle kind placed on empty-canvas clicks; unknown names clear the selection
    pub fn select_obstacle(&mut self, kind: &str) {
        self.state.selected_obstacle = ObstacleKind::parse(kind);
        if self.state.selected_obstacle.is_none() {
            log::warn!("Unknown obstacle type '{}'", kind);
        }
    }

    pub fn place_obstacle(&mut self, x: f32, y: f32, kind: &str) -> Option<u32> {
        input::place_obstacle_named(&mut self.state, Vec2::new(x, y), kind)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        input::pointer_down(&mut self.state, Vec2::new(x, y));
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        input::update_drag(&mut self.state, Vec2::new(x, y));
    }

    pub fn pointer_up(&mut self) {
        input::end_drag(&mut self.state);
    }

    pub fn double_click(&mut self, x: f32, y: f32) -> Option<u32> {
        input::rotate_obstacle_at(&mut self.state, Vec2::new(x, y))
    }

    pub fn toggle_pause(&mut self) {
        tick::toggle_pause(&mut self.state);
        self.clock.reset_baseline();
    }

    pub fn reset_level(&mut self) {
        tick::reset_level(&mut self.state);
    }

    pub fn new_game(&mut self) {
        tick::new_game(&mut self.state);
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }
}
