//! Browser bindings
//!
//! A JS host calls `frame(now, hasCanvas)` from `requestAnimationFrame`,
//! forwards key presses to `key(code)` or any other trigger to `activate()`,
//! and draws from `snapshotJson()`.

use wasm_bindgen::prelude::*;

use super::{FrameDriver, FrameOutcome, InputEvent, RenderSurface, key_event};
use crate::config::SimConfig;
use crate::decision::ConstantDecision;
use crate::render::RenderFrame;
use crate::sim::Simulation;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Flappy Sim starting...");
}

/// Keeps the latest frame as JSON for the JS side to draw
#[derive(Default)]
struct JsonSurface {
    latest: String,
}

impl RenderSurface for JsonSurface {
    fn present(&mut self, frame: &RenderFrame) {
        match serde_json::to_string(frame) {
            Ok(json) => self.latest = json,
            Err(e) => log::warn!("Failed to serialize frame: {e}"),
        }
    }
}

#[wasm_bindgen]
pub struct WebSession {
    driver: FrameDriver,
    surface: JsonSurface,
}

#[wasm_bindgen]
impl WebSession {
    /// Build a session from optional JSON configuration
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, seed: u64) -> Result<WebSession, JsValue> {
        let config = match config_json {
            Some(json) => SimConfig::from_json(&json),
            None => Ok(SimConfig::default()),
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let sim = Simulation::new(config, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let driver = FrameDriver::new(sim, Box::new(ConstantDecision::default()));
        let mut surface = JsonSurface::default();
        driver.redraw(&mut surface);

        Ok(Self { driver, surface })
    }

    /// Animation callback; returns true if the simulation advanced
    pub fn frame(&mut self, now: f64, has_canvas: bool) -> bool {
        let surface = if has_canvas {
            Some(&mut self.surface as &mut dyn RenderSurface)
        } else {
            None
        };
        matches!(self.driver.on_frame(now, surface), FrameOutcome::Ticked(_))
    }

    /// The game button: flap while running, otherwise start or restart
    pub fn activate(&mut self) {
        self.input(InputEvent::Activate);
    }

    /// Keyboard input by DOM `KeyboardEvent.code`
    pub fn key(&mut self, code: &str) {
        if let Some(event) = key_event(code) {
            self.input(event);
        }
    }

    /// Latest frame as JSON
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> String {
        self.surface.latest.clone()
    }
}

impl WebSession {
    fn input(&mut self, event: InputEvent) {
        self.driver.input(event);
        self.driver.redraw(&mut self.surface);
    }
}
