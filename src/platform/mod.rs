//! Platform abstraction layer
//!
//! Glue between a host's per-frame callback and the simulation:
//! - Render-surface availability (frames are deferred until one exists)
//! - Input events
//! - Browser bindings (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::decision::DecisionAgent;
use crate::render::RenderFrame;
use crate::sim::{GameEvent, Simulation};

/// Something a frame can be drawn onto
pub trait RenderSurface {
    fn present(&mut self, frame: &RenderFrame);
}

/// Discrete input from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The one game button: flap, or start/restart
    Activate,
}

/// Map a DOM-style key code to an input event
pub fn key_event(code: &str) -> Option<InputEvent> {
    match code {
        "Space" => Some(InputEvent::Activate),
        _ => None,
    }
}

/// What happened on one host callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// No surface yet; nothing was touched, call again next frame
    Deferred,
    /// The tick gate declined this frame
    Idle,
    /// A tick of this many seconds ran and the frame was presented
    Ticked(f32),
}

/// Drives a [`Simulation`] from a host's animation callback
pub struct FrameDriver {
    sim: Simulation,
    decision: Box<dyn DecisionAgent>,
    events: Vec<GameEvent>,
}

impl FrameDriver {
    pub fn new(sim: Simulation, decision: Box<dyn DecisionAgent>) -> Self {
        log::info!("Frame driver using '{}' decisions", decision.kind());
        Self {
            sim,
            decision,
            events: Vec::new(),
        }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    /// Events from the most recent frame or input
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Activate => self.sim.activate(),
        }
        self.collect_events();
    }

    /// Handle one animation callback at `now_millis`
    pub fn on_frame(
        &mut self,
        now_millis: f64,
        surface: Option<&mut dyn RenderSurface>,
    ) -> FrameOutcome {
        let Some(surface) = surface else {
            log::warn!("Frame requested before a render surface was available; deferring");
            return FrameOutcome::Deferred;
        };

        self.events.clear();
        let Some(dt) = self.sim.frame(now_millis, &mut *self.decision) else {
            return FrameOutcome::Idle;
        };
        self.collect_events();

        surface.present(&RenderFrame::capture(&self.sim));
        FrameOutcome::Ticked(dt)
    }

    /// Present the current state without ticking, e.g. after input
    pub fn redraw(&self, surface: &mut dyn RenderSurface) {
        surface.present(&RenderFrame::capture(&self.sim));
    }

    fn collect_events(&mut self) {
        self.events.extend(self.sim.drain_events());
    }

    pub fn into_sim(self) -> Simulation {
        self.sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::decision::ConstantDecision;
    use crate::sim::SimPhase;

    #[derive(Default)]
    struct CountingSurface {
        frames: usize,
        last_banner: Option<&'static str>,
    }

    impl RenderSurface for CountingSurface {
        fn present(&mut self, frame: &RenderFrame) {
            self.frames += 1;
            self.last_banner = frame.banner();
        }
    }

    fn driver() -> FrameDriver {
        let sim = Simulation::new(SimConfig::default(), 9).unwrap();
        FrameDriver::new(sim, Box::new(ConstantDecision(false)))
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_event("Space"), Some(InputEvent::Activate));
        assert_eq!(key_event("KeyA"), None);
    }

    #[test]
    fn test_missing_surface_defers_without_touching_gate() {
        let mut driver = driver();
        driver.input(InputEvent::Activate);

        assert_eq!(driver.on_frame(0.0, None), FrameOutcome::Deferred);
        assert_eq!(driver.on_frame(100.0, None), FrameOutcome::Deferred);

        // First frame with a surface only sets the gate's baseline
        let mut surface = CountingSurface::default();
        assert_eq!(driver.on_frame(200.0, Some(&mut surface)), FrameOutcome::Idle);
        assert_eq!(surface.frames, 0);

        match driver.on_frame(220.0, Some(&mut surface)) {
            FrameOutcome::Ticked(dt) => assert!((dt - 0.02).abs() < 1e-6),
            other => panic!("expected a tick, got {other:?}"),
        }
        assert_eq!(surface.frames, 1);
        assert_eq!(surface.last_banner, None);
    }

    #[test]
    fn test_activate_routes_by_phase() {
        let mut driver = driver();
        assert_eq!(driver.sim().phase(), SimPhase::NotStarted);

        driver.input(InputEvent::Activate);
        assert_eq!(driver.sim().phase(), SimPhase::Running);
        assert_eq!(driver.events(), &[GameEvent::Started]);

        driver.input(InputEvent::Activate);
        assert!(driver.sim().agent().y_velocity < 0.0);
        assert_eq!(driver.events(), &[GameEvent::Started, GameEvent::Flap]);
    }

    #[test]
    fn test_redraw_after_input_shows_new_phase() {
        let mut driver = driver();
        let mut surface = CountingSurface::default();
        driver.redraw(&mut surface);
        assert_eq!(surface.last_banner, Some("Press Space to Play"));

        driver.input(InputEvent::Activate);
        driver.redraw(&mut surface);
        assert_eq!(surface.frames, 2);
        assert_eq!(surface.last_banner, None);
        // Redrawing does not tick
        assert_eq!(driver.sim().run_ticks(), 0);
    }

    #[test]
    fn test_glide_eventually_hits_floor() {
        let mut driver = driver();
        let mut surface = CountingSurface::default();
        driver.input(InputEvent::Activate);

        let mut now = 0.0;
        while driver.sim().phase() == SimPhase::Running && now < 60_000.0 {
            driver.on_frame(now, Some(&mut surface));
            now += 1000.0 / 60.0 + 1.0;
        }
        assert_eq!(driver.sim().phase(), SimPhase::GameOver);
        assert_eq!(surface.last_banner, Some("Game Over"));
        let metrics = driver.sim().metrics();
        assert_eq!(metrics.floor_hits + metrics.bar_hits, 1);
    }
}
