//! Simulation loop
//!
//! One [`Simulation`] is one game session. The host offers it every
//! animation frame; the tick gate decides which frames advance the game.
//!
//! Per tick while running:
//! 1. rebuild the perception grid
//! 2. ask the decision agent whether to flap, and flap
//! 3. accumulate survival time
//! 4. check the ceiling and floor, then the obstacles
//! 5. if still alive: gravity, scroll/recycle obstacles, score

use super::collision::Rect;
use super::metrics::Metrics;
use super::obstacles::ObstacleField;
use super::perception::PerceptionGrid;
use super::physics::{apply_gravity, apply_impulse};
use super::state::{Agent, GameEvent, HitKind, Obstacle, SimPhase};
use super::timing::TickGate;
use crate::config::SimConfig;
use crate::decision::{DecisionAgent, Observation};
use crate::error::Result;

/// A game session: agent, obstacle pool, metrics and phase
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    gate: TickGate,
    phase: SimPhase,
    agent: Agent,
    field: ObstacleField,
    grid: PerceptionGrid,
    metrics: Metrics,
    /// Events since the start of the last accepted tick
    events: Vec<GameEvent>,
    /// Ticks simulated in the current run
    run_ticks: u64,
}

impl Simulation {
    /// Build a session; fails if the configuration is unusable
    pub fn new(config: SimConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let gate = TickGate::new(config.tick_rate)?;
        let mut field = ObstacleField::new(&config, seed);
        field.reset(config.buffered_obstacles(), config.obstacle_spacing);
        let grid = PerceptionGrid::for_config(&config);
        let agent = Agent::new(config.agent_start_y);

        Ok(Self {
            config,
            gate,
            phase: SimPhase::NotStarted,
            agent,
            field,
            grid,
            metrics: Metrics::default(),
            events: Vec::new(),
            run_ticks: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.field.obstacles()
    }

    /// Grid computed on the most recent tick
    pub fn grid(&self) -> &PerceptionGrid {
        &self.grid
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn run_ticks(&self) -> u64 {
        self.run_ticks
    }

    /// Hitbox of the agent at its current position
    pub fn agent_rect(&self) -> Rect {
        self.config.agent_rect(self.agent.y)
    }

    /// Take the events produced since the last call
    ///
    /// Each accepted tick discards whatever was not drained before it, so
    /// the queue only ever holds one tick's worth of events plus input.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Begin a run, or begin a new one after game over
    pub fn start(&mut self) {
        self.agent = Agent::new(self.config.agent_start_y);
        self.metrics.reset_run();
        self.field
            .reset(self.config.buffered_obstacles(), self.config.obstacle_spacing);
        self.grid = PerceptionGrid::for_config(&self.config);
        self.run_ticks = 0;
        self.phase = SimPhase::Running;
        self.events.push(GameEvent::Started);
        log::info!(
            "Run started ({} obstacles, best score {})",
            self.field.len(),
            self.metrics.best_score
        );
    }

    /// The single user input: flap while running, otherwise (re)start
    pub fn activate(&mut self) {
        match self.phase {
            SimPhase::Running => self.flap(),
            SimPhase::NotStarted | SimPhase::GameOver => self.start(),
        }
    }

    fn flap(&mut self) {
        if self.phase != SimPhase::Running {
            return;
        }
        apply_impulse(&mut self.agent, self.config.impulse);
        self.events.push(GameEvent::Flap);
    }

    /// Offer an animation frame at `now_millis`
    ///
    /// Returns the tick's elapsed seconds if the gate let it through. A
    /// declined frame changes nothing.
    pub fn frame(&mut self, now_millis: f64, decision: &mut dyn DecisionAgent) -> Option<f32> {
        let dt = self.gate.poll(now_millis)?;
        self.step(dt, decision);
        Some(dt)
    }

    /// Advance one tick of `dt` seconds, bypassing the gate
    pub fn step(&mut self, dt: f32, decision: &mut dyn DecisionAgent) {
        if self.phase != SimPhase::Running {
            return;
        }
        self.events.clear();
        self.run_ticks += 1;

        self.grid = PerceptionGrid::encode(self.field.obstacles(), &self.config);

        let obs = Observation {
            delta_time: dt,
            agent_y: self.agent.y,
            agent_y_velocity: self.agent.y_velocity,
            grid: &self.grid,
            time_survived: self.metrics.time_survived,
        };
        let should_flap = decision.decide(&obs);
        log::trace!("{} decided flap={should_flap}", decision.kind());
        if should_flap {
            self.flap();
        }

        self.metrics.add_time(dt as f64);

        if let Some(kind) = self.boundary_hit() {
            self.game_over(kind);
            return;
        }
        if let Some(slot) = self.bar_hit() {
            log::debug!("Agent hit obstacle {slot}");
            self.game_over(HitKind::Bar);
            return;
        }

        apply_gravity(&mut self.agent, self.config.gravity, dt);
        let scored = self
            .field
            .advance(dt, self.config.obstacle_velocity, &mut self.events);
        for _ in 0..scored {
            self.metrics.increment_score();
        }
    }

    fn boundary_hit(&self) -> Option<HitKind> {
        if self.agent.y >= self.config.playfield_height {
            Some(HitKind::Floor)
        } else if self.agent.y <= 0.0 {
            Some(HitKind::Ceiling)
        } else {
            None
        }
    }

    /// First obstacle whose column the agent is in without being fully inside the gap
    fn bar_hit(&self) -> Option<usize> {
        let agent = self.agent_rect();
        self.field.obstacles().iter().position(|obstacle| {
            let gap = obstacle.gap(&self.config);
            agent.overlaps_x(&gap) && !agent.within_y(&gap)
        })
    }

    fn game_over(&mut self, kind: HitKind) {
        self.metrics.record_hit(kind);
        self.phase = SimPhase::GameOver;
        self.events.push(GameEvent::Collision { kind });
        log::info!(
            "Game over ({kind:?}) after {:.3}s, score {} (best {})",
            self.metrics.time_survived,
            self.metrics.score,
            self.metrics.best_score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::ConstantDecision;

    fn sim(config: SimConfig) -> Simulation {
        Simulation::new(config, 12345).unwrap()
    }

    /// Push every obstacle far to the right so nothing can be hit
    fn clear_field(sim: &mut Simulation) {
        let spacing = sim.config.obstacle_spacing;
        let count = sim.field.len();
        sim.field.reset(count, spacing);
        for slot in 0..count {
            sim.field.spawn_at(slot, 10_000.0 + slot as f32 * spacing);
        }
    }

    #[test]
    fn test_starts_not_started() {
        let mut s = sim(SimConfig::default());
        assert_eq!(s.phase(), SimPhase::NotStarted);
        assert_eq!(s.obstacles().len(), s.config().buffered_obstacles());

        // Ticks do nothing before the first start
        s.step(0.1, &mut ConstantDecision(true));
        assert_eq!(s.agent().y, 240.0);
        assert_eq!(s.metrics().time_survived, 0.0);
    }

    #[test]
    fn test_invalid_tick_rate_fails() {
        let config = SimConfig {
            tick_rate: 0.0,
            ..Default::default()
        };
        assert!(Simulation::new(config, 1).is_err());
    }

    #[test]
    fn test_activate_starts_then_flaps() {
        let mut s = sim(SimConfig::default());
        s.activate();
        assert_eq!(s.phase(), SimPhase::Running);
        assert_eq!(s.obstacles().len(), s.config().buffered_obstacles());
        assert_eq!(s.agent().y_velocity, 0.0);

        s.activate();
        assert_eq!(s.agent().y_velocity, -s.config().impulse);
        let events: Vec<_> = s.drain_events().collect();
        assert_eq!(events, vec![GameEvent::Started, GameEvent::Flap]);
        assert_eq!(s.drain_events().count(), 0);
    }

    #[test]
    fn test_gravity_tick() {
        let config = SimConfig {
            gravity: 400.0,
            impulse: 200.0,
            ..Default::default()
        };
        let mut s = sim(config);
        s.start();
        clear_field(&mut s);

        s.step(0.1, &mut ConstantDecision(false));
        assert!((s.agent().y_velocity - 40.0).abs() < 1e-4);
        assert!((s.agent().y - 244.0).abs() < 1e-4);
    }

    #[test]
    fn test_flap_applies_before_gravity() {
        let config = SimConfig {
            gravity: 400.0,
            impulse: 200.0,
            ..Default::default()
        };
        let mut s = sim(config);
        s.start();
        clear_field(&mut s);

        s.step(0.1, &mut ConstantDecision(true));
        assert!((s.agent().y_velocity - (-160.0)).abs() < 1e-4);
        assert!((s.agent().y - 224.0).abs() < 1e-4);
    }

    #[test]
    fn test_floor_hit_counts_once() {
        let mut s = sim(SimConfig::default());
        s.start();
        clear_field(&mut s);
        s.agent.y = 481.0;

        s.step(0.016, &mut ConstantDecision(false));
        assert_eq!(s.phase(), SimPhase::GameOver);
        assert_eq!(s.metrics().floor_hits, 1);

        s.step(0.016, &mut ConstantDecision(false));
        assert_eq!(s.metrics().floor_hits, 1);
        assert_eq!(s.agent().y, 481.0);
    }

    #[test]
    fn test_ceiling_hit() {
        let mut s = sim(SimConfig::default());
        s.start();
        clear_field(&mut s);
        s.agent.y = 0.0;

        s.step(0.016, &mut ConstantDecision(false));
        assert_eq!(s.phase(), SimPhase::GameOver);
        assert_eq!(s.metrics().ceiling_hits, 1);
        assert_eq!(s.metrics().floor_hits, 0);
    }

    #[test]
    fn test_bar_hit_when_outside_gap() {
        let mut s = sim(SimConfig::default());
        s.start();
        clear_field(&mut s);
        // Gap 230..370 straddles the agent's column; agent spans 225..255
        let agent_x = s.config.agent_x;
        s.field.slots_mut()[2] = Obstacle {
            x: agent_x,
            y: 300.0,
            scoreable: true,
        };

        s.step(0.001, &mut ConstantDecision(false));
        assert_eq!(s.phase(), SimPhase::GameOver);
        assert_eq!(s.metrics().bar_hits, 1);
        assert!(s
            .drain_events()
            .any(|e| e == GameEvent::Collision { kind: HitKind::Bar }));
    }

    #[test]
    fn test_touching_gap_edge_is_safe() {
        let mut s = sim(SimConfig {
            gravity: 0.0,
            ..Default::default()
        });
        s.start();
        clear_field(&mut s);
        // Agent top edge exactly on the gap top (230)
        s.agent.y = 245.0;
        let agent_x = s.config.agent_x;
        s.field.slots_mut()[0] = Obstacle {
            x: agent_x,
            y: 300.0,
            scoreable: true,
        };

        s.step(0.001, &mut ConstantDecision(false));
        assert_eq!(s.phase(), SimPhase::Running);
        assert_eq!(s.metrics().bar_hits, 0);
    }

    #[test]
    fn test_passing_through_gap_is_safe_and_scores() {
        let mut s = sim(SimConfig {
            gravity: 0.0,
            ..Default::default()
        });
        s.start();
        clear_field(&mut s);

        // One obstacle directly ahead with its gap centered on the agent
        let agent_y = s.agent().y;
        s.field.slots_mut()[0] = Obstacle {
            x: 120.0,
            y: agent_y,
            scoreable: true,
        };

        let mut glide = ConstantDecision(false);
        let mut events = Vec::new();
        // 80 px/s: crosses the scoring line (x < 5) after ~1.44s
        for _ in 0..100 {
            s.step(0.02, &mut glide);
            events.extend(s.drain_events());
        }
        assert_eq!(s.phase(), SimPhase::Running);
        assert_eq!(s.metrics().score, 1);
        assert_eq!(s.metrics().best_score, 1);
        assert!(events.contains(&GameEvent::Scored { slot: 0 }));
    }

    #[test]
    fn test_undrained_events_stay_bounded() {
        let mut s = sim(SimConfig {
            gravity: 0.0,
            impulse: 0.0,
            obstacle_velocity: 0.0,
            ..Default::default()
        });
        s.start();
        clear_field(&mut s);
        let mut flap = ConstantDecision(true);

        let mut now = 0.0;
        for _ in 0..10_000 {
            s.frame(now, &mut flap);
            now += 20.0;
        }
        assert_eq!(s.phase(), SimPhase::Running);
        assert_eq!(s.run_ticks(), 9_999);
        // Only the last tick's flap is still queued
        let events: Vec<_> = s.drain_events().collect();
        assert_eq!(events, vec![GameEvent::Flap]);
    }

    #[test]
    fn test_tick_discards_undrained_input() {
        let mut s = sim(SimConfig::default());
        s.activate();
        s.activate();
        assert_eq!(s.drain_events().count(), 2);

        s.activate();
        s.step(0.001, &mut ConstantDecision(false));
        assert_eq!(s.drain_events().count(), 0);
    }

    #[test]
    fn test_restart_keeps_best_metrics() {
        let mut s = sim(SimConfig::default());
        s.start();
        clear_field(&mut s);
        s.metrics.increment_score();
        s.metrics.increment_score();
        s.step(0.5, &mut ConstantDecision(false));
        s.agent.y = 500.0;
        s.step(0.5, &mut ConstantDecision(false));
        assert_eq!(s.phase(), SimPhase::GameOver);
        let frozen = s.metrics().clone();

        // Game over freezes the run
        s.step(0.5, &mut ConstantDecision(false));
        assert_eq!(s.metrics(), &frozen);

        s.activate();
        assert_eq!(s.phase(), SimPhase::Running);
        assert_eq!(s.metrics().score, 0);
        assert_eq!(s.metrics().time_survived, 0.0);
        assert_eq!(s.metrics().best_score, 2);
        assert!((s.metrics().best_time_survived - 1.0).abs() < 1e-6);
        assert_eq!(s.metrics().floor_hits, 1);
        assert_eq!(s.agent().y, 240.0);
        assert_eq!(s.run_ticks(), 0);
    }

    #[test]
    fn test_frame_respects_gate() {
        let mut s = sim(SimConfig::default());
        s.start();
        clear_field(&mut s);
        let mut glide = ConstantDecision(false);

        assert_eq!(s.frame(0.0, &mut glide), None);
        assert_eq!(s.frame(5.0, &mut glide), None);
        assert_eq!(s.agent().y, 240.0);
        assert_eq!(s.run_ticks(), 0);

        let dt = s.frame(20.0, &mut glide).unwrap();
        assert!((dt - 0.02).abs() < 1e-6);
        assert_eq!(s.run_ticks(), 1);
        assert!(s.agent().y > 240.0);
    }

    #[test]
    fn test_decision_receives_state() {
        let mut s = sim(SimConfig::default());
        s.start();
        let mut seen = Vec::new();
        let mut spy = |obs: &Observation<'_>| {
            seen.push((obs.delta_time, obs.agent_y, obs.time_survived, obs.grid.columns()));
            false
        };
        s.step(0.02, &mut spy);
        s.step(0.02, &mut spy);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (0.02, 240.0, 0.0, 32));
        assert!((seen[1].2 - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_grid_sees_obstacles_ahead() {
        let mut s = sim(SimConfig::default());
        s.start();
        // First obstacle spawns at the right edge, partly inside the last column
        s.step(0.02, &mut ConstantDecision(false));
        assert!(s.grid().occupied_count() > 0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = sim(SimConfig::default());
        let mut b = sim(SimConfig::default());
        a.start();
        b.start();
        let mut flap_every_third = {
            let mut n = 0u32;
            move |_: &Observation<'_>| {
                n += 1;
                n % 3 == 0
            }
        };
        let mut flap_every_third_b = {
            let mut n = 0u32;
            move |_: &Observation<'_>| {
                n += 1;
                n % 3 == 0
            }
        };
        for _ in 0..200 {
            a.step(1.0 / 60.0, &mut flap_every_third);
            b.step(1.0 / 60.0, &mut flap_every_third_b);
        }
        assert_eq!(a.agent(), b.agent());
        assert_eq!(a.obstacles(), b.obstacles());
        assert_eq!(a.metrics(), b.metrics());
    }
}
