//! Flappy Sim entry point
//!
//! Native builds run a headless session against a synthetic frame clock and
//! print the final metrics. The browser build is driven from JS through
//! `platform::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use flappy_sim::decision::ConstantDecision;
    use flappy_sim::platform::{FrameDriver, FrameOutcome, InputEvent, RenderSurface};
    use flappy_sim::render::RenderFrame;
    use flappy_sim::sim::{MetricKey, SimPhase, Simulation};
    use flappy_sim::SimConfig;

    /// Run a headless flappy simulation
    #[derive(Parser, Debug)]
    #[command(name = "flappy-sim", version, about)]
    pub struct Cli {
        /// JSON configuration file (defaults are used for missing keys)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Simulated wall-clock seconds to run
        #[arg(long, default_value_t = 30.0)]
        seconds: f64,

        /// Milliseconds between host frame callbacks
        #[arg(long, default_value_t = 1000.0 / 60.0)]
        frame_ms: f64,

        /// RNG seed for gap placement
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Restart automatically this many times after game over
        #[arg(long, default_value_t = 0)]
        restarts: u32,

        /// Never flap instead of always flapping
        #[arg(long)]
        glide: bool,
    }

    impl Cli {
        /// Reject clock settings that would stall or reverse the frame clock
        fn validate(&self) -> Result<()> {
            if !(self.frame_ms.is_finite() && self.frame_ms > 0.0) {
                bail!("--frame-ms must be a positive number, got {}", self.frame_ms);
            }
            if !(self.seconds.is_finite() && self.seconds >= 0.0) {
                bail!("--seconds must be a non-negative number, got {}", self.seconds);
            }
            Ok(())
        }
    }

    /// Logs phase changes instead of drawing
    #[derive(Default)]
    struct LogSurface {
        frames: u64,
        last_phase: Option<SimPhase>,
    }

    impl RenderSurface for LogSurface {
        fn present(&mut self, frame: &RenderFrame) {
            self.frames += 1;
            if self.last_phase != Some(frame.phase) {
                log::info!("Phase {:?} at frame {}", frame.phase, self.frames);
                self.last_phase = Some(frame.phase);
            }
        }
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        cli.validate()?;

        let config = match &cli.config {
            Some(path) => SimConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SimConfig::default(),
        };
        let sim = Simulation::new(config, cli.seed).context("building simulation")?;
        let mut driver = FrameDriver::new(sim, Box::new(ConstantDecision(!cli.glide)));
        let mut surface = LogSurface::default();

        driver.input(InputEvent::Activate);
        let mut restarts_left = cli.restarts;
        let mut now = 0.0;
        let mut ticks = 0u64;
        while now <= cli.seconds * 1000.0 {
            if let FrameOutcome::Ticked(_) = driver.on_frame(now, Some(&mut surface)) {
                ticks += 1;
            }
            if driver.sim().phase() == SimPhase::GameOver {
                if restarts_left == 0 {
                    break;
                }
                restarts_left -= 1;
                driver.input(InputEvent::Activate);
            }
            now += cli.frame_ms;
        }

        let metrics = driver.sim().metrics();
        log::info!("Simulated {ticks} ticks over {:.3}s of frames", now / 1000.0);
        for key in MetricKey::ALL {
            log::info!("{:<24}{}", key.label(), metrics.display_value(key));
        }
        println!("{}", serde_json::to_string_pretty(metrics)?);
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> Cli {
            Cli::try_parse_from(std::iter::once("flappy-sim").chain(args.iter().copied()))
                .unwrap()
        }

        #[test]
        fn test_defaults_are_valid() {
            assert!(parse(&[]).validate().is_ok());
        }

        #[test]
        fn test_stalled_frame_clock_rejected() {
            assert!(parse(&["--frame-ms", "0"]).validate().is_err());
            assert!(parse(&["--frame-ms=-5"]).validate().is_err());
            assert!(parse(&["--frame-ms", "NaN"]).validate().is_err());
            assert!(parse(&["--frame-ms", "inf"]).validate().is_err());
        }

        #[test]
        fn test_bad_duration_rejected() {
            assert!(parse(&["--seconds=-1"]).validate().is_err());
            assert!(parse(&["--seconds", "inf"]).validate().is_err());
            assert!(parse(&["--seconds", "0"]).validate().is_ok());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry is `platform::web::init`
}
