//! Run metrics
//!
//! Per-run values (score, time survived) reset on every start. Best values
//! and hit counters live as long as the session and never go down.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::state::HitKind;
use crate::error::{Result, SimError};

/// Name of a tracked metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKey {
    Score,
    BestScore,
    TimeSurvived,
    BestTimeSurvived,
    CeilingHits,
    FloorHits,
    BarHits,
}

impl MetricKey {
    pub const ALL: [MetricKey; 7] = [
        MetricKey::Score,
        MetricKey::BestScore,
        MetricKey::TimeSurvived,
        MetricKey::BestTimeSurvived,
        MetricKey::CeilingHits,
        MetricKey::FloorHits,
        MetricKey::BarHits,
    ];

    /// Canonical lookup name
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::Score => "score",
            MetricKey::BestScore => "bestScore",
            MetricKey::TimeSurvived => "timeSurvived",
            MetricKey::BestTimeSurvived => "bestTimeSurvived",
            MetricKey::CeilingHits => "ceilingHits",
            MetricKey::FloorHits => "floorHits",
            MetricKey::BarHits => "barHits",
        }
    }

    /// Human-readable label for a metrics panel
    pub fn label(&self) -> &'static str {
        match self {
            MetricKey::Score => "Score (# pipes)",
            MetricKey::BestScore => "Best Score (# pipes)",
            MetricKey::TimeSurvived => "Time Survived (s)",
            MetricKey::BestTimeSurvived => "Best Time Survived (s)",
            MetricKey::CeilingHits => "Ceiling Hits",
            MetricKey::FloorHits => "Floor Hits",
            MetricKey::BarHits => "Bar Hits",
        }
    }

    fn is_time(&self) -> bool {
        matches!(self, MetricKey::TimeSurvived | MetricKey::BestTimeSurvived)
    }

    fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(MetricKey::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SimError::UnknownMetric {
                name: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}

/// Scoreboard for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub score: u32,
    pub best_score: u32,
    /// Seconds survived in the current run
    pub time_survived: f64,
    pub best_time_survived: f64,
    pub ceiling_hits: u32,
    pub floor_hits: u32,
    pub bar_hits: u32,
}

impl Metrics {
    /// Value of a metric as a number
    pub fn get(&self, key: MetricKey) -> f64 {
        match key {
            MetricKey::Score => self.score as f64,
            MetricKey::BestScore => self.best_score as f64,
            MetricKey::TimeSurvived => self.time_survived,
            MetricKey::BestTimeSurvived => self.best_time_survived,
            MetricKey::CeilingHits => self.ceiling_hits as f64,
            MetricKey::FloorHits => self.floor_hits as f64,
            MetricKey::BarHits => self.bar_hits as f64,
        }
    }

    /// Look a metric up by its canonical name
    pub fn get_named(&self, name: &str) -> Result<f64> {
        Ok(self.get(name.parse()?))
    }

    /// Panel text: whole numbers for counts, three decimals for times
    pub fn display_value(&self, key: MetricKey) -> String {
        if key.is_time() {
            format!("{:.3}", self.get(key))
        } else {
            format!("{}", self.get(key) as u64)
        }
    }

    /// `(label, value)` rows in panel order
    pub fn rows(&self) -> impl Iterator<Item = (&'static str, String)> + '_ {
        MetricKey::ALL
            .into_iter()
            .map(|key| (key.label(), self.display_value(key)))
    }

    /// Clear the per-run values; best values and hit counts survive
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.time_survived = 0.0;
    }

    pub fn increment_score(&mut self) {
        self.score += 1;
        self.best_score = self.best_score.max(self.score);
    }

    pub fn add_time(&mut self, dt: f64) {
        self.time_survived += dt;
        if self.time_survived > self.best_time_survived {
            self.best_time_survived = self.time_survived;
        }
    }

    pub fn record_hit(&mut self, kind: HitKind) {
        match kind {
            HitKind::Ceiling => self.ceiling_hits += 1,
            HitKind::Floor => self.floor_hits += 1,
            HitKind::Bar => self.bar_hits += 1,
        }
    }
}
