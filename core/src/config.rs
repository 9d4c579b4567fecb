//! Planner configuration.
//!
//! Recommended input ranges and defaults, plus the policy applied when a
//! repetitive-dive lookup fails. Ranges are advisory: a value outside its
//! range still gets planned and only produces a warning.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::{DiveParameters, RepetitiveDive};

/// Recommended bounds and default for one input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl InputRange {
    pub const fn new(min: f64, max: f64, default: f64) -> Self {
        InputRange { min, max, default }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn is_consistent(&self) -> bool {
        self.min <= self.default && self.default <= self.max
    }
}

/// What to do when the residual nitrogen or time penalty cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepetitiveFailurePolicy {
    /// Plan with no added time and report the failure.
    #[default]
    ZeroPenalty,
    /// Refuse to plan.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub depth_m: InputRange,
    pub bottom_time_min: InputRange,
    pub penalty_min: InputRange,
    pub ascent_speed_m_min: InputRange,
    pub sac_l_min: InputRange,
    pub tank_capacity_l: InputRange,
    pub fill_pressure_bar: InputRange,
    pub reserve_bar: InputRange,
    pub repetitive_failure: RepetitiveFailurePolicy,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            depth_m: InputRange::new(5.0, 60.0, 20.0),
            bottom_time_min: InputRange::new(1.0, 60.0, 30.0),
            penalty_min: InputRange::new(0.0, 196.0, 0.0),
            ascent_speed_m_min: InputRange::new(5.0, 20.0, 10.0),
            sac_l_min: InputRange::new(10.0, 30.0, 20.0),
            tank_capacity_l: InputRange::new(10.0, 20.0, 15.0),
            fill_pressure_bar: InputRange::new(150.0, 300.0, 200.0),
            reserve_bar: InputRange::new(30.0, 80.0, 50.0),
            repetitive_failure: RepetitiveFailurePolicy::ZeroPenalty,
        }
    }
}

impl PlannerConfig {
    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_json::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    fn ranges(&self) -> [(&'static str, InputRange); 8] {
        [
            ("depth", self.depth_m),
            ("bottom_time", self.bottom_time_min),
            ("penalty", self.penalty_min),
            ("ascent_speed", self.ascent_speed_m_min),
            ("sac", self.sac_l_min),
            ("tank_capacity", self.tank_capacity_l),
            ("fill_pressure", self.fill_pressure_bar),
            ("reserve", self.reserve_bar),
        ]
    }

    fn check(&self) -> Result<(), ConfigError> {
        match self.ranges().into_iter().find(|(_, r)| !r.is_consistent()) {
            Some((name, r)) => Err(ConfigError::Range {
                name,
                min: r.min,
                default: r.default,
                max: r.max,
            }),
            None => Ok(()),
        }
    }

    /// A first dive using every default.
    pub fn default_parameters(&self) -> DiveParameters {
        DiveParameters {
            depth_m: self.depth_m.default,
            bottom_time_min: self.bottom_time_min.default,
            repetitive: RepetitiveDive::None,
            ascent_speed_m_min: self.ascent_speed_m_min.default,
            sac_l_min: self.sac_l_min.default,
            tank_capacity_l: self.tank_capacity_l.default,
            fill_pressure_bar: self.fill_pressure_bar.default,
            reserve_bar: self.reserve_bar.default,
        }
    }

    /// One message per parameter outside its recommended range.
    pub fn range_warnings(&self, params: &DiveParameters) -> Vec<String> {
        let mut checks = vec![
            ("depth", self.depth_m, params.depth_m),
            ("bottom_time", self.bottom_time_min, params.bottom_time_min),
            ("ascent_speed", self.ascent_speed_m_min, params.ascent_speed_m_min),
            ("sac", self.sac_l_min, params.sac_l_min),
            ("tank_capacity", self.tank_capacity_l, params.tank_capacity_l),
            ("fill_pressure", self.fill_pressure_bar, params.fill_pressure_bar),
            ("reserve", self.reserve_bar, params.reserve_bar),
        ];
        if let RepetitiveDive::Manual { penalty_minutes } = params.repetitive {
            checks.push(("penalty", self.penalty_min, f64::from(penalty_minutes)));
        }

        checks
            .into_iter()
            .filter(|(_, range, value)| !range.contains(*value))
            .map(|(name, range, value)| {
                format!(
                    "{name} {value} is outside the recommended range {}-{}",
                    range.min, range.max
                )
            })
            .collect()
    }
}
