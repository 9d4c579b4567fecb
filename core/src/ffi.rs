//! Foreign interface for mobile hosts.
//!
//! Exposes a [`DivePlanner`] object built from the three table texts and flat
//! records carrying the display figures of a plan.

use std::sync::Arc;

use crate::air_budget::Verdict;
use crate::config::PlannerConfig;
use crate::error::{PlanError, TableError};
use crate::models::{DiveParameters, GroupCode, RepetitiveDive};
use crate::planner::{Planner, RepetitiveOutcome};
use crate::report::PlanReport;
use crate::table::TableSet;

// ============================================================================
// FFI Types
// ============================================================================

/// Diver inputs for one plan.
#[derive(Debug, Clone, uniffi::Record)]
pub struct PlanRequest {
    pub depth_m: f64,
    pub bottom_time_min: f64,
    /// Group letter after the previous dive, for a repetitive dive
    pub previous_group: Option<String>,
    /// Minutes since surfacing from the previous dive
    pub surface_interval_min: Option<u32>,
    /// Penalty entered directly, instead of a previous group
    pub manual_penalty_min: Option<u32>,
    pub ascent_speed_m_min: f64,
    pub sac_l_min: f64,
    pub tank_capacity_l: f64,
    pub fill_pressure_bar: f64,
    pub reserve_bar: f64,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct StopEntry {
    pub depth_m: u32,
    pub minutes: u32,
    pub volume_l: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum BudgetVerdict {
    Feasible,
    ReserveInsufficient,
    Infeasible,
}

impl From<Verdict> for BudgetVerdict {
    fn from(v: Verdict) -> Self {
        match v {
            Verdict::Feasible => BudgetVerdict::Feasible,
            Verdict::ReserveInsufficient => BudgetVerdict::ReserveInsufficient,
            Verdict::Infeasible => BudgetVerdict::Infeasible,
        }
    }
}

/// Display figures of a plan, rounded.
#[derive(Debug, Clone, uniffi::Record)]
pub struct PlanSummary {
    pub penalty_min: u32,
    /// Why the repetitive penalty could not be resolved, when it fell back to zero
    pub penalty_failure: Option<String>,
    pub effective_duration_min: f64,
    pub group: Option<String>,
    pub stops: Vec<StopEntry>,
    pub ascent_time_min: f64,
    pub dtr_min: f64,
    pub total_dive_time_min: f64,
    pub bottom_volume_l: f64,
    pub ascent_volume_l: f64,
    pub stop_volume_l: f64,
    pub total_volume_l: f64,
    pub total_available_l: f64,
    pub takeoff_pressure_bar: f64,
    pub remaining_pressure_bar: f64,
    pub margin_bar: f64,
    pub verdict: BudgetVerdict,
    pub warnings: Vec<String>,
    /// Plain-text summary
    pub text: String,
}

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum PlannerFailure {
    #[error("{0}")]
    Tables(#[from] TableError),

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Request(String),

    #[error("{0}")]
    Plan(#[from] PlanError),
}

// ============================================================================
// Conversions
// ============================================================================

impl PlanRequest {
    fn to_parameters(&self) -> Result<DiveParameters, PlannerFailure> {
        let repetitive = match (
            &self.previous_group,
            self.surface_interval_min,
            self.manual_penalty_min,
        ) {
            (Some(_), _, Some(_)) => {
                return Err(PlannerFailure::Request(
                    "give either a previous group or a manual penalty, not both".to_string(),
                ))
            }
            (Some(group), Some(interval), None) => RepetitiveDive::Tabled {
                group: group.parse::<GroupCode>().map_err(PlannerFailure::Request)?,
                surface_interval_minutes: interval,
            },
            (Some(_), None, None) => {
                return Err(PlannerFailure::Request(
                    "a previous group needs a surface interval".to_string(),
                ))
            }
            (None, Some(_), _) => {
                return Err(PlannerFailure::Request(
                    "a surface interval needs a previous group".to_string(),
                ))
            }
            (None, None, Some(minutes)) => RepetitiveDive::Manual {
                penalty_minutes: minutes,
            },
            (None, None, None) => RepetitiveDive::None,
        };

        Ok(DiveParameters {
            depth_m: self.depth_m,
            bottom_time_min: self.bottom_time_min,
            repetitive,
            ascent_speed_m_min: self.ascent_speed_m_min,
            sac_l_min: self.sac_l_min,
            tank_capacity_l: self.tank_capacity_l,
            fill_pressure_bar: self.fill_pressure_bar,
            reserve_bar: self.reserve_bar,
        })
    }
}

impl PlanSummary {
    fn new(report: &PlanReport, repetitive: &RepetitiveOutcome) -> Self {
        let penalty_failure = match repetitive {
            RepetitiveOutcome::Fallback { error } => Some(error.to_string()),
            _ => None,
        };

        PlanSummary {
            penalty_min: report.penalty_min,
            penalty_failure,
            effective_duration_min: report.effective_duration_min,
            group: report.group.map(|g| g.to_string()),
            stops: report
                .stops
                .iter()
                .map(|s| StopEntry {
                    depth_m: s.depth_m,
                    minutes: s.minutes,
                    volume_l: s.volume_l,
                })
                .collect(),
            ascent_time_min: report.ascent_time_min,
            dtr_min: report.dtr_min,
            total_dive_time_min: report.total_dive_time_min,
            bottom_volume_l: report.bottom_volume_l,
            ascent_volume_l: report.ascent_volume_l,
            stop_volume_l: report.stop_volume_l,
            total_volume_l: report.total_volume_l,
            total_available_l: report.total_available_l,
            takeoff_pressure_bar: report.takeoff_pressure_bar,
            remaining_pressure_bar: report.remaining_pressure_bar,
            margin_bar: report.margin_bar,
            verdict: report.verdict.into(),
            warnings: report.warnings.clone(),
            text: report.to_string(),
        }
    }
}

// ============================================================================
// Exported API
// ============================================================================

#[derive(Debug, uniffi::Object)]
pub struct DivePlanner {
    inner: Planner,
}

#[uniffi::export]
impl DivePlanner {
    /// Load the three tables with the default configuration.
    #[uniffi::constructor]
    pub fn new(
        decompression_csv: String,
        nitrogen_csv: String,
        penalty_csv: String,
    ) -> Result<Arc<Self>, PlannerFailure> {
        Self::with_config(
            decompression_csv,
            nitrogen_csv,
            penalty_csv,
            "{}".to_string(),
        )
    }

    /// Load the three tables with a JSON [`PlannerConfig`].
    #[uniffi::constructor]
    pub fn with_config(
        decompression_csv: String,
        nitrogen_csv: String,
        penalty_csv: String,
        config_json: String,
    ) -> Result<Arc<Self>, PlannerFailure> {
        let tables = TableSet::from_csv(&decompression_csv, &nitrogen_csv, &penalty_csv)?;
        let config = PlannerConfig::from_json(&config_json)
            .map_err(|e| PlannerFailure::Config(e.to_string()))?;
        Ok(Arc::new(DivePlanner {
            inner: Planner::new(Arc::new(tables), config),
        }))
    }

    /// A request pre-filled with the configured defaults.
    pub fn default_request(&self) -> PlanRequest {
        let p = self.inner.config().default_parameters();
        PlanRequest {
            depth_m: p.depth_m,
            bottom_time_min: p.bottom_time_min,
            previous_group: None,
            surface_interval_min: None,
            manual_penalty_min: None,
            ascent_speed_m_min: p.ascent_speed_m_min,
            sac_l_min: p.sac_l_min,
            tank_capacity_l: p.tank_capacity_l,
            fill_pressure_bar: p.fill_pressure_bar,
            reserve_bar: p.reserve_bar,
        }
    }

    pub fn plan(&self, request: PlanRequest) -> Result<PlanSummary, PlannerFailure> {
        let params = request.to_parameters()?;
        let plan = self.inner.plan(&params)?;
        Ok(PlanSummary::new(&PlanReport::from_plan(&plan), &plan.repetitive))
    }
}
