//! End-to-end dive planning.
//!
//! The chain runs once per request, without retries:
//!
//! 1. repetitive dive: residual nitrogen, then time penalty (optional)
//! 2. decompression lookup at `bottom time + penalty`
//! 3. air consumption over the resulting profile
//! 4. air budget and verdict
//!
//! A failed repetitive lookup is the only failure the chain may step over,
//! and only under [`RepetitiveFailurePolicy::ZeroPenalty`]: the dive is then
//! planned with no added time and the failure is kept in the plan.

use std::sync::Arc;

use serde::Serialize;

use crate::air_budget::{evaluate_air_budget, AirBudget};
use crate::config::{PlannerConfig, RepetitiveFailurePolicy};
use crate::consumption::{compute_consumption, Consumption};
use crate::decompression::{resolve_decompression, Decompression};
use crate::error::{PlanError, RepetitiveError};
use crate::models::{DiveParameters, GroupCode, RepetitiveDive};
use crate::nitrogen::{resolve_residual_nitrogen, ResidualNitrogen};
use crate::penalty::{resolve_time_penalty, TimePenalty};
use crate::table::TableSet;

/// Where the added bottom time came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepetitiveOutcome {
    None,
    Manual {
        minutes: u32,
    },
    Tabled {
        nitrogen: ResidualNitrogen,
        penalty: TimePenalty,
    },
    /// The lookup failed and the dive was planned with no added time.
    Fallback {
        #[serde(serialize_with = "as_display")]
        error: RepetitiveError,
    },
}

impl RepetitiveOutcome {
    pub fn penalty_minutes(&self) -> u32 {
        match self {
            RepetitiveOutcome::Manual { minutes } => *minutes,
            RepetitiveOutcome::Tabled { penalty, .. } => penalty.minutes,
            RepetitiveOutcome::None | RepetitiveOutcome::Fallback { .. } => 0,
        }
    }
}

fn as_display<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: std::fmt::Display,
{
    serializer.collect_str(value)
}

/// Everything computed for one planning request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivePlan {
    pub parameters: DiveParameters,
    pub repetitive: RepetitiveOutcome,
    /// Bottom time plus penalty (min); the duration every later stage uses.
    pub effective_duration: f64,
    pub decompression: Decompression,
    pub consumption: Consumption,
    pub air_budget: AirBudget,
    pub warnings: Vec<String>,
}

/// Plan one dive against a loaded table set.
pub fn plan_dive(
    params: &DiveParameters,
    tables: &TableSet,
    config: &PlannerConfig,
) -> Result<DivePlan, PlanError> {
    params.validate()?;

    let mut warnings = config.range_warnings(params);
    for warning in &warnings {
        tracing::warn!(%warning, "parameter outside recommended range");
    }

    let repetitive = resolve_repetitive(params, tables, config.repetitive_failure)?;
    if let RepetitiveOutcome::Fallback { error } = &repetitive {
        warnings.push(format!(
            "repetitive dive not resolved, planned without added time: {error}"
        ));
    }

    let effective_duration = params.bottom_time_min + f64::from(repetitive.penalty_minutes());

    let decompression =
        resolve_decompression(params.depth_m, effective_duration, tables.decompression())?;
    let consumption = compute_consumption(
        params.depth_m,
        effective_duration,
        params.sac_l_min,
        params.ascent_speed_m_min,
        &decompression.stops,
    )?;
    let air_budget = evaluate_air_budget(
        params.tank_capacity_l,
        params.fill_pressure_bar,
        params.reserve_bar,
        consumption.total_volume,
        consumption.bottom_volume,
    )?;

    tracing::info!(
        depth = params.depth_m,
        effective_duration,
        total_volume = consumption.total_volume,
        verdict = ?air_budget.verdict,
        "dive planned"
    );

    Ok(DivePlan {
        parameters: params.clone(),
        repetitive,
        effective_duration,
        decompression,
        consumption,
        air_budget,
        warnings,
    })
}

fn resolve_repetitive(
    params: &DiveParameters,
    tables: &TableSet,
    policy: RepetitiveFailurePolicy,
) -> Result<RepetitiveOutcome, PlanError> {
    let (group, interval) = match params.repetitive {
        RepetitiveDive::None => return Ok(RepetitiveOutcome::None),
        RepetitiveDive::Manual { penalty_minutes } => {
            return Ok(RepetitiveOutcome::Manual {
                minutes: penalty_minutes,
            })
        }
        RepetitiveDive::Tabled {
            group,
            surface_interval_minutes,
        } => (group, surface_interval_minutes),
    };

    match tabled_penalty(group, interval, params.depth_m, tables) {
        Ok((nitrogen, penalty)) => Ok(RepetitiveOutcome::Tabled { nitrogen, penalty }),
        Err(error) => match policy {
            RepetitiveFailurePolicy::ZeroPenalty => {
                tracing::warn!(%error, "repetitive dive lookup failed, using no penalty");
                Ok(RepetitiveOutcome::Fallback { error })
            }
            RepetitiveFailurePolicy::Reject => Err(error.into()),
        },
    }
}

fn tabled_penalty(
    group: GroupCode,
    interval: u32,
    depth: f64,
    tables: &TableSet,
) -> Result<(ResidualNitrogen, TimePenalty), RepetitiveError> {
    let nitrogen = resolve_residual_nitrogen(group, interval, tables.nitrogen())?;
    let penalty = resolve_time_penalty(nitrogen.value, depth, tables.penalty())?;
    Ok((nitrogen, penalty))
}

/// A loaded table set with its configuration, for hosts that plan many dives.
#[derive(Debug, Clone)]
pub struct Planner {
    tables: Arc<TableSet>,
    config: PlannerConfig,
}

impl Planner {
    pub fn new(tables: Arc<TableSet>, config: PlannerConfig) -> Self {
        Planner { tables, config }
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn plan(&self, params: &DiveParameters) -> Result<DivePlan, PlanError> {
        plan_dive(params, &self.tables, &self.config)
    }
}
