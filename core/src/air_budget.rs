//! Tank pressure balance and the go/no-go verdict.

use serde::Serialize;

use crate::error::InputError;
use crate::models::{require_non_negative, require_positive};
use crate::report::round1;

/// Outcome of comparing the pressure left after the dive with the reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The reserve is still in the tank at the surface.
    Feasible,
    /// Air remains, but less than the reserve.
    ReserveInsufficient,
    /// The tank is empty before the end of the dive.
    Infeasible,
}

impl Verdict {
    /// Partition of the remaining pressure at 0 and at `reserve`.
    ///
    /// An empty tank is infeasible even when the reserve is zero.
    pub fn classify(remaining_pressure: f64, reserve: f64) -> Self {
        if remaining_pressure <= 0.0 || remaining_pressure.is_nan() {
            Verdict::Infeasible
        } else if remaining_pressure >= reserve {
            Verdict::Feasible
        } else {
            Verdict::ReserveInsufficient
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Feasible => "Dive feasible",
            Verdict::ReserveInsufficient => "Reserve insufficient",
            Verdict::Infeasible => "Dive impossible",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirBudget {
    /// Tank capacity times fill pressure (L)
    pub total_available: f64,
    /// Pressure when the ascent starts (bar); may be negative
    pub takeoff_pressure: f64,
    /// Air left at the surface (L); may be negative
    pub remaining_volume: f64,
    /// Pressure left at the surface (bar); may be negative
    pub remaining_pressure: f64,
    /// `remaining_pressure - reserve`: surplus when positive, shortfall when negative
    pub margin: f64,
    pub verdict: Verdict,
}

impl AirBudget {
    /// Takeoff pressure as shown to the diver, never below zero.
    pub fn takeoff_pressure_clamped(&self) -> f64 {
        self.takeoff_pressure.max(0.0)
    }

    /// Remaining pressure as shown to the diver, never below zero.
    pub fn remaining_pressure_clamped(&self) -> f64 {
        self.remaining_pressure.max(0.0)
    }
}

/// Balance the tank against the planned consumption.
pub fn evaluate_air_budget(
    tank_capacity: f64,
    fill_pressure: f64,
    reserve: f64,
    total_volume: f64,
    bottom_volume: f64,
) -> Result<AirBudget, InputError> {
    require_positive("tank_capacity", tank_capacity)?;
    require_positive("fill_pressure", fill_pressure)?;
    require_non_negative("reserve", reserve)?;
    require_non_negative("total_volume", total_volume)?;
    require_non_negative("bottom_volume", bottom_volume)?;

    let total_available = tank_capacity * fill_pressure;
    let takeoff_pressure = (total_available - bottom_volume) / tank_capacity;
    let remaining_volume = total_available - total_volume;
    let remaining_pressure = remaining_volume / tank_capacity;

    Ok(AirBudget {
        total_available,
        takeoff_pressure,
        remaining_volume,
        remaining_pressure,
        margin: remaining_pressure - reserve,
        // Compared at display precision so the verdict matches the pressure shown.
        verdict: Verdict::classify(round1(remaining_pressure), reserve),
    })
}
