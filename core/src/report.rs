//! Display figures for a [`DivePlan`].
//!
//! Liters, minutes and bar are rounded to one decimal here, and negative
//! pressures are shown as zero. The computation itself stays unrounded;
//! only the verdict reads the rounded remaining pressure, through [`round1`].

use std::fmt;

use serde::Serialize;

use crate::air_budget::Verdict;
use crate::models::GroupCode;
use crate::planner::DivePlan;

/// Round to one decimal for display.
pub fn round1(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // Avoid printing "-0.0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopLine {
    pub depth_m: u32,
    pub minutes: u32,
    pub rate_l_min: f64,
    pub volume_l: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub bottom_time_min: f64,
    pub penalty_min: u32,
    pub effective_duration_min: f64,
    pub group: Option<GroupCode>,
    pub stops: Vec<StopLine>,
    pub ascent_time_min: f64,
    pub dtr_min: f64,
    pub total_dive_time_min: f64,
    pub bottom_volume_l: f64,
    pub ascent_volume_l: f64,
    pub stop_volume_l: f64,
    pub total_volume_l: f64,
    pub total_available_l: f64,
    pub remaining_volume_l: f64,
    pub takeoff_pressure_bar: f64,
    pub remaining_pressure_bar: f64,
    /// Signed: surplus over the reserve when positive
    pub margin_bar: f64,
    /// Unclamped remaining pressure, rounded; negative when the tank runs dry
    pub remaining_pressure_real_bar: f64,
    pub verdict: Verdict,
    pub warnings: Vec<String>,
}

impl PlanReport {
    pub fn from_plan(plan: &DivePlan) -> Self {
        let c = &plan.consumption;
        let budget = &plan.air_budget;

        PlanReport {
            bottom_time_min: plan.parameters.bottom_time_min,
            penalty_min: plan.repetitive.penalty_minutes(),
            effective_duration_min: plan.effective_duration,
            group: plan.decompression.group,
            stops: c
                .stops
                .iter()
                .map(|s| StopLine {
                    depth_m: s.depth.meters(),
                    minutes: s.minutes,
                    rate_l_min: round1(s.rate),
                    volume_l: round1(s.volume),
                })
                .collect(),
            ascent_time_min: round1(c.ascent_time),
            dtr_min: round1(c.dtr),
            total_dive_time_min: round1(c.total_dive_time),
            bottom_volume_l: round1(c.bottom_volume),
            ascent_volume_l: round1(c.ascent_volume),
            stop_volume_l: round1(c.total_stop_volume),
            total_volume_l: round1(c.total_volume),
            total_available_l: round1(budget.total_available),
            remaining_volume_l: round1(budget.remaining_volume),
            takeoff_pressure_bar: round1(budget.takeoff_pressure_clamped()),
            remaining_pressure_bar: round1(budget.remaining_pressure_clamped()),
            margin_bar: round1(budget.margin),
            remaining_pressure_real_bar: round1(budget.remaining_pressure),
            verdict: budget.verdict,
            warnings: plan.warnings.clone(),
        }
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.penalty_min > 0 {
            writeln!(
                f,
                "Effective bottom time: {} + {} = {} min",
                self.bottom_time_min, self.penalty_min, self.effective_duration_min
            )?;
        }
        writeln!(f, "DTR: {:.1} min", self.dtr_min)?;
        writeln!(f, "Total dive time: {:.1} min", self.total_dive_time_min)?;

        if self.stops.is_empty() {
            writeln!(f, "No decompression stop required")?;
        } else {
            for stop in &self.stops {
                writeln!(f, "Stop at {}m: {} min", stop.depth_m, stop.minutes)?;
            }
        }
        if let Some(group) = self.group {
            writeln!(f, "Group: {group}")?;
        }

        writeln!(
            f,
            "Air used: bottom {:.1} L, ascent {:.1} L, stops {:.1} L, total {:.1} L",
            self.bottom_volume_l, self.ascent_volume_l, self.stop_volume_l, self.total_volume_l
        )?;

        let detail = match self.verdict {
            Verdict::Feasible => format!(
                "{:.1} bar left, margin {:+.1} bar",
                self.remaining_pressure_bar, self.margin_bar
            ),
            Verdict::ReserveInsufficient => format!(
                "{:.1} bar left, {:.1} bar short of the reserve",
                self.remaining_pressure_bar,
                self.margin_bar.abs()
            ),
            Verdict::Infeasible if self.remaining_pressure_real_bar < 0.0 => format!(
                "air runs out, {:.1} bar short",
                self.remaining_pressure_real_bar.abs()
            ),
            Verdict::Infeasible => "tank empty at the surface".to_string(),
        };
        write!(f, "{}: {}", self.verdict.label(), detail)?;

        for warning in &self.warnings {
            write!(f, "\nWarning: {warning}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air_budget::evaluate_air_budget;
    use crate::config::PlannerConfig;
    use crate::models::DiveParameters;
    use crate::planner::plan_dive;
    use crate::table::fixtures;

    fn report(params: &DiveParameters) -> PlanReport {
        let plan = plan_dive(params, &fixtures::tables(), &PlannerConfig::default()).unwrap();
        PlanReport::from_plan(&plan)
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(74.666_666), 74.7);
        assert_eq!(round1(24.666_666), 24.7);
        assert_eq!(round1(-0.04), 0.0);
        assert!(round1(-0.04).is_sign_positive());
        assert_eq!(round1(2.0), 2.0);
    }

    #[test]
    fn test_feasible_report() {
        let r = report(&PlannerConfig::default().default_parameters());
        assert_eq!(r.remaining_pressure_bar, 74.7);
        assert_eq!(r.margin_bar, 24.7);
        assert_eq!(r.total_volume_l, 1880.0);
        assert_eq!(
            r.to_string(),
            "DTR: 2.0 min\n\
             Total dive time: 32.0 min\n\
             No decompression stop required\n\
             Group: G\n\
             Air used: bottom 1800.0 L, ascent 80.0 L, stops 0.0 L, total 1880.0 L\n\
             Dive feasible: 74.7 bar left, margin +24.7 bar"
        );
    }

    #[test]
    fn test_infeasible_report_clamps() {
        let params = DiveParameters {
            depth_m: 40.0,
            bottom_time_min: 35.0,
            tank_capacity_l: 10.0,
            fill_pressure_bar: 150.0,
            ..PlannerConfig::default().default_parameters()
        };
        let r = report(&params);
        assert_eq!(r.verdict, Verdict::Infeasible);
        assert_eq!(r.remaining_pressure_bar, 0.0);
        assert!(r.remaining_pressure_real_bar < 0.0);
        assert_eq!(r.stops.len(), 3);
        assert!(r.to_string().contains("Dive impossible: air runs out"));
    }

    #[test]
    fn test_report_agrees_with_verdict_at_reserve() {
        let mut plan = plan_dive(
            &PlannerConfig::default().default_parameters(),
            &fixtures::tables(),
            &PlannerConfig::default(),
        )
        .unwrap();

        plan.air_budget = evaluate_air_budget(10.0, 200.0, 50.0, 1500.4, 1400.0).unwrap();
        let r = PlanReport::from_plan(&plan);
        assert_eq!(r.remaining_pressure_bar, 50.0);
        assert_eq!(r.margin_bar, 0.0);
        assert!(r
            .to_string()
            .ends_with("Dive feasible: 50.0 bar left, margin +0.0 bar"));

        plan.air_budget = evaluate_air_budget(10.0, 200.0, 50.0, 1999.6, 1400.0).unwrap();
        let r = PlanReport::from_plan(&plan);
        assert_eq!(r.verdict, Verdict::Infeasible);
        assert!(r
            .to_string()
            .ends_with("Dive impossible: tank empty at the surface"));
    }

    #[test]
    fn test_warnings_listed() {
        let params = DiveParameters {
            sac_l_min: 35.0,
            ..PlannerConfig::default().default_parameters()
        };
        let text = report(&params).to_string();
        assert!(text.ends_with("Warning: sac 35 is outside the recommended range 10-30"));
    }
}
