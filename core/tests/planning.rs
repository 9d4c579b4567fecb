use std::sync::Arc;

use mn90_compute::{
    compute_consumption, evaluate_air_budget, plan_dive, resolve_decompression,
    resolve_residual_nitrogen, DecompressionError, DiveParameters, GroupCode, IntervalMatch,
    PlanError, PlanReport, Planner, PlannerConfig, RepetitiveDive, RepetitiveOutcome, StopDepth,
    StopSchedule, TableSet, Verdict,
};

fn tables() -> TableSet {
    TableSet::from_csv(
        include_str!("data/mn90.csv"),
        include_str!("data/residual_nitrogen.csv"),
        include_str!("data/time_penalty.csv"),
    )
    .unwrap()
}

fn defaults() -> DiveParameters {
    PlannerConfig::default().default_parameters()
}

// Scenario A: 20m for 30min, no stops
#[test]
fn test_consumption_square_profile() {
    let c = compute_consumption(20.0, 30.0, 20.0, 10.0, &StopSchedule::default()).unwrap();

    assert!((c.pressure_max - 3.0).abs() < f64::EPSILON);
    assert!((c.rate_at_depth - 60.0).abs() < f64::EPSILON);
    assert!((c.rate_at_mid_depth - 40.0).abs() < f64::EPSILON);
    assert!((c.ascent_time - 2.0).abs() < f64::EPSILON);
    assert!((c.ascent_volume - 80.0).abs() < f64::EPSILON);
    assert!((c.bottom_volume - 1800.0).abs() < f64::EPSILON);
    assert!((c.total_volume - 1880.0).abs() < f64::EPSILON);
    assert!((c.dtr - 2.0).abs() < f64::EPSILON);
    assert!((c.total_dive_time - 32.0).abs() < f64::EPSILON);
    assert!(c.stops.is_empty());
}

// Scenario B: 15L at 200 bar with a 50 bar reserve
#[test]
fn test_air_budget_after_scenario_a() {
    let budget = evaluate_air_budget(15.0, 200.0, 50.0, 1880.0, 1800.0).unwrap();

    assert!((budget.total_available - 3000.0).abs() < f64::EPSILON);
    assert!((budget.remaining_volume - 1120.0).abs() < f64::EPSILON);
    assert!((budget.remaining_pressure - 1120.0 / 15.0).abs() < 1e-12);
    assert_eq!(budget.verdict, Verdict::Feasible);
}

// Scenario C: group B, 50 min at the surface
#[test]
fn test_nitrogen_reads_lower_interval() {
    let tables = tables();
    let group = GroupCode::try_from('B').unwrap();
    let n = resolve_residual_nitrogen(group, 50, tables.nitrogen()).unwrap();

    assert_eq!(n.interval_used, 45);
    assert_eq!(n.method, IntervalMatch::Lower);
}

// Scenario D: deeper than any table row
#[test]
fn test_too_deep_has_no_plan() {
    let tables = tables();
    let err = resolve_decompression(65.0, 30.0, tables.decompression()).unwrap_err();
    assert_eq!(
        err,
        DecompressionError::NoMatch {
            depth: 65.0,
            duration: 30.0
        }
    );

    let params = DiveParameters {
        depth_m: 65.0,
        ..defaults()
    };
    let err = plan_dive(&params, &tables, &PlannerConfig::default()).unwrap_err();
    assert!(matches!(err, PlanError::Decompression(_)));
}

#[test]
fn test_first_dive_end_to_end() {
    let plan = plan_dive(&defaults(), &tables(), &PlannerConfig::default()).unwrap();
    let report = PlanReport::from_plan(&plan);

    assert_eq!(report.total_volume_l, 1880.0);
    assert_eq!(report.remaining_pressure_bar, 74.7);
    assert_eq!(report.margin_bar, 24.7);
    assert_eq!(report.dtr_min, 2.0);
    assert_eq!(report.verdict, Verdict::Feasible);
    assert_eq!(report.group.map(GroupCode::letter), Some('G'));
}

#[test]
fn test_repetitive_dive_end_to_end() {
    let params = DiveParameters {
        depth_m: 20.0,
        bottom_time_min: 20.0,
        repetitive: RepetitiveDive::Tabled {
            group: GroupCode::try_from('B').unwrap(),
            surface_interval_minutes: 50,
        },
        ..defaults()
    };
    let plan = plan_dive(&params, &tables(), &PlannerConfig::default()).unwrap();

    assert_eq!(plan.repetitive.penalty_minutes(), 11);
    assert!((plan.effective_duration - 31.0).abs() < f64::EPSILON);
    // Penalty feeds the bottom volume as well as the table lookup.
    assert!((plan.consumption.bottom_volume - 31.0 * 60.0).abs() < f64::EPSILON);
    assert!((plan.consumption.total_dive_time - 33.0).abs() < f64::EPSILON);
}

#[test]
fn test_deco_dive_stops_and_budget() {
    let params = DiveParameters {
        depth_m: 35.0,
        bottom_time_min: 33.0,
        ..defaults()
    };
    let plan = plan_dive(&params, &tables(), &PlannerConfig::default()).unwrap();
    let stops = &plan.decompression.stops;

    assert_eq!(stops.minutes_at(StopDepth::M9), 3);
    assert_eq!(stops.minutes_at(StopDepth::M6), 11);
    assert_eq!(stops.minutes_at(StopDepth::M3), 32);
    assert_eq!(plan.consumption.total_stop_minutes, 46);
    // 9m: 3 x 38, 6m: 11 x 32, 3m: 32 x 26
    assert!((plan.consumption.total_stop_volume - 1298.0).abs() < 1e-9);
    assert!((plan.consumption.dtr - 49.5).abs() < 1e-12);
    assert_eq!(plan.air_budget.verdict, Verdict::Infeasible);
}

#[test]
fn test_planner_reused_for_many_requests() {
    let planner = Planner::new(Arc::new(tables()), PlannerConfig::default());

    for minutes in [0, 5, 12] {
        let params = DiveParameters {
            depth_m: 25.0,
            bottom_time_min: 15.0,
            repetitive: RepetitiveDive::Manual {
                penalty_minutes: minutes,
            },
            ..defaults()
        };
        let plan = planner.plan(&params).unwrap();
        assert!(matches!(plan.repetitive, RepetitiveOutcome::Manual { .. }));
        assert!((plan.effective_duration - f64::from(15 + minutes)).abs() < f64::EPSILON);
    }
}
