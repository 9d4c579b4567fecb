pub mod air_budget;
pub mod config;
pub mod consumption;
pub mod decompression;
pub mod error;
pub mod ffi;
pub mod models;
pub mod nitrogen;
pub mod penalty;
pub mod planner;
pub mod report;
pub mod table;

uniffi::setup_scaffolding!();

pub use air_budget::{evaluate_air_budget, AirBudget, Verdict};
pub use config::{InputRange, PlannerConfig, RepetitiveFailurePolicy};
pub use consumption::{absolute_pressure, compute_consumption, Consumption, StopConsumption};
pub use decompression::{resolve_decompression, Decompression, DecompressionRow, DecompressionTable};
pub use error::{
    ConfigError, DecompressionError, InputError, NitrogenError, PenaltyError, PlanError,
    RepetitiveError, TableError,
};
pub use ffi::{BudgetVerdict, DivePlanner, PlanRequest, PlanSummary, PlannerFailure, StopEntry};
pub use models::{DiveParameters, GroupCode, RepetitiveDive, StopDepth, StopSchedule};
pub use nitrogen::{
    resolve_residual_nitrogen, IntervalMatch, ResidualNitrogen, ResidualNitrogenTable,
};
pub use penalty::{resolve_time_penalty, TimePenalty, TimePenaltyTable};
pub use planner::{plan_dive, DivePlan, Planner, RepetitiveOutcome};
pub use report::{PlanReport, StopLine};
pub use table::TableSet;
