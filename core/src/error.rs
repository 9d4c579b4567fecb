use thiserror::Error;

use crate::models::GroupCode;

/// Error type for reading and validating the MN90 reference tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("malformed table text: {0}")]
    Syntax(String),

    #[error("table has no header row")]
    MissingHeader,

    #[error("missing column: {0}")]
    MissingColumn(String),

    #[error("line {line}: expected {expected} cells, got {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column {column}: invalid number '{value}'")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("line {line}: invalid group code '{value}'")]
    InvalidGroup { line: usize, value: String },

    #[error("duplicate group code {0}")]
    DuplicateGroup(GroupCode),

    #[error("{axis} axis must be strictly ascending")]
    UnsortedAxis { axis: &'static str },

    #[error("table has no rows")]
    Empty,
}

/// The decompression table has no row covering the requested dive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecompressionError {
    #[error("no decompression row for {depth}m / {duration}min")]
    NoMatch { depth: f64, duration: f64 },
}

/// Failure to resolve the residual nitrogen of a previous dive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NitrogenError {
    #[error("unknown group code {0}")]
    UnknownGroup(GroupCode),

    #[error("surface interval of {interval}min is shorter than the first tabulated interval ({shortest}min)")]
    IntervalTooShort { interval: u32, shortest: u32 },

    #[error("surface interval of {interval}min is beyond the table range for group {group}")]
    IntervalTooLong { group: GroupCode, interval: u32 },
}

/// Failure to resolve the time penalty for a repetitive dive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PenaltyError {
    #[error("residual nitrogen {nitrogen} exceeds the highest tabulated value ({highest})")]
    NitrogenTooHigh { nitrogen: f64, highest: f64 },

    #[error("depth {depth}m exceeds the deepest tabulated column ({deepest}m)")]
    DepthTooDeep { depth: f64, deepest: f64 },
}

/// A caller-supplied parameter is out of its domain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("invalid input: {field} = {value}")]
    InvalidInput { field: &'static str, value: f64 },
}

impl InputError {
    pub(crate) fn invalid(field: &'static str, value: f64) -> Self {
        InputError::InvalidInput { field, value }
    }
}

/// Error loading a [`crate::config::PlannerConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid planner configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("range for {name} is inconsistent: {min} <= {default} <= {max} does not hold")]
    Range {
        name: &'static str,
        min: f64,
        default: f64,
        max: f64,
    },
}

/// Either stage of the repetitive-dive chain failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepetitiveError {
    #[error(transparent)]
    Nitrogen(#[from] NitrogenError),

    #[error(transparent)]
    Penalty(#[from] PenaltyError),
}

/// Error type for a complete planning request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("cannot plan this dive: {0}")]
    Decompression(#[from] DecompressionError),

    #[error("repetitive dive rejected: {0}")]
    Repetitive(#[from] RepetitiveError),
}
