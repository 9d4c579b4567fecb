//! Time penalty ("majoration") for repetitive dives.
//!
//! Both axes are read upward to the next tabulated bracket: the first MAJO
//! threshold at or above the residual nitrogen, and the first depth column at
//! or above the planned depth. Nothing is interpolated.

use serde::Serialize;

use crate::error::{PenaltyError, TableError};
use crate::table::{parser, strictly_ascending};

#[derive(Debug, Clone, PartialEq)]
pub struct TimePenaltyTable {
    /// MAJO thresholds, ascending
    thresholds: Vec<f64>,
    /// Depth columns (m), ascending
    depths: Vec<f64>,
    /// `minutes[row][column]`
    minutes: Vec<Vec<u32>>,
}

impl TimePenaltyTable {
    pub fn new(
        thresholds: Vec<f64>,
        depths: Vec<f64>,
        minutes: Vec<Vec<u32>>,
    ) -> Result<Self, TableError> {
        if thresholds.is_empty() {
            return Err(TableError::Empty);
        }
        if depths.is_empty() {
            return Err(TableError::MissingColumn("depth".to_string()));
        }
        if !strictly_ascending(thresholds.iter().copied()) {
            return Err(TableError::UnsortedAxis { axis: "MAJO" });
        }
        if !strictly_ascending(depths.iter().copied()) {
            return Err(TableError::UnsortedAxis { axis: "depth" });
        }
        if minutes.len() != thresholds.len() {
            return Err(TableError::RaggedRow {
                line: minutes.len().min(thresholds.len()) + 1,
                expected: thresholds.len(),
                found: minutes.len(),
            });
        }
        if let Some((i, row)) = minutes
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != depths.len())
        {
            return Err(TableError::RaggedRow {
                line: i + 1,
                expected: depths.len(),
                found: row.len(),
            });
        }

        Ok(TimePenaltyTable {
            thresholds,
            depths,
            minutes,
        })
    }

    pub fn from_csv(text: &str) -> Result<Self, TableError> {
        let table = parser::parse(text)?;
        let majo = table.column("MAJO")?;
        let columns = table.numeric_columns();
        let depths = columns.iter().map(|&(_, d)| f64::from(d)).collect();

        let mut thresholds = Vec::with_capacity(table.rows().len());
        let mut minutes = Vec::with_capacity(table.rows().len());
        for row in table.rows() {
            thresholds.push(table.number(row, majo)?);
            minutes.push(
                columns
                    .iter()
                    .map(|&(column, _)| table.minutes(row, column))
                    .collect::<Result<Vec<_>, _>>()?,
            );
        }

        TimePenaltyTable::new(thresholds, depths, minutes)
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn depths(&self) -> &[f64] {
        &self.depths
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePenalty {
    pub minutes: u32,
    /// MAJO threshold of the selected row.
    pub threshold: f64,
    /// Depth of the selected column (m).
    pub depth_column_m: f64,
}

/// Minutes to add to the bottom time of a dive to `depth` meters with `nitrogen` residual load.
pub fn resolve_time_penalty(
    nitrogen: f64,
    depth: f64,
    table: &TimePenaltyTable,
) -> Result<TimePenalty, PenaltyError> {
    let row = first_at_or_above(&table.thresholds, nitrogen).ok_or_else(|| {
        PenaltyError::NitrogenTooHigh {
            nitrogen,
            highest: table.thresholds[table.thresholds.len() - 1],
        }
    })?;
    let column = first_at_or_above(&table.depths, depth).ok_or_else(|| PenaltyError::DepthTooDeep {
        depth,
        deepest: table.depths[table.depths.len() - 1],
    })?;

    let minutes = table.minutes[row][column];
    tracing::debug!(nitrogen, depth, row, column, minutes, "time penalty resolved");

    Ok(TimePenalty {
        minutes,
        threshold: table.thresholds[row],
        depth_column_m: table.depths[column],
    })
}

fn first_at_or_above(axis: &[f64], value: f64) -> Option<usize> {
    axis.iter().position(|&t| t >= value)
}
