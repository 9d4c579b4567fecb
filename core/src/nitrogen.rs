//! Residual nitrogen after a surface interval.
//!
//! The table samples a fixed, ascending set of surface intervals. A real
//! interval that falls between two samples is read at the shorter one: a
//! longer stay at the surface off-gasses at least as much as the shorter
//! sample assumes, so reading down never understates the residual load.
//! A tabulated value of 0 marks an interval past the table's range.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{NitrogenError, TableError};
use crate::models::GroupCode;
use crate::table::{parser, strictly_ascending};

#[derive(Debug, Clone, PartialEq)]
pub struct ResidualNitrogenTable {
    intervals: Vec<u32>,
    rows: BTreeMap<GroupCode, Vec<f64>>,
}

impl ResidualNitrogenTable {
    /// Build from the sampled intervals (minutes) and one row of values per group.
    pub fn new(
        intervals: Vec<u32>,
        rows: impl IntoIterator<Item = (GroupCode, Vec<f64>)>,
    ) -> Result<Self, TableError> {
        if intervals.is_empty() {
            return Err(TableError::MissingColumn("surface interval".to_string()));
        }
        if !strictly_ascending(intervals.iter().copied()) {
            return Err(TableError::UnsortedAxis {
                axis: "surface interval",
            });
        }

        let mut map = BTreeMap::new();
        for (i, (group, values)) in rows.into_iter().enumerate() {
            if values.len() != intervals.len() {
                return Err(TableError::RaggedRow {
                    line: i + 1,
                    expected: intervals.len(),
                    found: values.len(),
                });
            }
            if map.insert(group, values).is_some() {
                return Err(TableError::DuplicateGroup(group));
            }
        }
        if map.is_empty() {
            return Err(TableError::Empty);
        }

        Ok(ResidualNitrogenTable {
            intervals,
            rows: map,
        })
    }

    pub fn from_csv(text: &str) -> Result<Self, TableError> {
        let table = parser::parse(text)?;
        let gps = table.column("GPS")?;
        let columns = table.numeric_columns();
        let intervals = columns.iter().map(|&(_, minutes)| minutes).collect();

        let mut rows = Vec::with_capacity(table.rows().len());
        for row in table.rows() {
            let group = table
                .group(row, gps)?
                .ok_or_else(|| TableError::InvalidGroup {
                    line: row.line,
                    value: String::new(),
                })?;
            let values = columns
                .iter()
                .map(|&(column, _)| table.optional_number(row, column).map(|v| v.unwrap_or(0.0)))
                .collect::<Result<Vec<_>, _>>()?;
            rows.push((group, values));
        }

        ResidualNitrogenTable::new(intervals, rows)
    }

    /// Sampled surface intervals in minutes, ascending.
    pub fn intervals(&self) -> &[u32] {
        &self.intervals
    }

    pub fn groups(&self) -> impl Iterator<Item = GroupCode> + '_ {
        self.rows.keys().copied()
    }

    pub fn row(&self, group: GroupCode) -> Option<&[f64]> {
        self.rows.get(&group).map(Vec::as_slice)
    }
}

/// How the surface interval was matched against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalMatch {
    /// The interval is a tabulated sample.
    Exact,
    /// Read at the longest tabulated sample shorter than the interval.
    Lower,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidualNitrogen {
    pub value: f64,
    /// Tabulated interval the value was read at (min).
    pub interval_used: u32,
    pub method: IntervalMatch,
}

/// Residual nitrogen for a diver in `group` after `interval` minutes at the surface.
pub fn resolve_residual_nitrogen(
    group: GroupCode,
    interval: u32,
    table: &ResidualNitrogenTable,
) -> Result<ResidualNitrogen, NitrogenError> {
    let values = table.row(group).ok_or(NitrogenError::UnknownGroup(group))?;

    let (column, method) = match table.intervals.binary_search(&interval) {
        Ok(i) => (i, IntervalMatch::Exact),
        Err(0) => {
            return Err(NitrogenError::IntervalTooShort {
                interval,
                shortest: table.intervals[0],
            })
        }
        Err(i) => (i - 1, IntervalMatch::Lower),
    };

    let value = values[column];
    if value == 0.0 {
        return Err(NitrogenError::IntervalTooLong { group, interval });
    }

    let interval_used = table.intervals[column];
    tracing::debug!(%group, interval, interval_used, value, ?method, "residual nitrogen resolved");

    Ok(ResidualNitrogen {
        value,
        interval_used,
        method,
    })
}
