//! Decompression stop lookup.
//!
//! Each table row covers a depth bracket and a duration bracket, both open at
//! the bottom and closed at the top: a dive exactly on a boundary belongs to
//! the row whose upper bound equals it. A dive outside every bracket has no
//! plan; it is never treated as a no-stop dive.

use serde::{Deserialize, Serialize};

use crate::error::{DecompressionError, TableError};
use crate::models::{GroupCode, StopDepth, StopSchedule};
use crate::table::{parser, strictly_ascending};

/// One depth x duration bracket of the decompression table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompressionRow {
    /// P1, exclusive (m)
    pub depth_above_m: f64,
    /// P2, inclusive (m)
    pub depth_to_m: f64,
    /// D1, exclusive (min)
    pub duration_above_min: f64,
    /// D2, inclusive (min)
    pub duration_to_min: f64,
    pub stops: StopSchedule,
    /// Group after the dive; `None` when the table gives no letter.
    pub group: Option<GroupCode>,
}

impl DecompressionRow {
    pub fn covers(&self, depth: f64, duration: f64) -> bool {
        depth > self.depth_above_m
            && depth <= self.depth_to_m
            && duration > self.duration_above_min
            && duration <= self.duration_to_min
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecompressionTable {
    rows: Vec<DecompressionRow>,
}

impl DecompressionTable {
    pub fn new(rows: Vec<DecompressionRow>) -> Result<Self, TableError> {
        if rows.is_empty() {
            return Err(TableError::Empty);
        }
        for row in &rows {
            if !strictly_ascending([row.depth_above_m, row.depth_to_m]) {
                return Err(TableError::UnsortedAxis { axis: "P1/P2" });
            }
            if !strictly_ascending([row.duration_above_min, row.duration_to_min]) {
                return Err(TableError::UnsortedAxis { axis: "D1/D2" });
            }
        }
        Ok(DecompressionTable { rows })
    }

    pub fn from_csv(text: &str) -> Result<Self, TableError> {
        let table = parser::parse(text)?;
        let p1 = table.column("P1")?;
        let p2 = table.column("P2")?;
        let d1 = table.column("D1")?;
        let d2 = table.column("D2")?;
        let stop_columns = StopDepth::ALL
            .iter()
            .map(|d| table.column(d.column()))
            .collect::<Result<Vec<_>, _>>()?;
        let gps = table.column("GPS")?;

        let mut rows = Vec::with_capacity(table.rows().len());
        for row in table.rows() {
            let mut minutes = [0u32; 5];
            for (slot, &column) in minutes.iter_mut().zip(&stop_columns) {
                *slot = table.minutes(row, column)?;
            }
            rows.push(DecompressionRow {
                depth_above_m: table.number(row, p1)?,
                depth_to_m: table.number(row, p2)?,
                duration_above_min: table.number(row, d1)?,
                duration_to_min: table.number(row, d2)?,
                stops: StopSchedule::new(minutes),
                group: table.group(row, gps)?,
            });
        }

        DecompressionTable::new(rows)
    }

    pub fn rows(&self) -> &[DecompressionRow] {
        &self.rows
    }

    /// Deepest depth any row covers.
    pub fn max_depth_m(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.depth_to_m)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Stops and group for one dive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decompression {
    pub stops: StopSchedule,
    pub group: Option<GroupCode>,
    /// Index of the matched table row.
    pub row: usize,
}

/// Find the stop schedule and group for a dive of `duration` minutes at `depth` meters.
///
/// `duration` is the effective bottom time, i.e. including any repetitive-dive penalty.
pub fn resolve_decompression(
    depth: f64,
    duration: f64,
    table: &DecompressionTable,
) -> Result<Decompression, DecompressionError> {
    let (row, matched) = table
        .rows
        .iter()
        .enumerate()
        .find(|(_, r)| r.covers(depth, duration))
        .ok_or(DecompressionError::NoMatch { depth, duration })?;

    tracing::debug!(
        depth,
        duration,
        row,
        stop_minutes = matched.stops.total_minutes(),
        group = ?matched.group,
        "decompression row selected"
    );

    Ok(Decompression {
        stops: matched.stops,
        group: matched.group,
        row,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::fixtures;

    fn table() -> DecompressionTable {
        fixtures::tables().decompression().clone()
    }

    #[test]
    fn test_no_stop_dive() {
        let result = resolve_decompression(20.0, 30.0, &table()).unwrap();
        assert!(!result.stops.has_stops());
        assert_eq!(result.group.map(GroupCode::letter), Some('G'));
    }

    #[test]
    fn test_dive_with_stops() {
        let result = resolve_decompression(38.0, 32.0, &table()).unwrap();
        assert_eq!(result.stops.minutes_at(StopDepth::M9), 3);
        assert_eq!(result.stops.minutes_at(StopDepth::M6), 11);
        assert_eq!(result.stops.minutes_at(StopDepth::M3), 32);
        assert_eq!(result.stops.minutes_at(StopDepth::M15), 0);
        assert_eq!(result.group.map(GroupCode::letter), Some('K'));
    }

    #[test]
    fn test_duration_on_boundary_uses_lower_row() {
        let table = table();
        // 30 min closes the 25-30 bracket and opens the 30-35 one.
        let on = resolve_decompression(20.0, 30.0, &table).unwrap();
        let after = resolve_decompression(20.0, 30.5, &table).unwrap();
        assert_eq!(table.rows()[on.row].duration_to_min, 30.0);
        assert_eq!(table.rows()[after.row].duration_above_min, 30.0);
        assert_ne!(on.row, after.row);
    }

    #[test]
    fn test_depth_on_boundary_uses_shallower_row() {
        let table = table();
        let on = resolve_decompression(20.0, 12.0, &table).unwrap();
        let below = resolve_decompression(20.1, 12.0, &table).unwrap();
        assert_eq!(table.rows()[on.row].depth_to_m, 20.0);
        assert_eq!(table.rows()[below.row].depth_to_m, 25.0);
    }

    #[test]
    fn test_decimal_cells() {
        let result = resolve_decompression(25.0, 55.0, &table()).unwrap();
        assert_eq!(result.stops.minutes_at(StopDepth::M6), 2);
        assert_eq!(result.stops.minutes_at(StopDepth::M3), 27);
    }

    #[test]
    fn test_row_without_group() {
        let result = resolve_decompression(45.0, 35.0, &table()).unwrap();
        assert!(result.stops.has_stops());
        assert_eq!(result.group, None);
    }

    #[test]
    fn test_beyond_max_depth() {
        let err = resolve_decompression(65.0, 10.0, &table()).unwrap_err();
        assert_eq!(
            err,
            DecompressionError::NoMatch {
                depth: 65.0,
                duration: 10.0
            }
        );
    }

    #[test]
    fn test_beyond_max_duration() {
        assert!(resolve_decompression(20.0, 81.0, &table()).is_err());
    }

    #[test]
    fn test_zero_inputs_do_not_match() {
        let table = table();
        assert!(resolve_decompression(0.0, 10.0, &table).is_err());
        assert!(resolve_decompression(20.0, 0.0, &table).is_err());
        assert!(resolve_decompression(f64::NAN, 10.0, &table).is_err());
    }

    #[test]
    fn test_max_depth() {
        assert_eq!(table().max_depth_m(), 60.0);
    }

    #[test]
    fn test_idempotent() {
        let table = table();
        let a = resolve_decompression(33.0, 27.0, &table).unwrap();
        let b = resolve_decompression(33.0, 27.0, &table).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_column() {
        let err = DecompressionTable::from_csv("P1,P2,D1,D2,15m,12m,9m,6m,3m\n0,6,0,10,,,,,\n")
            .unwrap_err();
        assert_eq!(err, TableError::MissingColumn("GPS".to_string()));
    }

    #[test]
    fn test_inverted_bracket_rejected() {
        let err = DecompressionTable::from_csv(
            "P1,P2,D1,D2,15m,12m,9m,6m,3m,GPS\n12,6,0,10,,,,,,A\n",
        )
        .unwrap_err();
        assert_eq!(err, TableError::UnsortedAxis { axis: "P1/P2" });
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(
            DecompressionTable::from_csv("P1,P2,D1,D2,15m,12m,9m,6m,3m,GPS\n").unwrap_err(),
            TableError::Empty
        );
    }
}
