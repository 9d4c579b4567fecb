//! MN90 reference tables.
//!
//! The three tables are loaded once by the host and then shared read-only by
//! every planning request. [`TableSet`] is the handle passed into the planner;
//! it holds no interior mutability and is `Send + Sync`, so concurrent
//! requests can share one instance behind an `Arc`.
//!
//! Table text uses the columnar layout of the published MN90 CSV exports:
//!
//! - decompression: `P1,P2,D1,D2,15m,12m,9m,6m,3m,GPS`
//! - residual nitrogen: `GPS` followed by one column per surface interval (minutes)
//! - time penalty: `MAJO` followed by one column per depth (meters)

pub mod parser;

use crate::decompression::DecompressionTable;
use crate::error::TableError;
use crate::nitrogen::ResidualNitrogenTable;
use crate::penalty::TimePenaltyTable;

/// The three MN90 tables as one immutable handle.
#[derive(Debug, Clone)]
pub struct TableSet {
    decompression: DecompressionTable,
    nitrogen: ResidualNitrogenTable,
    penalty: TimePenaltyTable,
}

impl TableSet {
    pub fn new(
        decompression: DecompressionTable,
        nitrogen: ResidualNitrogenTable,
        penalty: TimePenaltyTable,
    ) -> Self {
        TableSet {
            decompression,
            nitrogen,
            penalty,
        }
    }

    /// Parse all three tables from their CSV text.
    pub fn from_csv(
        decompression: &str,
        nitrogen: &str,
        penalty: &str,
    ) -> Result<Self, TableError> {
        Ok(TableSet::new(
            DecompressionTable::from_csv(decompression)?,
            ResidualNitrogenTable::from_csv(nitrogen)?,
            TimePenaltyTable::from_csv(penalty)?,
        ))
    }

    pub fn decompression(&self) -> &DecompressionTable {
        &self.decompression
    }

    pub fn nitrogen(&self) -> &ResidualNitrogenTable {
        &self.nitrogen
    }

    pub fn penalty(&self) -> &TimePenaltyTable {
        &self.penalty
    }
}

/// `true` when every value is strictly greater than the one before it.
pub(crate) fn strictly_ascending<T: PartialOrd>(values: impl IntoIterator<Item = T>) -> bool {
    let mut prev: Option<T> = None;
    for v in values {
        if let Some(p) = &prev {
            if v <= *p {
                return false;
            }
        }
        prev = Some(v);
    }
    true
}
