use nom::{
    bytes::complete::take_while,
    character::complete::{char, line_ending},
    combinator::all_consuming,
    multi::separated_list1,
    IResult, Parser,
};

use crate::error::TableError;
use crate::models::GroupCode;

/// A parsed columnar text table: a header row and its data rows.
///
/// Cells are borrowed from the source text and kept untrimmed; blank lines
/// are dropped. Each data row remembers its 1-based line number for errors.
#[derive(Debug)]
pub struct TableText<'a> {
    header: Vec<&'a str>,
    rows: Vec<Row<'a>>,
}

#[derive(Debug)]
pub struct Row<'a> {
    pub line: usize,
    cells: Vec<&'a str>,
}

impl<'a> Row<'a> {
    pub fn cell(&self, column: usize) -> &'a str {
        self.cells[column].trim()
    }
}

/// Parse comma-separated table text. A leading UTF-8 byte order mark is skipped.
pub fn parse(input: &str) -> Result<TableText<'_>, TableError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let (_, records) = all_consuming(records)
        .parse(input)
        .map_err(|e| TableError::Syntax(e.to_string()))?;

    let mut lines = records
        .into_iter()
        .enumerate()
        .map(|(i, cells)| (i + 1, cells))
        .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()));

    let (_, header) = lines.next().ok_or(TableError::MissingHeader)?;

    let mut rows = Vec::new();
    for (line, cells) in lines {
        if cells.len() != header.len() {
            return Err(TableError::RaggedRow {
                line,
                expected: header.len(),
                found: cells.len(),
            });
        }
        rows.push(Row { line, cells });
    }

    Ok(TableText { header, rows })
}

fn records(input: &str) -> IResult<&str, Vec<Vec<&str>>> {
    separated_list1(line_ending, record).parse(input)
}

fn record(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(char(','), cell).parse(input)
}

fn cell(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c != ',' && c != '\r' && c != '\n').parse(input)
}

impl<'a> TableText<'a> {
    pub fn rows(&self) -> &[Row<'a>] {
        &self.rows
    }

    /// Index of the column with the given name.
    pub fn column(&self, name: &str) -> Result<usize, TableError> {
        self.header
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Columns whose name is a plain integer, with that integer, in header order.
    pub fn numeric_columns(&self) -> Vec<(usize, u32)> {
        self.header
            .iter()
            .enumerate()
            .filter_map(|(i, h)| {
                let h = h.trim();
                if !h.is_empty() && h.chars().all(|c| c.is_ascii_digit()) {
                    h.parse().ok().map(|n| (i, n))
                } else {
                    None
                }
            })
            .collect()
    }

    fn column_name(&self, column: usize) -> String {
        self.header[column].trim().to_string()
    }

    pub fn number(&self, row: &Row<'_>, column: usize) -> Result<f64, TableError> {
        self.optional_number(row, column)?
            .ok_or_else(|| self.invalid_number(row, column))
    }

    /// An empty cell reads as `None`.
    pub fn optional_number(&self, row: &Row<'_>, column: usize) -> Result<Option<f64>, TableError> {
        let raw = row.cell(column);
        if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(self.invalid_number(row, column)),
        }
    }

    /// A whole, non-negative number of minutes. Empty cells read as 0.
    pub fn minutes(&self, row: &Row<'_>, column: usize) -> Result<u32, TableError> {
        match self.optional_number(row, column)? {
            None => Ok(0),
            Some(v) if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => Ok(v as u32),
            Some(_) => Err(self.invalid_number(row, column)),
        }
    }

    pub fn group(&self, row: &Row<'_>, column: usize) -> Result<Option<GroupCode>, TableError> {
        let raw = row.cell(column);
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(|_| TableError::InvalidGroup {
            line: row.line,
            value: raw.to_string(),
        })
    }

    fn invalid_number(&self, row: &Row<'_>, column: usize) -> TableError {
        TableError::InvalidNumber {
            line: row.line,
            column: self.column_name(column),
            value: row.cell(column).to_string(),
        }
    }
}
