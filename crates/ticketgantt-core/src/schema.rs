//! Raw report rows
//!
//! A report result is a table whose shape depends on the stored query.
//! Columns are resolved by name and checked once, when the table is turned
//! into [`RawRow`]s.

use crate::{GanttConfig, TicketId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Row ingestion error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Report has no '{0}' column")]
    MissingColumn(String),

    #[error("Row {row}: '{value}' is not a ticket id")]
    InvalidTicketId { row: usize, value: String },

    #[error("Row {row}: expected {expected} cells, found {found}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// A single cell of a report result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Inclusion flag semantics: a nonzero integer
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Null => false,
            Cell::Bool(b) => *b,
            Cell::Int(n) => *n != 0,
            Cell::Float(f) => f.trunc() != 0.0,
            Cell::Text(s) => s.trim().parse::<i64>().map(|n| n != 0).unwrap_or(false),
        }
    }

    /// Text value, `None` for null
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Ticket id, ignoring any markup around the digits
    pub fn ticket_id(&self) -> Option<TicketId> {
        let digits: String = match self {
            Cell::Int(n) => n.to_string(),
            Cell::Float(f) if f.fract() == 0.0 => format!("{:.0}", f),
            Cell::Text(s) => s.chars().filter(|c| c.is_ascii_digit()).collect(),
            _ => return None,
        };
        digits.parse::<TicketId>().ok().filter(|id| *id > 0)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// Result table of an executed report
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportResult {
    fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// The parts of a report row the chart cares about
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawRow {
    pub ticket: TicketId,
    pub color: Option<String>,
    /// Inclusion flag, `None` when the report has no include column
    pub include: Option<bool>,
}

impl RawRow {
    /// Validate a report result against the configured column names
    pub fn from_result(result: &ReportResult, config: &GanttConfig) -> Result<Vec<Self>, SchemaError> {
        let ticket_col = result
            .column(&config.ticket_column)
            .ok_or_else(|| SchemaError::MissingColumn(config.ticket_column.clone()))?;
        let color_col = result
            .column(&config.color_column)
            .ok_or_else(|| SchemaError::MissingColumn(config.color_column.clone()))?;
        let include_col = result.column(&config.include_column);

        result
            .rows
            .iter()
            .enumerate()
            .map(|(i, cells)| {
                if cells.len() < result.columns.len() {
                    return Err(SchemaError::RowLength {
                        row: i,
                        expected: result.columns.len(),
                        found: cells.len(),
                    });
                }

                let ticket = cells[ticket_col].ticket_id().ok_or_else(|| {
                    SchemaError::InvalidTicketId {
                        row: i,
                        value: cells[ticket_col].to_string(),
                    }
                })?;

                Ok(RawRow {
                    ticket,
                    color: cells[color_col].as_text(),
                    include: include_col.map(|c| cells[c].is_truthy()),
                })
            })
            .collect()
    }
}
