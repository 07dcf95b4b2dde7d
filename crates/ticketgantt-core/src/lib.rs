//! # ticketgantt-core
//!
//! Core domain model and traits for the ticketgantt chart builder.
//!
//! This crate provides:
//! - Domain types: `TicketRecord`, `ResolvedDates`, `TimelineEntry`, `ChartTicket`, `ChartData`
//! - Collaborator traits: `TicketLookup`, `ReportSource`
//! - Date parsing (`date`), raw report rows (`schema`) and configuration (`config`)
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use ticketgantt_core::TicketRecord;
//!
//! let created = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
//! let ticket = TicketRecord::new(7, "Write the installer", created)
//!     .field("due_close", "02/10/2024")
//!     .field("dependencies", "#3, #4");
//!
//! assert_eq!(ticket.get("due_close"), Some("02/10/2024"));
//! assert_eq!(ticket.get("due_assign"), None);
//! ```

pub mod config;
pub mod date;
pub mod schema;

pub use config::{ConfigError, GanttConfig};
pub use schema::{Cell, RawRow, ReportResult, SchemaError};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a ticket
pub type TicketId = u32;

/// Unique identifier for a stored report
pub type ReportId = i64;

/// Ticket field holding the explicit start date
pub const FIELD_START: &str = "due_assign";

/// Ticket field holding the due date (absolute or relative day count)
pub const FIELD_DUE: &str = "due_close";

/// Ticket field holding the comma-separated dependency list
pub const FIELD_DEPENDENCIES: &str = "dependencies";

/// Proleptic Gregorian day number, 0001-01-01 being day 1
pub fn ordinal(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

// ============================================================================
// Tickets
// ============================================================================

/// A ticket as returned by the ticket lookup service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Ticket number
    pub id: TicketId,
    /// One-line summary
    pub summary: String,
    /// Creation timestamp
    pub created: DateTime<Utc>,
    /// Last modification timestamp
    pub changed: DateTime<Utc>,
    /// Custom fields (`due_assign`, `due_close`, `dependencies`, `include_gantt`, ...)
    #[serde(default)]
    pub fields: HashMap<String, String>,
}

impl TicketRecord {
    /// Create a ticket that was last changed when it was created
    pub fn new(id: TicketId, summary: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            id,
            summary: summary.into(),
            created,
            changed: created,
            fields: HashMap::new(),
        }
    }

    /// Set the last modification timestamp
    pub fn changed(mut self, changed: DateTime<Utc>) -> Self {
        self.changed = changed;
        self
    }

    /// Set a custom field
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Field value, treating blank values as absent
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Calendar date the ticket was opened
    pub fn opened_date(&self) -> NaiveDate {
        self.created.date_naive()
    }

    /// Calendar date of the last change
    pub fn changed_date(&self) -> NaiveDate {
        self.changed.date_naive()
    }
}

/// Start, due, opened and changed dates of one ticket.
///
/// Always satisfies `start <= due`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedDates {
    pub start: NaiveDate,
    pub due: NaiveDate,
    pub opened: NaiveDate,
    pub changed: NaiveDate,
}

// ============================================================================
// Chart output
// ============================================================================

/// One distinct date on the chart's shared time axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub date: NaiveDate,
    /// Day number as given by [`ordinal`]
    pub ordinal: i32,
    /// Zero-based position on the axis
    pub index: usize,
}

/// A ticket placed on the timeline
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChartTicket {
    pub id: TicketId,
    /// Full summary
    pub summary: String,
    /// Summary cut down for the bar label
    pub short_summary: String,
    /// Start date as an [`ordinal`], not a timeline index; the start's
    /// timeline index is `offset`
    pub start: i32,
    /// Due date as an [`ordinal`]; its timeline index is `offset + span - 1`
    pub due: i32,
    /// Opened date as an [`ordinal`]
    pub opened: i32,
    /// Last change date as an [`ordinal`]. Not placed on the timeline.
    pub changed: i32,
    /// Timeline index of the start date
    pub offset: usize,
    /// Bar width in timeline units, at least 1
    pub span: usize,
    /// Timeline distance from opened to start; only set when opened dates are shown.
    /// Negative when the ticket was opened after its scheduled start.
    pub ospan: Option<i64>,
    /// Row color value, passed through to the renderer
    pub color: Option<String>,
}

/// A ticket whose dates could not be resolved
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BrokenTicket {
    pub id: TicketId,
    pub error: String,
}

/// Everything a renderer needs to draw one chart
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChartData {
    /// Report the chart was built from
    pub id: ReportId,
    pub title: String,
    pub description: String,
    pub tickets: Vec<ChartTicket>,
    pub timeline: Vec<TimelineEntry>,
    pub broken: Vec<BrokenTicket>,
    pub broken_count: usize,
    pub show_opened: bool,
}

// ============================================================================
// Reports
// ============================================================================

/// Catalogue entry for a stored report
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub id: ReportId,
    pub title: String,
}

/// A stored report definition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Opaque query text, executed by the [`ReportSource`]
    #[serde(default)]
    pub query: String,
}

impl Report {
    /// Title shown above the chart
    pub fn chart_title(&self) -> String {
        if self.id > 0 {
            format!("{{{}}} {}", self.id, self.title)
        } else {
            self.title.clone()
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Ticket lookup service
pub trait TicketLookup {
    /// Fetch a ticket by id
    fn ticket(&self, id: TicketId) -> Result<TicketRecord, LookupError>;
}

/// Stored report catalogue and query execution
pub trait ReportSource {
    /// All available reports
    fn reports(&self) -> Result<Vec<ReportSummary>, SourceError>;

    /// Fetch a report definition
    fn report(&self, id: ReportId) -> Result<Report, SourceError>;

    /// Run a report's query and return its raw result table
    fn execute(&self, report: &Report) -> Result<ReportResult, SourceError>;
}

impl<T: TicketLookup + ?Sized> TicketLookup for &T {
    fn ticket(&self, id: TicketId) -> Result<TicketRecord, LookupError> {
        (**self).ticket(id)
    }
}

impl TicketLookup for HashMap<TicketId, TicketRecord> {
    fn ticket(&self, id: TicketId) -> Result<TicketRecord, LookupError> {
        self.get(&id).cloned().ok_or(LookupError::TicketNotFound(id))
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Why a single ticket's dates could not be resolved
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DateErrorKind {
    #[error("invalid date '{text}' (expected format '{format}' or a number of days)")]
    InvalidDateFormat { text: String, format: String },

    #[error("couldn't get start date")]
    MissingStartDate,

    #[error("due date required for inclusion")]
    MissingDueDate,

    #[error("ticket #{ticket} start date ({start}) is after due date ({due})")]
    InvalidDateRange {
        ticket: TicketId,
        start: NaiveDate,
        due: NaiveDate,
    },

    #[error("dependency cycle: {}", format_cycle(.0))]
    DependencyCycle(Vec<TicketId>),

    #[error("invalid dependency '{0}'")]
    InvalidDependency(String),
}

fn format_cycle(path: &[TicketId]) -> String {
    path.iter()
        .map(|id| format!("#{}", id))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// A date resolution failure for one ticket
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("ticket #{ticket}: {kind}")]
pub struct DateError {
    pub ticket: TicketId,
    pub kind: DateErrorKind,
}

impl DateError {
    pub fn new(ticket: TicketId, kind: DateErrorKind) -> Self {
        Self { ticket, kind }
    }
}

/// Ticket lookup error
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Ticket not found: #{0}")]
    TicketNotFound(TicketId),

    #[error("Ticket lookup failed: {0}")]
    Backend(String),
}

/// Report source error
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Report {0} does not exist")]
    ReportNotFound(ReportId),

    #[error("Query failed: {0}")]
    Query(String),
}

/// Fatal chart build error
#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 23, 30, 0).unwrap()
    }

    #[test]
    fn ticket_builder() {
        let changed = Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
        let ticket = TicketRecord::new(12, "Port the scheduler", created())
            .changed(changed)
            .field("due_close", "5");

        assert_eq!(ticket.id, 12);
        assert_eq!(ticket.summary, "Port the scheduler");
        assert_eq!(ticket.get("due_close"), Some("5"));
        assert_eq!(ticket.opened_date(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(ticket.changed_date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn blank_fields_are_absent() {
        let ticket = TicketRecord::new(1, "x", created())
            .field("due_assign", "   ")
            .field("due_close", " 03/01/2024 ");

        assert_eq!(ticket.get("due_assign"), None);
        assert_eq!(ticket.get("due_close"), Some("03/01/2024"));
        assert_eq!(ticket.get("dependencies"), None);
    }

    #[test]
    fn ordinal_matches_day_one() {
        assert_eq!(ordinal(NaiveDate::from_ymd_opt(1, 1, 1).unwrap()), 1);
        assert_eq!(ordinal(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), 738886);
    }

    #[test]
    fn chart_title_prefixes_positive_ids() {
        let report = Report {
            id: 9,
            title: "Release plan".into(),
            description: String::new(),
            query: String::new(),
        };
        assert_eq!(report.chart_title(), "{9} Release plan");

        let adhoc = Report { id: -1, ..report };
        assert_eq!(adhoc.chart_title(), "Release plan");
    }

    #[test]
    fn hashmap_lookup() {
        let mut tickets = HashMap::new();
        tickets.insert(3, TicketRecord::new(3, "three", created()));

        assert_eq!(tickets.ticket(3).unwrap().summary, "three");
        assert!(matches!(tickets.ticket(4), Err(LookupError::TicketNotFound(4))));
    }

    #[test]
    fn date_error_display() {
        let err = DateError::new(5, DateErrorKind::DependencyCycle(vec![5, 6, 5]));
        assert_eq!(err.to_string(), "ticket #5: dependency cycle: #5 -> #6 -> #5");

        let range = DateErrorKind::InvalidDateRange {
            ticket: 2,
            start: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            due: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert_eq!(
            range.to_string(),
            "ticket #2 start date (2024-03-02) is after due date (2024-03-01)"
        );
        assert_eq!(DateErrorKind::MissingDueDate.to_string(), "due date required for inclusion");
    }
}
