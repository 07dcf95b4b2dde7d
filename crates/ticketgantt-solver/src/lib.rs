//! # ticketgantt-solver
//!
//! Resolves the scheduling dates of tickets.
//!
//! This crate provides:
//! - Start date resolution (explicit date, dependency chain, creation date)
//! - Due date resolution (absolute date or day count from the start)
//! - Cycle detection over ticket dependencies
//!
//! ## Example
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use ticketgantt_core::{GanttConfig, TicketRecord};
//! use ticketgantt_solver::{compute_dates, IncludedSet};
//!
//! let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let ticket = TicketRecord::new(1, "Kickoff", created)
//!     .field("due_assign", "01/01/2024")
//!     .field("due_close", "5");
//!
//! let mut tickets = IncludedSet::new();
//! tickets.insert(ticket.id, ticket.clone());
//!
//! let dates = compute_dates(&ticket, &tickets, &GanttConfig::default()).unwrap();
//! assert_eq!(dates.due, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
//! ```

pub mod resolve;

pub use resolve::{dependency_ids, DateResolver, IncludedSet};

use chrono::NaiveDate;
use ticketgantt_core::{DateError, GanttConfig, ResolvedDates, TicketRecord};

/// Compute all dates of one ticket
pub fn compute_dates(
    ticket: &TicketRecord,
    included: &IncludedSet,
    config: &GanttConfig,
) -> Result<ResolvedDates, DateError> {
    DateResolver::new(included, config).compute(ticket)
}

/// Resolve the start date of one ticket
pub fn resolve_start(
    ticket: &TicketRecord,
    included: &IncludedSet,
    config: &GanttConfig,
) -> Result<NaiveDate, DateError> {
    DateResolver::new(included, config).resolve_start(ticket)
}
