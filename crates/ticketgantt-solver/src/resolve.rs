//! Start/due resolution through dependency chains
//!
//! A ticket's start is its explicit `due_assign` date when it has one.
//! Otherwise it is the latest due date among the dependencies that are part
//! of the chart, and failing that its creation date. Dependency chains are
//! walked with an explicit stack of pending tickets, so chain length is
//! bounded by the heap and not the thread stack. The ids on that stack are
//! also what turns a revisit into a cycle error.

use chrono::NaiveDate;
use std::collections::HashMap;
use ticketgantt_core::date;
use ticketgantt_core::{
    DateError, DateErrorKind, GanttConfig, ResolvedDates, TicketId, TicketRecord,
    FIELD_DEPENDENCIES, FIELD_DUE, FIELD_START,
};
use tracing::trace;

/// Tickets taking part in one chart, by id
pub type IncludedSet = HashMap<TicketId, TicketRecord>;

/// Parse a `dependencies` field (`"#3, 4,#12"`) into ticket ids
pub fn dependency_ids(ticket: &TicketRecord) -> Result<Vec<TicketId>, DateErrorKind> {
    let Some(field) = ticket.get(FIELD_DEPENDENCIES) else {
        return Ok(Vec::new());
    };

    field
        .split(',')
        .map(|token| token.trim().trim_start_matches('#').trim())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<TicketId>()
                .map_err(|_| DateErrorKind::InvalidDependency(token.to_string()))
        })
        .collect()
}

/// A ticket waiting for its remaining dependencies
struct Frame<'t> {
    ticket: &'t TicketRecord,
    deps: std::vec::IntoIter<TicketId>,
    /// Latest dependency due date seen so far
    start: Option<NaiveDate>,
}

enum Step<'t> {
    Done(Result<ResolvedDates, DateErrorKind>),
    Descend(Frame<'t>),
}

/// Resolves ticket dates against one included set.
///
/// Results are memoised per ticket, so a resolver must not outlive the chart
/// build it was created for.
pub struct DateResolver<'a> {
    tickets: &'a IncludedSet,
    config: &'a GanttConfig,
    memo: HashMap<TicketId, Result<ResolvedDates, DateErrorKind>>,
    /// Tickets currently being resolved, outermost first
    stack: Vec<TicketId>,
}

impl<'a> DateResolver<'a> {
    pub fn new(tickets: &'a IncludedSet, config: &'a GanttConfig) -> Self {
        Self {
            tickets,
            config,
            memo: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// Compute start, due, opened and changed dates for a ticket
    pub fn compute(&mut self, ticket: &TicketRecord) -> Result<ResolvedDates, DateError> {
        self.dates_for(ticket)
            .map_err(|kind| DateError::new(ticket.id, kind))
    }

    /// Resolve only the start date of a ticket
    pub fn resolve_start(&mut self, ticket: &TicketRecord) -> Result<NaiveDate, DateError> {
        let start = if let Some(text) = ticket.get(FIELD_START) {
            date::parse_date(text, &self.config.date_format)
        } else {
            self.stack.push(ticket.id);
            let start = self.dependency_start(ticket);
            self.stack.pop();
            start
        };
        start.map_err(|kind| DateError::new(ticket.id, kind))
    }

    fn dependency_start(&mut self, ticket: &TicketRecord) -> Result<NaiveDate, DateErrorKind> {
        let tickets = self.tickets;
        let mut start = None;

        for dep in dependency_ids(ticket)? {
            let Some(record) = tickets.get(&dep) else {
                trace!(ticket = ticket.id, dependency = dep, "dependency not in chart, skipped");
                continue;
            };
            start = start.max(Some(self.dates_for(record)?.due));
        }

        self.fallback_start(ticket, start)
    }

    fn dates_for<'t>(&mut self, root: &'t TicketRecord) -> Result<ResolvedDates, DateErrorKind>
    where
        'a: 't,
    {
        let base = self.stack.len();
        let mut current = match self.enter(root) {
            Step::Done(result) => return result,
            Step::Descend(frame) => frame,
        };
        let mut parents: Vec<Frame<'t>> = Vec::new();

        loop {
            let tickets = self.tickets;
            let waiting = current.ticket.id;
            let next = current.deps.find_map(|dep| {
                let record = tickets.get(&dep);
                if record.is_none() {
                    trace!(ticket = waiting, dependency = dep, "dependency not in chart, skipped");
                }
                record
            });

            let result = match next {
                Some(record) => {
                    let record: &'t TicketRecord = record;
                    match self.enter(record) {
                        Step::Descend(frame) => {
                            parents.push(std::mem::replace(&mut current, frame));
                            continue;
                        }
                        Step::Done(result) => result,
                    }
                }
                None => {
                    let result = self.finish(&current);
                    match parents.pop() {
                        Some(parent) => current = parent,
                        None => return result,
                    }
                    result
                }
            };

            // `result` belongs to one of `current`'s dependencies
            match result {
                Ok(dates) => current.start = current.start.max(Some(dates.due)),
                Err(kind) => {
                    for frame in parents.iter().chain(std::iter::once(&current)) {
                        self.memo.insert(frame.ticket.id, Err(kind.clone()));
                    }
                    self.stack.truncate(base);
                    return Err(kind);
                }
            }
        }
    }

    /// Start resolving a ticket: answered at once, or pushed as a frame
    fn enter<'t>(&mut self, ticket: &'t TicketRecord) -> Step<'t> {
        if let Some(done) = self.memo.get(&ticket.id) {
            return Step::Done(done.clone());
        }

        if let Some(pos) = self.stack.iter().position(|id| *id == ticket.id) {
            let mut path = self.stack[pos..].to_vec();
            path.push(ticket.id);
            return Step::Done(Err(DateErrorKind::DependencyCycle(path)));
        }

        let result = if let Some(text) = ticket.get(FIELD_START) {
            date::parse_date(text, &self.config.date_format)
                .and_then(|start| self.dates_from_start(ticket, start))
        } else {
            match dependency_ids(ticket) {
                Ok(deps) => {
                    self.stack.push(ticket.id);
                    return Step::Descend(Frame {
                        ticket,
                        deps: deps.into_iter(),
                        start: None,
                    });
                }
                Err(kind) => Err(kind),
            }
        };

        self.memo.insert(ticket.id, result.clone());
        Step::Done(result)
    }

    /// Complete a frame whose dependencies have all been resolved
    fn finish(&mut self, frame: &Frame<'_>) -> Result<ResolvedDates, DateErrorKind> {
        self.stack.pop();
        let result = self
            .fallback_start(frame.ticket, frame.start)
            .and_then(|start| self.dates_from_start(frame.ticket, start));
        self.memo.insert(frame.ticket.id, result.clone());
        result
    }

    fn fallback_start(
        &self,
        ticket: &TicketRecord,
        start: Option<NaiveDate>,
    ) -> Result<NaiveDate, DateErrorKind> {
        match start {
            Some(start) => Ok(start),
            None if self.config.use_creation_date => Ok(ticket.opened_date()),
            None => Err(DateErrorKind::MissingStartDate),
        }
    }

    fn dates_from_start(
        &self,
        ticket: &TicketRecord,
        start: NaiveDate,
    ) -> Result<ResolvedDates, DateErrorKind> {
        let due_text = ticket.get(FIELD_DUE).ok_or(DateErrorKind::MissingDueDate)?;
        let due = date::parse_due(due_text, &self.config.date_format, start)?;

        if start > due {
            return Err(DateErrorKind::InvalidDateRange {
                ticket: ticket.id,
                start,
                due,
            });
        }

        Ok(ResolvedDates {
            start,
            due,
            opened: ticket.opened_date(),
            changed: ticket.changed_date(),
        })
    }
}
