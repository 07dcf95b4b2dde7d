//! Chart assembly
//!
//! Turns validated report rows into chart tickets placed on a shared
//! timeline. Tickets whose dates cannot be resolved are collected as broken
//! instead of failing the chart.

use crate::timeline::Timeline;
use ticketgantt_core::{
    ordinal, BrokenTicket, ChartTicket, GanttConfig, LookupError, RawRow, ResolvedDates,
    TicketLookup, TicketRecord, TimelineEntry,
};
use ticketgantt_solver::{DateResolver, IncludedSet};
use tracing::{debug, info};

/// Chart tickets, their timeline and the tickets left out
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assembly {
    /// In report row order
    pub tickets: Vec<ChartTicket>,
    /// Ascending by date
    pub timeline: Vec<TimelineEntry>,
    /// In the order they failed
    pub broken: Vec<BrokenTicket>,
}

struct Placed<'a> {
    ticket: &'a TicketRecord,
    dates: ResolvedDates,
    color: Option<String>,
}

/// Collect the tickets flagged for inclusion, first row per id winning
pub fn included_tickets<L: TicketLookup>(
    rows: &[RawRow],
    lookup: &L,
    config: &GanttConfig,
) -> Result<IncludedSet, LookupError> {
    let mut included = IncludedSet::new();

    for row in rows {
        if included.contains_key(&row.ticket) || row.include == Some(false) {
            continue;
        }

        let ticket = lookup.ticket(row.ticket)?;
        let flagged = row.include.unwrap_or_else(|| {
            ticket
                .get(&config.include_column)
                .and_then(|v| v.parse::<i64>().ok())
                .is_some_and(|v| v != 0)
        });

        if flagged {
            included.insert(ticket.id, ticket);
        }
    }

    Ok(included)
}

/// Build chart tickets, timeline and broken list from report rows.
///
/// Only ticket lookup failures are fatal; date resolution failures end up
/// in [`Assembly::broken`].
pub fn assemble<L: TicketLookup>(
    rows: &[RawRow],
    lookup: &L,
    config: &GanttConfig,
) -> Result<Assembly, LookupError> {
    let included = included_tickets(rows, lookup, config)?;
    let mut resolver = DateResolver::new(&included, config);

    let mut placed = Vec::new();
    let mut broken = Vec::new();
    let mut dates = Vec::new();

    for row in rows {
        let Some(ticket) = included.get(&row.ticket) else {
            continue;
        };

        match resolver.compute(ticket) {
            Ok(resolved) => {
                dates.push(resolved.start);
                dates.push(resolved.due);
                if config.show_opened {
                    dates.push(resolved.opened);
                }
                placed.push(Placed {
                    ticket,
                    dates: resolved,
                    color: row.color.clone(),
                });
            }
            Err(err) => {
                debug!(ticket = ticket.id, error = %err.kind, "ticket left out of chart");
                broken.push(BrokenTicket {
                    id: ticket.id,
                    error: err.kind.to_string(),
                });
            }
        }
    }

    let timeline = Timeline::from_dates(dates);
    let tickets: Vec<ChartTicket> = placed
        .into_iter()
        .map(|p| chart_ticket(p, &timeline, config))
        .collect();

    info!(
        tickets = tickets.len(),
        broken = broken.len(),
        dates = timeline.len(),
        "chart assembled"
    );

    Ok(Assembly {
        tickets,
        timeline: timeline.entries(),
        broken,
    })
}

fn chart_ticket(placed: Placed<'_>, timeline: &Timeline, config: &GanttConfig) -> ChartTicket {
    let Placed { ticket, dates, color } = placed;
    let start = timeline.position(dates.start);
    let due = timeline.position(dates.due);

    let ospan = config
        .show_opened
        .then(|| start as i64 - timeline.position(dates.opened) as i64);

    ChartTicket {
        id: ticket.id,
        summary: ticket.summary.clone(),
        short_summary: config.shorten(&ticket.summary),
        start: ordinal(dates.start),
        due: ordinal(dates.due),
        opened: ordinal(dates.opened),
        changed: ordinal(dates.changed),
        offset: start,
        span: 1 + due.saturating_sub(start),
        ospan,
        color,
    }
}
