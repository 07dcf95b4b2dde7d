//! # ticketgantt-chart
//!
//! Builds render-ready Gantt chart data from stored ticket reports.
//!
//! This crate provides:
//! - Report catalogue listing (`list_charts`)
//! - Chart assembly from raw report rows (`assemble`)
//! - End-to-end chart building from a report source (`build_chart`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use ticketgantt_chart::build_chart;
//! use ticketgantt_core::GanttConfig;
//!
//! let chart = build_chart(&source, &tickets, 3, &GanttConfig::default())?;
//! for broken in &chart.broken {
//!     eprintln!("#{}: {}", broken.id, broken.error);
//! }
//! ```

pub mod assemble;
pub mod timeline;

pub use assemble::{assemble, included_tickets, Assembly};
pub use timeline::Timeline;

use ticketgantt_core::{
    ChartData, ChartError, GanttConfig, RawRow, ReportId, ReportSource, ReportSummary,
    TicketLookup,
};
use tracing::info_span;

/// Reports available as charts, by id
pub fn list_charts<S: ReportSource + ?Sized>(source: &S) -> Result<Vec<ReportSummary>, ChartError> {
    let mut reports = source.reports()?;
    reports.sort_by_key(|r| r.id);
    Ok(reports)
}

/// Run a stored report and assemble its chart
pub fn build_chart<S, L>(
    source: &S,
    lookup: &L,
    report_id: ReportId,
    config: &GanttConfig,
) -> Result<ChartData, ChartError>
where
    S: ReportSource + ?Sized,
    L: TicketLookup,
{
    let _span = info_span!("build_chart", report = report_id).entered();

    let report = source.report(report_id)?;
    let result = source.execute(&report)?;
    let rows = RawRow::from_result(&result, config)?;
    let assembly = assemble(&rows, lookup, config)?;

    Ok(ChartData {
        id: report.id,
        title: report.chart_title(),
        description: report.description,
        broken_count: assembly.broken.len(),
        tickets: assembly.tickets,
        timeline: assembly.timeline,
        broken: assembly.broken,
        show_opened: config.show_opened,
    })
}
