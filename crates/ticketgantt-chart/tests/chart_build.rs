use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use ticketgantt_chart::{build_chart, list_charts};
use ticketgantt_core::{
    ordinal, Cell, ChartError, GanttConfig, Report, ReportId, ReportResult, ReportSource,
    ReportSummary, SchemaError, SourceError, TicketId, TicketRecord,
};

struct FakeSource {
    reports: Vec<(Report, ReportResult)>,
}

impl ReportSource for FakeSource {
    fn reports(&self) -> Result<Vec<ReportSummary>, SourceError> {
        Ok(self
            .reports
            .iter()
            .map(|(r, _)| ReportSummary { id: r.id, title: r.title.clone() })
            .collect())
    }

    fn report(&self, id: ReportId) -> Result<Report, SourceError> {
        self.reports
            .iter()
            .find(|(r, _)| r.id == id)
            .map(|(r, _)| r.clone())
            .ok_or(SourceError::ReportNotFound(id))
    }

    fn execute(&self, report: &Report) -> Result<ReportResult, SourceError> {
        self.reports
            .iter()
            .find(|(r, _)| r.id == report.id)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| SourceError::Query(report.query.clone()))
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn ticket(id: TicketId, created: NaiveDate) -> TicketRecord {
    let ts = Utc.from_utc_datetime(&created.and_hms_opt(8, 30, 0).unwrap());
    TicketRecord::new(id, format!("Ticket {}", id), ts).field("include_gantt", "1")
}

fn report(id: ReportId, title: &str, ids: &[&str]) -> (Report, ReportResult) {
    (
        Report {
            id,
            title: title.into(),
            description: format!("{} description", title),
            query: "SELECT ...".into(),
        },
        ReportResult {
            columns: vec!["ticket".into(), "summary".into(), "__color__".into()],
            rows: ids
                .iter()
                .map(|id| vec![Cell::Text((*id).into()), Cell::Text("ignored".into()), Cell::Int(2)])
                .collect(),
        },
    )
}

fn tickets() -> HashMap<TicketId, TicketRecord> {
    let list = vec![
        ticket(1, d(2024, 1, 2))
            .field("due_assign", "01/01/2024")
            .field("due_close", "5"),
        ticket(2, d(2024, 2, 1)).field("due_close", "02/10/2024"),
        ticket(3, d(2024, 1, 15)).field("due_close", "03/01/2024"),
        ticket(4, d(2024, 1, 15)).field("dependencies", "#3").field("due_close", "3"),
        ticket(5, d(2024, 1, 15)).field("dependencies", "6").field("due_close", "1"),
        ticket(6, d(2024, 1, 15)).field("dependencies", "5").field("due_close", "1"),
        ticket(7, d(2024, 1, 15)),
        ticket(8, d(2024, 1, 15))
            .field("include_gantt", "0")
            .field("due_close", "1"),
        ticket(9, d(2024, 1, 15))
            .field("dependencies", "8, 100")
            .field("due_close", "01/16/2024"),
    ];
    list.into_iter().map(|t| (t.id, t)).collect()
}

fn source() -> FakeSource {
    FakeSource {
        reports: vec![
            report(4, "Everything", &["1", "2", "3", "4", "5", "6", "7", "8", "\u{2713}9"]),
            report(2, "Nothing", &[]),
        ],
    }
}

#[test]
fn catalogue_sorted_by_id() {
    let charts = list_charts(&source()).unwrap();
    let ids: Vec<ReportId> = charts.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 4]);
    assert_eq!(charts[1].title, "Everything");
}

#[test]
fn full_chart() {
    let chart = build_chart(&source(), &tickets(), 4, &GanttConfig::default()).unwrap();

    assert_eq!(chart.id, 4);
    assert_eq!(chart.title, "{4} Everything");
    assert_eq!(chart.description, "Everything description");
    assert!(!chart.show_opened);

    let drawn: Vec<TicketId> = chart.tickets.iter().map(|t| t.id).collect();
    assert_eq!(drawn, vec![1, 2, 3, 4, 9]);

    let broken: Vec<TicketId> = chart.broken.iter().map(|b| b.id).collect();
    assert_eq!(broken, vec![5, 6, 7]);
    assert_eq!(chart.broken_count, 3);
    assert!(chart.broken[0].error.starts_with("dependency cycle"));
    assert!(chart.broken[1].error.starts_with("dependency cycle"));
    assert_eq!(chart.broken[2].error, "due date required for inclusion");

    let by_id: HashMap<TicketId, _> = chart.tickets.iter().map(|t| (t.id, t)).collect();
    assert_eq!(by_id[&1].start, ordinal(d(2024, 1, 1)));
    assert_eq!(by_id[&1].due, ordinal(d(2024, 1, 6)));
    assert_eq!(by_id[&2].start, ordinal(d(2024, 2, 1)));
    assert_eq!(by_id[&2].due, ordinal(d(2024, 2, 10)));
    assert_eq!(by_id[&4].start, ordinal(d(2024, 3, 1)));
    assert_eq!(by_id[&4].due, ordinal(d(2024, 3, 4)));
    assert_eq!(by_id[&9].start, ordinal(d(2024, 1, 15)));
    assert_eq!(by_id[&9].color.as_deref(), Some("2"));

    let ordinals: Vec<i32> = chart.timeline.iter().map(|e| e.ordinal).collect();
    let mut sorted = ordinals.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(ordinals, sorted);

    for t in &chart.tickets {
        assert_eq!(chart.timeline[t.offset].ordinal, t.start);
        assert_eq!(chart.timeline[t.offset + t.span - 1].ordinal, t.due);
    }
}

#[test]
fn empty_report() {
    let chart = build_chart(&source(), &tickets(), 2, &GanttConfig::default()).unwrap();
    assert!(chart.tickets.is_empty());
    assert!(chart.timeline.is_empty());
    assert_eq!(chart.broken_count, 0);
}

#[test]
fn unknown_report_is_fatal() {
    let err = build_chart(&source(), &tickets(), 99, &GanttConfig::default()).unwrap_err();
    assert!(matches!(err, ChartError::Source(SourceError::ReportNotFound(99))));
    assert_eq!(err.to_string(), "Report 99 does not exist");
}

#[test]
fn missing_color_column_is_fatal() {
    let (r, mut rows) = report(1, "No colors", &["1"]);
    rows.columns[2] = "color".into();
    let source = FakeSource { reports: vec![(r, rows)] };

    let err = build_chart(&source, &tickets(), 1, &GanttConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ChartError::Schema(SchemaError::MissingColumn(ref c)) if c == "__color__"
    ));
}

#[test]
fn chart_data_serializes() {
    let config = GanttConfig::default().show_opened(true);
    let chart = build_chart(&source(), &tickets(), 4, &config).unwrap();
    let json = serde_json::to_value(&chart).unwrap();

    assert_eq!(json["title"], "{4} Everything");
    assert_eq!(json["broken_count"], 3);
    assert_eq!(json["show_opened"], true);
    assert_eq!(json["timeline"][0]["date"], "2024-01-01");
    // opened 2024-01-02, one timeline step after its explicit start
    assert_eq!(json["tickets"][0]["ospan"], -1);
    assert!(json["tickets"][0]["short_summary"].is_string());
}
