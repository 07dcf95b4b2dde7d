//! JSON data files standing in for the tracker database
//!
//! ```json
//! {
//!   "reports": [
//!     { "id": 1, "title": "Release", "columns": ["ticket", "__color__"], "rows": [[1, 3]] }
//!   ],
//!   "tickets": [
//!     { "id": 1, "summary": "Ship it", "created": "2024-02-01T09:00:00Z",
//!       "changed": "2024-02-03T17:00:00Z", "fields": { "due_close": "5" } }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use ticketgantt_core::{
    Cell, LookupError, Report, ReportId, ReportResult, ReportSource, ReportSummary, SourceError,
    TicketId, TicketLookup, TicketRecord,
};

#[derive(Debug, Deserialize)]
struct StoredReport {
    #[serde(flatten)]
    report: Report,
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Deserialize)]
struct DataFile {
    #[serde(default)]
    reports: Vec<StoredReport>,
    #[serde(default)]
    tickets: Vec<TicketRecord>,
}

/// Reports with precomputed result rows, plus the tickets they refer to
#[derive(Debug, Default)]
pub struct JsonDataSource {
    reports: Vec<(Report, ReportResult)>,
    tickets: HashMap<TicketId, TicketRecord>,
}

impl JsonDataSource {
    pub fn from_json(input: &str) -> Result<Self> {
        let file: DataFile = serde_json::from_str(input).context("invalid data file")?;

        Ok(Self {
            reports: file
                .reports
                .into_iter()
                .map(|r| {
                    let result = ReportResult {
                        columns: r.columns,
                        rows: r.rows,
                    };
                    (r.report, result)
                })
                .collect(),
            tickets: file.tickets.into_iter().map(|t| (t.id, t)).collect(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("failed to load {}", path.display()))
    }

    fn find(&self, id: ReportId) -> Option<&(Report, ReportResult)> {
        self.reports.iter().find(|(r, _)| r.id == id)
    }
}

impl ReportSource for JsonDataSource {
    fn reports(&self) -> Result<Vec<ReportSummary>, SourceError> {
        Ok(self
            .reports
            .iter()
            .map(|(r, _)| ReportSummary {
                id: r.id,
                title: r.title.clone(),
            })
            .collect())
    }

    fn report(&self, id: ReportId) -> Result<Report, SourceError> {
        self.find(id)
            .map(|(r, _)| r.clone())
            .ok_or(SourceError::ReportNotFound(id))
    }

    fn execute(&self, report: &Report) -> Result<ReportResult, SourceError> {
        self.find(report.id)
            .map(|(_, result)| result.clone())
            .ok_or(SourceError::ReportNotFound(report.id))
    }
}

impl TicketLookup for JsonDataSource {
    fn ticket(&self, id: TicketId) -> Result<TicketRecord, LookupError> {
        self.tickets.ticket(id)
    }
}
