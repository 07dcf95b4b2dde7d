//! Chart configuration
//!
//! Read from the `[gantt-charts]` table of a TOML file. Every key is optional.
//!
//! ```toml
//! [gantt-charts]
//! date_format = "%Y-%m-%d"
//! show_opened = true
//! summary_length = 24
//! use_creation_date = false
//! ```

use crate::date::DEFAULT_DATE_FORMAT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Options controlling how a chart is assembled
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttConfig {
    /// strftime-style format of `due_assign` / `due_close`
    pub date_format: String,
    /// Put opened dates on the timeline and compute `ospan`
    pub show_opened: bool,
    /// Maximum summary length on a bar label
    pub summary_length: usize,
    /// Fall back to the creation date when no start can be found
    pub use_creation_date: bool,
    /// Report column holding the ticket id
    pub ticket_column: String,
    /// Report column holding the bar color
    pub color_column: String,
    /// Report column (or ticket field) flagging inclusion in the chart
    pub include_column: String,
}

impl Default for GanttConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.into(),
            show_opened: false,
            summary_length: 16,
            use_creation_date: true,
            ticket_column: "ticket".into(),
            color_column: "__color__".into(),
            include_column: "include_gantt".into(),
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(rename = "gantt-charts", default)]
    gantt_charts: GanttConfig,
}

impl GanttConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the `[gantt-charts]` table of a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(input)?;
        Ok(file.gantt_charts)
    }

    /// Set the date format
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Show opened dates
    pub fn show_opened(mut self, show: bool) -> Self {
        self.show_opened = show;
        self
    }

    /// Set the label length
    pub fn summary_length(mut self, len: usize) -> Self {
        self.summary_length = len;
        self
    }

    /// Enable or disable the creation date fallback
    pub fn use_creation_date(mut self, enabled: bool) -> Self {
        self.use_creation_date = enabled;
        self
    }

    /// Shorten a summary to `summary_length` characters, marking the cut with `...`
    pub fn shorten(&self, summary: &str) -> String {
        if summary.chars().count() > self.summary_length {
            let head: String = summary.chars().take(self.summary_length).collect();
            format!("{}...", head)
        } else {
            summary.to_string()
        }
    }
}
