//! Date parsing for ticket fields
//!
//! Start dates are always absolute dates in the configured format. Due dates
//! may also be a plain day count relative to the start date.

use crate::DateErrorKind;
use chrono::{Duration, NaiveDate};

/// Default field format (MM/DD/YYYY)
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse an absolute date using a strftime-style format
pub fn parse_date(text: &str, format: &str) -> Result<NaiveDate, DateErrorKind> {
    NaiveDate::parse_from_str(text.trim(), format).map_err(|_| invalid(text, format))
}

/// The date `offset` days after `base` (before, if negative)
pub fn days_from(base: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let delta = Duration::try_days(offset)?;
    base.checked_add_signed(delta)
}

/// Parse a due date: an absolute date, or else a day count relative to `start`
pub fn parse_due(text: &str, format: &str, start: NaiveDate) -> Result<NaiveDate, DateErrorKind> {
    if let Ok(date) = parse_date(text, format) {
        return Ok(date);
    }

    text.trim()
        .parse::<i64>()
        .ok()
        .and_then(|days| days_from(start, days))
        .ok_or_else(|| invalid(text, format))
}

fn invalid(text: &str, format: &str) -> DateErrorKind {
    DateErrorKind::InvalidDateFormat {
        text: text.trim().to_string(),
        format: format.to_string(),
    }
}
