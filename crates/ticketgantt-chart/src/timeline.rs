//! Shared time axis of a chart

use chrono::NaiveDate;
use std::collections::BTreeSet;
use ticketgantt_core::{ordinal, TimelineEntry};

/// Sorted, de-duplicated dates in use on one chart
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timeline {
    dates: Vec<NaiveDate>,
}

impl Timeline {
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let unique: BTreeSet<NaiveDate> = dates.into_iter().collect();
        Self {
            dates: unique.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Index of `date`, `None` if it is not on the axis
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Index of a date the axis was built from
    pub(crate) fn position(&self, date: NaiveDate) -> usize {
        let found = self.dates.binary_search(&date);
        debug_assert!(found.is_ok(), "{} is not on the timeline", date);
        found.unwrap_or_else(|i| i)
    }

    pub fn entries(&self) -> Vec<TimelineEntry> {
        self.dates
            .iter()
            .enumerate()
            .map(|(index, &date)| TimelineEntry {
                date,
                ordinal: ordinal(date),
                index,
            })
            .collect()
    }
}
