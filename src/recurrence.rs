//! Recurrence expansion
//!
//! Turns an event's start date, frequency and [`RecurrencePattern`] into the
//! dates it occurs on. Every occurrence is computed from the start date, so
//! month-end clamping in one month does not shift the following ones.

use chrono::{Days, Months, NaiveDate};

use crate::models::event::{EventItem, Frequency, RecurrencePattern};

/// Lazy sequence of occurrence dates
#[derive(Debug, Clone)]
pub struct Occurrences {
    start: NaiveDate,
    frequency: Frequency,
    interval: u32,
    until: Option<NaiveDate>,
    remaining: Option<u32>,
    index: u32,
    done: bool,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining == Some(0) {
            self.done = true;
            return None;
        }

        let date = match nth_occurrence(self.start, self.frequency, self.interval, self.index) {
            Some(date) => date,
            None => {
                self.done = true;
                return None;
            }
        };

        if self.until.is_some_and(|until| date > until) {
            self.done = true;
            return None;
        }

        self.index += 1;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
        }

        Some(date)
    }
}

fn nth_occurrence(start: NaiveDate, frequency: Frequency, interval: u32, index: u32) -> Option<NaiveDate> {
    let step = interval.checked_mul(index)?;
    match frequency {
        Frequency::OneTime => (index == 0).then_some(start),
        Frequency::Weekly => start.checked_add_days(Days::new(u64::from(step) * 7)),
        Frequency::Monthly => start.checked_add_months(Months::new(step)),
        Frequency::Yearly => start.checked_add_months(Months::new(step.checked_mul(12)?)),
    }
}

/// All occurrences starting at `start`, bounded only by the pattern.
///
/// A one-time event yields just `start`. An interval of zero is read as one.
pub fn occurrences(start: NaiveDate, frequency: Frequency, pattern: &RecurrencePattern) -> Occurrences {
    Occurrences {
        start,
        frequency,
        interval: pattern.interval.max(1),
        until: pattern.until,
        remaining: pattern.count,
        index: 0,
        done: false,
    }
}

/// Occurrences intersecting the inclusive window `[window_start, window_end]`.
///
/// Each occurrence lasts `span_days` days after its start date, so one that
/// began before the window but is still running when it opens is kept.
pub fn occurrences_within(
    start: NaiveDate,
    frequency: Frequency,
    pattern: &RecurrencePattern,
    span_days: u64,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> impl Iterator<Item = NaiveDate> {
    occurrences(start, frequency, pattern)
        .skip_while(move |date| last_day(*date, span_days) < window_start)
        .take_while(move |date| *date <= window_end)
}

fn last_day(date: NaiveDate, span_days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(span_days)).unwrap_or(NaiveDate::MAX)
}

impl EventItem {
    /// Whole days between the start date and the end date
    pub fn span_days(&self) -> u64 {
        u64::try_from((self.end_date - self.date).num_days()).unwrap_or(0)
    }

    pub fn occurrences_within(&self, window_start: NaiveDate, window_end: NaiveDate) -> Vec<NaiveDate> {
        occurrences_within(
            self.date,
            self.frequency,
            &self.recurrence_pattern,
            self.span_days(),
            window_start,
            window_end,
        )
        .collect()
    }
}
