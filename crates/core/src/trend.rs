//! Time-bucketed aggregation of the progress-history log for charting.
//!
//! The reference date is always an explicit parameter; this module never
//! reads the clock, so aggregation is deterministic and testable.

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::model::ProgressLog;

/// Charting window for the progress-history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendPeriod {
    Daily,
    Weekly,
    Monthly,
}

/// One chart bucket. `start` is the first day of the bucket's window.
///
/// Buckets are pre-seeded with a count of 0 so empty periods still
/// render, and are always ordered oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendBucket {
    pub label: String,
    pub start: NaiveDate,
    pub count: u32,
}

/// Buckets the log relative to `reference`: exactly 7 daily, 4 weekly,
/// or 6 monthly buckets regardless of log content. Entries outside every
/// window are ignored.
#[must_use]
pub fn aggregate(history: &ProgressLog, period: TrendPeriod, reference: NaiveDate) -> Vec<TrendBucket> {
    match period {
        TrendPeriod::Daily => daily(history, reference),
        TrendPeriod::Weekly => weekly(history, reference),
        TrendPeriod::Monthly => monthly(history, reference),
    }
}

/// The 7 calendar days ending at `reference` inclusive, labelled by
/// weekday abbreviation.
fn daily(history: &ProgressLog, reference: NaiveDate) -> Vec<TrendBucket> {
    let mut buckets: Vec<TrendBucket> = (0..7)
        .rev()
        .map(|offset| {
            let day = reference - Duration::days(offset);
            TrendBucket {
                label: day.format("%a").to_string(),
                start: day,
                count: 0,
            }
        })
        .collect();

    for (date, count) in history.entries() {
        if let Some(bucket) = buckets.iter_mut().find(|bucket| bucket.start == date) {
            bucket.count += count;
        }
    }
    buckets
}

/// 4 windows of 7 days, each starting on a Sunday.
///
/// The same Sunday-start definition is used for seeding the buckets and
/// assigning entries, so window boundaries are consistent.
fn weekly(history: &ProgressLog, reference: NaiveDate) -> Vec<TrendBucket> {
    let current_week = week_start(reference);
    let mut buckets: Vec<TrendBucket> = (0..4)
        .rev()
        .map(|offset| {
            let start = current_week - Duration::weeks(offset);
            TrendBucket {
                label: format!("Week of {}", start.format("%b %d")),
                start,
                count: 0,
            }
        })
        .collect();

    for (date, count) in history.entries() {
        let start = week_start(date);
        if let Some(bucket) = buckets.iter_mut().find(|bucket| bucket.start == start) {
            bucket.count += count;
        }
    }
    buckets
}

/// The 6 calendar months ending at `reference`'s month inclusive;
/// entries are assigned by year and month.
fn monthly(history: &ProgressLog, reference: NaiveDate) -> Vec<TrendBucket> {
    let current_month = reference
        .with_day(1)
        .expect("the first of a month is always a valid date");
    let mut buckets: Vec<TrendBucket> = (0..6)
        .rev()
        .map(|offset| {
            let start = current_month - Months::new(offset);
            TrendBucket {
                label: start.format("%b %y").to_string(),
                start,
                count: 0,
            }
        })
        .collect();

    for (date, count) in history.entries() {
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|bucket| bucket.start.year() == date.year() && bucket.start.month() == date.month())
        {
            bucket.count += count;
        }
    }
    buckets
}

/// The Sunday on or before `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
