use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Append/compact log of per-day net topic completions.
///
/// A sparse mapping from calendar date to a non-negative count: only
/// dates with a positive net count are retained, and counts can never go
/// below zero. Iteration is date-ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressLog {
    entries: BTreeMap<NaiveDate, u32>,
}

impl ProgressLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a log from persisted entries, dropping zero counts.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (NaiveDate, u32)>) -> Self {
        Self {
            entries: entries.into_iter().filter(|(_, count)| *count > 0).collect(),
        }
    }

    /// Adds `delta` to the entry for `date`, clamped at a floor of 0.
    ///
    /// A negative delta with no existing entry is a no-op (there is
    /// nothing to decrement), and an entry whose count reaches 0 is
    /// dropped so the log stays sparse.
    pub fn apply(&mut self, date: NaiveDate, delta: i32) {
        if delta == 0 {
            return;
        }

        match self.entries.get(&date).copied() {
            None => {
                if delta > 0 {
                    self.entries.insert(date, delta.unsigned_abs());
                }
            }
            Some(count) => {
                let updated = count.saturating_add_signed(delta);
                if updated == 0 {
                    self.entries.remove(&date);
                } else {
                    self.entries.insert(date, updated);
                }
            }
        }
    }

    /// Net completion count for a date (0 if no entry is retained).
    #[must_use]
    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.entries.get(&date).copied().unwrap_or(0)
    }

    /// Entries in ascending date order.
    pub fn entries(&self) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
        self.entries.iter().map(|(date, count)| (*date, *count))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test]
    fn positive_delta_creates_entry() {
        let mut log = ProgressLog::new();
        log.apply(date(5), 1);
        assert_eq!(log.count_on(date(5)), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn negative_delta_without_entry_is_noop() {
        let mut log = ProgressLog::new();
        log.apply(date(5), -1);
        assert!(log.is_empty());
    }

    #[test]
    fn entry_hitting_zero_is_dropped() {
        let mut log = ProgressLog::new();
        log.apply(date(5), 1);
        log.apply(date(5), -1);
        assert!(log.is_empty());
        assert_eq!(log.count_on(date(5)), 0);
    }

    #[test]
    fn count_is_clamped_at_zero() {
        let mut log = ProgressLog::new();
        log.apply(date(5), 2);
        log.apply(date(5), -5);
        assert!(log.is_empty());
    }

    #[test]
    fn zero_delta_is_noop() {
        let mut log = ProgressLog::new();
        log.apply(date(5), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn entries_iterate_date_ascending() {
        let mut log = ProgressLog::new();
        log.apply(date(20), 3);
        log.apply(date(1), 1);
        log.apply(date(10), 2);
        let dates: Vec<NaiveDate> = log.entries().map(|(d, _)| d).collect();
        assert_eq!(dates, [date(1), date(10), date(20)]);
    }

    #[test]
    fn from_entries_drops_zero_counts() {
        let log = ProgressLog::from_entries([(date(1), 0), (date(2), 4)]);
        assert_eq!(log.len(), 1);
        assert_eq!(log.count_on(date(2)), 4);
    }
}
