//! Day-granularity walks over closed date intervals.

use chrono::NaiveDate;

/// An inclusive `[start, end]` range of calendar dates.
///
/// The range is a value: every call to [`DateRange::iter`] starts a fresh
/// walk from `start`, so a range can be scanned any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns true if the range contains no dates (`start > end`).
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of days in the range, zero when empty.
    pub fn len_days(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        // Non-negative after the emptiness check.
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    /// Starts a new walk over the range.
    pub const fn iter(&self) -> DateCursor {
        DateCursor {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = DateCursor;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &DateRange {
    type Item = NaiveDate;
    type IntoIter = DateCursor;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy forward iterator yielding one calendar date per step.
#[derive(Debug, Clone)]
pub struct DateCursor {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DateCursor {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|date| *date <= self.end)?;
        // `succ_opt` is None only at NaiveDate::MAX, which ends the walk.
        self.next = current.succ_opt();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.next.map_or(0, |next| {
            usize::try_from(DateRange::new(next, self.end).len_days()).unwrap_or(usize::MAX)
        });
        (remaining, Some(remaining))
    }
}

impl std::iter::FusedIterator for DateCursor {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn walks_every_day_inclusive() {
        let range = DateRange::new(date(2025, 1, 30), date(2025, 2, 2));
        let days: Vec<_> = range.iter().collect();
        assert_eq!(
            days,
            vec![
                date(2025, 1, 30),
                date(2025, 1, 31),
                date(2025, 2, 1),
                date(2025, 2, 2),
            ]
        );
    }

    #[test]
    fn single_day_range_yields_one_date() {
        let range = DateRange::new(date(2025, 3, 1), date(2025, 3, 1));
        assert_eq!(range.iter().count(), 1);
        assert_eq!(range.len_days(), 1);
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = DateRange::new(date(2025, 3, 2), date(2025, 3, 1));
        assert!(range.is_empty());
        assert_eq!(range.len_days(), 0);
        assert_eq!(range.iter().next(), None);
    }

    #[test]
    fn crosses_leap_day() {
        let range = DateRange::new(date(2024, 2, 28), date(2024, 3, 1));
        assert_eq!(range.iter().count(), 3);
        assert!(range.iter().any(|d| d == date(2024, 2, 29)));
    }

    #[test]
    fn range_is_restartable() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 10));
        let first: Vec<_> = range.iter().collect();
        let second: Vec<_> = range.into_iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn size_hint_tracks_remaining_days() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 10));
        let mut cursor = range.iter();
        assert_eq!(cursor.size_hint(), (10, Some(10)));
        cursor.next();
        cursor.next();
        assert_eq!(cursor.size_hint(), (8, Some(8)));
    }

    #[test]
    fn stops_at_max_date() {
        let range = DateRange::new(NaiveDate::MAX, NaiveDate::MAX);
        let days: Vec<_> = range.iter().collect();
        assert_eq!(days, vec![NaiveDate::MAX]);
    }
}
