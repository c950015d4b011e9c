//! Calendar-day windows in a reference timezone.
//!
//! Every place that reasons about "today" or "that day" goes through
//! [`DayWindow`], so the duplicate check, today's totals and the weekly
//! series always agree on where a day starts and ends.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};

/// A half-open UTC interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// One calendar day, local midnight to next local midnight, as UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// Window for a calendar day in `tz`.
    pub fn for_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Self {
        let next = day.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
        Self {
            day,
            start: local_midnight_to_utc(day, tz),
            end: local_midnight_to_utc(next, tz),
        }
    }

    /// Window for the calendar day containing `instant` in `tz`.
    pub fn containing<Tz: TimeZone>(instant: DateTime<Utc>, tz: &Tz) -> Self {
        Self::for_day(instant.with_timezone(tz).date_naive(), tz)
    }

    /// `count` consecutive windows ending with `day`, oldest first.
    pub fn days_ending<Tz: TimeZone>(day: NaiveDate, count: u64, tz: &Tz) -> Vec<Self> {
        (0..count)
            .rev()
            .map(|back| {
                let date = day.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
                Self::for_day(date, tz)
            })
            .collect()
    }

    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start,
            end: self.end,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.range().contains(instant)
    }
}

/// Converts a local date at midnight to UTC.
/// DST ambiguity picks the earlier instant; a skipped midnight uses 01:00.
fn local_midnight_to_utc<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::default());
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            NaiveTime::from_hms_opt(1, 0, 0)
                .and_then(|one_am| tz.from_local_datetime(&date.and_time(one_am)).earliest())
        })
        .map_or_else(
            || Utc.from_utc_datetime(&midnight),
            |local| local.with_timezone(&Utc),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, LocalResult, NaiveDateTime, TimeDelta};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn utc_day_is_midnight_to_midnight() {
        let window = DayWindow::containing(utc("2025-01-29T15:30:00Z"), &Utc);
        assert_eq!(window.day, date(2025, 1, 29));
        assert_eq!(window.start, utc("2025-01-29T00:00:00Z"));
        assert_eq!(window.end, utc("2025-01-30T00:00:00Z"));
    }

    #[test]
    fn window_is_half_open() {
        let window = DayWindow::for_day(date(2025, 1, 29), &Utc);
        assert!(window.contains(utc("2025-01-29T00:00:00Z")));
        assert!(window.contains(utc("2025-01-29T23:59:59Z")));
        assert!(!window.contains(utc("2025-01-30T00:00:00Z")));
        assert!(!window.contains(utc("2025-01-28T23:59:59Z")));
    }

    #[test]
    fn negative_offset_shifts_the_day() {
        let eastern = FixedOffset::west_opt(5 * 3600).unwrap();
        // 22:00 local on Jan 1.
        let window = DayWindow::containing(utc("2025-01-02T03:00:00Z"), &eastern);
        assert_eq!(window.day, date(2025, 1, 1));
        assert_eq!(window.start, utc("2025-01-01T05:00:00Z"));
        assert_eq!(window.end, utc("2025-01-02T05:00:00Z"));
    }

    #[test]
    fn positive_offset_shifts_the_day() {
        let india = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let window = DayWindow::containing(utc("2025-01-01T20:00:00Z"), &india);
        assert_eq!(window.day, date(2025, 1, 2));
        assert_eq!(window.start, utc("2025-01-01T18:30:00Z"));
    }

    #[test]
    fn days_ending_is_oldest_first_across_months() {
        let windows = DayWindow::days_ending(date(2025, 3, 2), 7, &Utc);
        let days: Vec<NaiveDate> = windows.iter().map(|w| w.day).collect();
        assert_eq!(
            days,
            vec![
                date(2025, 2, 24),
                date(2025, 2, 25),
                date(2025, 2, 26),
                date(2025, 2, 27),
                date(2025, 2, 28),
                date(2025, 3, 1),
                date(2025, 3, 2),
            ]
        );
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    /// UTC-5 with UTC-4 summer time whose transitions sit on midnight, as in
    /// Havana in 2024: 00:00 jumps to 01:00 on Mar 10, and 01:00 falls back
    /// to 00:00 on Nov 3.
    #[derive(Debug, Clone, Copy)]
    struct MidnightDst;

    impl MidnightDst {
        fn standard() -> FixedOffset {
            FixedOffset::west_opt(5 * 3600).unwrap()
        }

        fn summer() -> FixedOffset {
            FixedOffset::west_opt(4 * 3600).unwrap()
        }

        fn offset_at(utc: NaiveDateTime) -> FixedOffset {
            let starts = date(2024, 3, 10).and_hms_opt(5, 0, 0).unwrap();
            let ends = date(2024, 11, 3).and_hms_opt(5, 0, 0).unwrap();
            if utc >= starts && utc < ends {
                Self::summer()
            } else {
                Self::standard()
            }
        }
    }

    impl TimeZone for MidnightDst {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            Self
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::default()))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            // Summer first: it maps a repeated local time to the earlier instant.
            let valid: Vec<FixedOffset> = [Self::summer(), Self::standard()]
                .into_iter()
                .filter(|offset| {
                    let utc = *local - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
                    Self::offset_at(utc) == *offset
                })
                .collect();
            match valid[..] {
                [only] => LocalResult::Single(only),
                [earlier, later] => LocalResult::Ambiguous(earlier, later),
                _ => LocalResult::None,
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            Self::offset_at(utc.and_time(NaiveTime::default()))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            Self::offset_at(*utc)
        }
    }

    #[test]
    fn skipped_midnight_starts_at_one_am() {
        let window = DayWindow::for_day(date(2024, 3, 10), &MidnightDst);
        // 01:00 summer time.
        assert_eq!(window.start, utc("2024-03-10T05:00:00Z"));
        assert_eq!(window.end, utc("2024-03-11T04:00:00Z"));

        let before = DayWindow::for_day(date(2024, 3, 9), &MidnightDst);
        assert_eq!(before.start, utc("2024-03-09T05:00:00Z"));
        assert_eq!(before.end, window.start);
    }

    #[test]
    fn repeated_midnight_starts_at_earlier_instant() {
        let window = DayWindow::for_day(date(2024, 11, 3), &MidnightDst);
        // First 00:00, still on summer time.
        assert_eq!(window.start, utc("2024-11-03T04:00:00Z"));
        assert_eq!(window.end, utc("2024-11-04T05:00:00Z"));

        // 00:30 on the second pass through midnight is the same day.
        let repeat = DayWindow::containing(utc("2024-11-03T05:30:00Z"), &MidnightDst);
        assert_eq!(repeat.day, date(2024, 11, 3));
        assert!(repeat.contains(utc("2024-11-03T04:00:00Z")));
    }

    #[test]
    fn days_ending_tiles_across_transitions() {
        for last in [date(2024, 3, 12), date(2024, 11, 5)] {
            let windows = DayWindow::days_ending(last, 7, &MidnightDst);
            assert_eq!(windows.len(), 7);
            for pair in windows.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
                assert!(pair[0].start < pair[0].end);
            }
        }
    }
}
