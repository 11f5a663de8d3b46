//! Calendar-day filtering and time-of-day grouping

use crate::diary::entry::DiaryEntry;
use chrono::{NaiveDate, TimeZone, Timelike};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;

/// Entries whose local calendar day falls in `[start, end]`, in input order.
///
/// Empty when `start > end`.
pub fn filter_by_date_range<'a, Tz: TimeZone>(
    entries: &'a [DiaryEntry],
    start: NaiveDate,
    end: NaiveDate,
    tz: &Tz,
) -> Vec<&'a DiaryEntry> {
    entries
        .iter()
        .filter(|e| {
            let day = e.local_date(tz);
            start <= day && day <= end
        })
        .collect()
}

/// Entries logged on one local day
pub fn entries_on<'a, Tz: TimeZone>(
    entries: &'a [DiaryEntry],
    day: NaiveDate,
    tz: &Tz,
) -> Vec<&'a DiaryEntry> {
    filter_by_date_range(entries, day, day, tz)
}

/// Part of the day, by local hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TimePeriod {
    /// 00:00 to 05:00
    EarlyMorning,
    /// 05:00 to 12:00
    Morning,
    /// 12:00 to 17:00
    Afternoon,
    /// 17:00 to 21:00
    Evening,
    /// 21:00 to 24:00
    Night,
}

impl TimePeriod {
    pub fn all() -> &'static [TimePeriod] {
        &[
            TimePeriod::EarlyMorning,
            TimePeriod::Morning,
            TimePeriod::Afternoon,
            TimePeriod::Evening,
            TimePeriod::Night,
        ]
    }

    /// Half-open hour range covered by this period
    pub fn hours(&self) -> Range<u32> {
        match self {
            TimePeriod::EarlyMorning => 0..5,
            TimePeriod::Morning => 5..12,
            TimePeriod::Afternoon => 12..17,
            TimePeriod::Evening => 17..21,
            TimePeriod::Night => 21..24,
        }
    }

    pub fn from_hour(hour: u32) -> TimePeriod {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.hours().contains(&hour))
            .unwrap_or(TimePeriod::Night)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::EarlyMorning => "earlyMorning",
            TimePeriod::Morning => "morning",
            TimePeriod::Afternoon => "afternoon",
            TimePeriod::Evening => "evening",
            TimePeriod::Night => "night",
        }
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket entries by the local hour they were logged; every period is present
pub fn group_by_time_period<'a, Tz: TimeZone>(
    entries: &'a [DiaryEntry],
    tz: &Tz,
) -> BTreeMap<TimePeriod, Vec<&'a DiaryEntry>> {
    let mut groups: BTreeMap<TimePeriod, Vec<&DiaryEntry>> =
        TimePeriod::all().iter().map(|p| (*p, Vec::new())).collect();

    for entry in entries {
        let hour = entry.timestamp.with_timezone(tz).hour();
        groups
            .entry(TimePeriod::from_hour(hour))
            .or_default()
            .push(entry);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diary::entry::{EntryKind, LeakSeverity, Urgency};
    use chrono::{DateTime, Duration, FixedOffset, Utc};

    fn leak_at(id: &str, ts: DateTime<Utc>) -> DiaryEntry {
        DiaryEntry::new(
            id,
            ts,
            EntryKind::Leak {
                severity: LeakSeverity::Drops,
                urgency: Urgency::new(1).unwrap(),
                activity: None,
            },
        )
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    #[test]
    fn test_end_of_day_boundary() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let last_ms = tz
            .from_local_datetime(&day(14).and_hms_milli_opt(23, 59, 59, 999).unwrap())
            .single()
            .unwrap()
            .with_timezone(&Utc);

        let entries = vec![
            leak_at("inside", last_ms),
            leak_at("outside", last_ms + Duration::milliseconds(1)),
        ];

        let found = filter_by_date_range(&entries, day(10), day(14), &tz);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "inside");
    }

    #[test]
    fn test_start_is_inclusive_and_uses_local_day() {
        // 23:30 UTC on the 9th is already the 10th at UTC+2
        let ts = Utc.with_ymd_and_hms(2024, 7, 9, 23, 30, 0).unwrap();
        let entries = vec![leak_at("a", ts)];
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();

        assert_eq!(filter_by_date_range(&entries, day(10), day(10), &tz).len(), 1);
        assert!(filter_by_date_range(&entries, day(10), day(10), &Utc).is_empty());
        assert_eq!(entries_on(&entries, day(9), &Utc).len(), 1);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let entries = vec![leak_at("a", Utc.with_ymd_and_hms(2024, 7, 12, 8, 0, 0).unwrap())];
        assert!(filter_by_date_range(&entries, day(14), day(10), &Utc).is_empty());
    }

    #[test]
    fn test_period_boundaries_are_half_open() {
        assert_eq!(TimePeriod::from_hour(0), TimePeriod::EarlyMorning);
        assert_eq!(TimePeriod::from_hour(4), TimePeriod::EarlyMorning);
        assert_eq!(TimePeriod::from_hour(5), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_hour(12), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::from_hour(17), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_hour(20), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_hour(21), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(23), TimePeriod::Night);
    }

    #[test]
    fn test_group_by_time_period() {
        let at = |h: u32, m: u32| Utc.with_ymd_and_hms(2024, 7, 12, h, m, 0).unwrap();
        let entries = vec![
            leak_at("a", at(4, 59)),
            leak_at("b", at(5, 0)),
            leak_at("c", at(11, 59)),
            leak_at("d", at(21, 0)),
        ];

        let groups = group_by_time_period(&entries, &Utc);
        assert_eq!(groups.len(), 5);
        assert_eq!(groups[&TimePeriod::EarlyMorning].len(), 1);
        assert_eq!(groups[&TimePeriod::Morning].len(), 2);
        assert!(groups[&TimePeriod::Afternoon].is_empty());
        assert!(groups[&TimePeriod::Evening].is_empty());
        assert_eq!(groups[&TimePeriod::Night][0].id, "d");

        // Same instants seen from UTC-3
        let tz = FixedOffset::west_opt(3 * 3600).unwrap();
        let shifted = group_by_time_period(&entries, &tz);
        assert!(shifted[&TimePeriod::Night].is_empty());
        assert_eq!(shifted[&TimePeriod::EarlyMorning].len(), 2);
        assert_eq!(shifted[&TimePeriod::Morning].len(), 1);
        assert_eq!(shifted[&TimePeriod::Evening].len(), 1);
    }
}
