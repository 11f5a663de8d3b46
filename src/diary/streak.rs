//! Streak calculation
//!
//! A streak is the run of consecutive local calendar days, each with at least
//! one entry of any kind, ending today. If today has nothing logged yet the run
//! may end yesterday instead, so an unfinished day does not reset the count.

use crate::diary::entry::DiaryEntry;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::HashSet;

/// Count the current streak, mapping each entry to a calendar day with `day_of`.
///
/// Days after `today` are ignored.
pub fn current_streak<F>(entries: &[DiaryEntry], today: NaiveDate, day_of: F) -> u32
where
    F: Fn(&DateTime<Utc>) -> NaiveDate,
{
    let days: HashSet<NaiveDate> = entries
        .iter()
        .map(|e| day_of(&e.timestamp))
        .filter(|day| *day <= today)
        .collect();

    let anchor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut count = 0;
    let mut day = Some(anchor);
    while let Some(d) = day.filter(|d| days.contains(d)) {
        count += 1;
        day = d.pred_opt();
    }

    count
}

/// [`current_streak`] with days taken in the given timezone
pub fn current_streak_in<Tz: TimeZone>(entries: &[DiaryEntry], today: NaiveDate, tz: &Tz) -> u32 {
    current_streak(entries, today, |ts| ts.with_timezone(tz).date_naive())
}
