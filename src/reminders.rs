//! Reminder scheduling
//!
//! Turns `ReminderSettings` into concrete reminder times. Schedules are always
//! derived on demand and never persisted; delivering the notification is up
//! to the caller.

use crate::diary::types::ReminderSettings;
use chrono::{DateTime, Duration, NaiveTime, TimeZone};

/// Whether `time` falls inside the quiet-hours window.
///
/// The window is `[start, end)` and wraps past midnight when `start > end`.
/// An empty window (`start == end`) never matches.
pub fn is_quiet_time(settings: &ReminderSettings, time: NaiveTime) -> bool {
    if !settings.quiet_hours_enabled {
        return false;
    }

    let (start, end) = (settings.quiet_hours_start, settings.quiet_hours_end);
    if start < end {
        start <= time && time < end
    } else if start > end {
        time >= start || time < end
    } else {
        false
    }
}

/// Next reminder after `from`, pushed to the end of quiet hours if it would
/// land inside them. `None` when reminders are disabled.
pub fn next_reminder_after<Tz: TimeZone>(
    settings: &ReminderSettings,
    from: &DateTime<Tz>,
) -> Option<DateTime<Tz>> {
    if !settings.enabled {
        return None;
    }

    let candidate = from.clone() + Duration::hours(settings.interval_hours as i64);
    let local = candidate.naive_local();
    if !is_quiet_time(settings, local.time()) {
        return Some(candidate);
    }

    let mut wake = local.date().and_time(settings.quiet_hours_end);
    if wake <= local {
        wake += Duration::days(1);
    }

    let tz = candidate.timezone();
    let resumed = tz
        .from_local_datetime(&wake)
        .earliest()
        // Quiet end fell into a DST gap
        .or_else(|| tz.from_local_datetime(&(wake + Duration::hours(1))).earliest())
        .unwrap_or(candidate);

    Some(resumed)
}

/// The next `count` reminders after `from`
pub fn reminder_schedule<Tz: TimeZone>(
    settings: &ReminderSettings,
    from: &DateTime<Tz>,
    count: usize,
) -> Vec<DateTime<Tz>> {
    let mut schedule = Vec::with_capacity(count);
    let mut cursor = from.clone();

    while schedule.len() < count {
        match next_reminder_after(settings, &cursor) {
            Some(next) => {
                cursor = next.clone();
                schedule.push(next);
            }
            None => break,
        }
    }

    schedule
}
