//! Per-day rollups and trailing-window series

use crate::diary::entry::{DiaryEntry, EntryKind};
use crate::diary::types::DailyGoals;
use crate::query::balance::{estimated_output_ml, intake_ml};
use chrono::{Duration, NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::HashMap;

/// Totals for one local calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRollup {
    pub date: NaiveDate,
    pub void_count: u32,
    pub fluid_ml: u64,
    pub leak_count: u32,
    /// Measured or estimated urine output
    pub output_ml: u64,
}

impl DailyRollup {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            void_count: 0,
            fluid_ml: 0,
            leak_count: 0,
            output_ml: 0,
        }
    }

    fn add(&mut self, entry: &DiaryEntry) {
        match entry.kind {
            EntryKind::Urination { .. } => {
                self.void_count += 1;
                self.output_ml += estimated_output_ml(entry) as u64;
            }
            EntryKind::Fluid { .. } => self.fluid_ml += intake_ml(entry) as u64,
            EntryKind::Leak { .. } => self.leak_count += 1,
        }
    }
}

/// Rollup of a single day
pub fn daily_rollup<Tz: TimeZone>(entries: &[DiaryEntry], day: NaiveDate, tz: &Tz) -> DailyRollup {
    let mut rollup = DailyRollup::empty(day);
    for entry in entries.iter().filter(|e| e.local_date(tz) == day) {
        rollup.add(entry);
    }
    rollup
}

/// One rollup per day for the `days` days ending at `end_day`, oldest first
pub fn daily_series<Tz: TimeZone>(
    entries: &[DiaryEntry],
    end_day: NaiveDate,
    days: u32,
    tz: &Tz,
) -> Vec<DailyRollup> {
    let mut series: Vec<DailyRollup> = (0..days as i64)
        .rev()
        .filter_map(|back| end_day.checked_sub_signed(Duration::days(back)))
        .map(DailyRollup::empty)
        .collect();

    let slots: HashMap<NaiveDate, usize> = series
        .iter()
        .enumerate()
        .map(|(i, r)| (r.date, i))
        .collect();

    for entry in entries {
        if let Some(&i) = slots.get(&entry.local_date(tz)) {
            series[i].add(entry);
        }
    }

    series
}

pub fn weekly_series<Tz: TimeZone>(entries: &[DiaryEntry], end_day: NaiveDate, tz: &Tz) -> Vec<DailyRollup> {
    daily_series(entries, end_day, 7, tz)
}

pub fn monthly_series<Tz: TimeZone>(entries: &[DiaryEntry], end_day: NaiveDate, tz: &Tz) -> Vec<DailyRollup> {
    daily_series(entries, end_day, 30, tz)
}

/// How far a day got towards the daily goals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub fluid_ml: u64,
    pub fluid_target: u32,
    /// `fluid_ml / fluid_target`, may exceed 1
    pub fluid_ratio: f64,
    pub void_count: u32,
    pub void_target: u32,
    pub void_ratio: f64,
}

impl GoalProgress {
    pub fn fluid_goal_met(&self) -> bool {
        self.fluid_ml >= self.fluid_target as u64
    }
}

pub fn goal_progress(rollup: &DailyRollup, goals: &DailyGoals) -> GoalProgress {
    let ratio = |value: f64, target: u32| {
        if target == 0 {
            0.0
        } else {
            value / target as f64
        }
    };

    GoalProgress {
        fluid_ml: rollup.fluid_ml,
        fluid_target: goals.fluid_target,
        fluid_ratio: ratio(rollup.fluid_ml as f64, goals.fluid_target),
        void_count: rollup.void_count,
        void_target: goals.void_target,
        void_ratio: ratio(rollup.void_count as f64, goals.void_target),
    }
}

/// Mean of `f` over a series, 0 for an empty series
pub fn average_by<F>(series: &[DailyRollup], f: F) -> f64
where
    F: Fn(&DailyRollup) -> f64,
{
    if series.is_empty() {
        return 0.0;
    }
    series.iter().map(f).sum::<f64>() / series.len() as f64
}
