//! Goal clamping and change tracking
//!
//! Patched values are clamped into range *before* they are compared with the
//! current goals, so the history only ever holds in-range values and pushing
//! a goal that already sits on a boundary further out is not a change.

use crate::diary::types::{DailyGoals, GoalChange, GoalHistoryRecord, GoalsPatch};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Result of diffing a patch against the current goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDiff {
    pub next: DailyGoals,
    /// `None` when the clamped patch changes nothing
    pub record: Option<GoalHistoryRecord>,
}

pub fn clamp_fluid_target(ml: i64) -> u32 {
    clamp(ml, DailyGoals::FLUID_MIN, DailyGoals::FLUID_MAX)
}

pub fn clamp_void_target(voids: i64) -> u32 {
    clamp(voids, DailyGoals::VOID_MIN, DailyGoals::VOID_MAX)
}

fn clamp(value: i64, min: u32, max: u32) -> u32 {
    value.clamp(min as i64, max as i64) as u32
}

/// Clamp both fields of stored goals into range
pub fn clamp_goals(goals: DailyGoals) -> DailyGoals {
    DailyGoals {
        fluid_target: clamp_fluid_target(goals.fluid_target as i64),
        void_target: clamp_void_target(goals.void_target as i64),
    }
}

/// Apply `patch` to `current`, producing the next goals and the history record
pub fn diff_goals(current: &DailyGoals, patch: &GoalsPatch, changed_at: DateTime<Utc>) -> GoalDiff {
    let mut next = *current;
    let mut changes = BTreeMap::new();

    if let Some(ml) = patch.fluid_target {
        let to = clamp_fluid_target(ml);
        if to != current.fluid_target {
            changes.insert(
                "fluidTarget".to_string(),
                GoalChange {
                    from: current.fluid_target,
                    to,
                },
            );
            next.fluid_target = to;
        }
    }

    if let Some(voids) = patch.void_target {
        let to = clamp_void_target(voids);
        if to != current.void_target {
            changes.insert(
                "voidTarget".to_string(),
                GoalChange {
                    from: current.void_target,
                    to,
                },
            );
            next.void_target = to;
        }
    }

    let record = (!changes.is_empty()).then(|| GoalHistoryRecord {
        changed_at,
        changes,
    });

    GoalDiff { next, record }
}
