//! Fluid balance and trend classification

use crate::diary::entry::{DiaryEntry, EntryKind};
use serde::Serialize;

/// Ratio below which output is considered low relative to intake
pub const LOW_BALANCE_RATIO: f64 = 0.5;
/// Ratio above which output is considered high relative to intake
pub const HIGH_BALANCE_RATIO: f64 = 1.5;

/// Output of a void in millilitres: the measured volume if recorded, otherwise
/// the size estimate. Zero for non-void entries.
pub fn estimated_output_ml(entry: &DiaryEntry) -> u32 {
    match &entry.kind {
        EntryKind::Urination {
            volume, volume_ml, ..
        } => volume_ml.map_or_else(|| volume.estimated_ml(), |ml| ml.get()),
        _ => 0,
    }
}

/// Intake of a drink in millilitres; zero for other entries
pub fn intake_ml(entry: &DiaryEntry) -> u32 {
    match &entry.kind {
        EntryKind::Fluid { amount, .. } => amount.get(),
        _ => 0,
    }
}

/// Output divided by intake, 0 when nothing was drunk
pub fn fluid_balance_ratio(intake_ml: u64, output_ml: u64) -> f64 {
    if intake_ml == 0 {
        return 0.0;
    }
    output_ml as f64 / intake_ml as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    Low,
    Normal,
    High,
}

impl BalanceStatus {
    pub fn classify(ratio: f64) -> BalanceStatus {
        if ratio < LOW_BALANCE_RATIO {
            BalanceStatus::Low
        } else if ratio > HIGH_BALANCE_RATIO {
            BalanceStatus::High
        } else {
            BalanceStatus::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceStatus::Low => "low",
            BalanceStatus::Normal => "normal",
            BalanceStatus::High => "high",
        }
    }
}

impl std::fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intake, output and their ratio over a set of entries
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FluidBalance {
    pub intake_ml: u64,
    pub output_ml: u64,
    pub ratio: f64,
    pub status: BalanceStatus,
}

pub fn fluid_balance<'a, I>(entries: I) -> FluidBalance
where
    I: IntoIterator<Item = &'a DiaryEntry>,
{
    let (intake_ml, output_ml) = entries.into_iter().fold((0u64, 0u64), |(i, o), e| {
        (i + intake_ml(e) as u64, o + estimated_output_ml(e) as u64)
    });
    let ratio = fluid_balance_ratio(intake_ml, output_ml);

    FluidBalance {
        intake_ml,
        output_ml,
        ratio,
        status: BalanceStatus::classify(ratio),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Direction and rounded absolute size of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub difference: u64,
}

/// Compare this week's average with last week's
pub fn week_over_week_trend(current: f64, previous: f64) -> Trend {
    let direction = if current > previous {
        TrendDirection::Up
    } else if current < previous {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    Trend {
        direction,
        difference: (current - previous).abs().round() as u64,
    }
}
