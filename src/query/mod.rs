//! Derived queries over diary snapshots
//!
//! Pure functions of a slice of entries (and goals): no I/O, no store access.
//! Calendar days are always taken in the timezone passed by the caller.
//!
//! - **filter**: Date-range filtering and time-of-day grouping
//! - **rollup**: Daily rollups, 7/30/N-day series, goal progress
//! - **balance**: Output estimation, fluid balance, week-over-week trend
//!
//! # Example
//!
//! ```rust,ignore
//! use bladder_diary::query::{fluid_balance, weekly_series, week_over_week_trend, average_by};
//!
//! let tz = chrono::Local;
//! let this_week = weekly_series(store.entries(), today, &tz);
//! let avg = average_by(&this_week, |r| r.fluid_ml as f64);
//! ```

mod balance;
mod filter;
mod rollup;

pub use balance::{
    estimated_output_ml, fluid_balance, fluid_balance_ratio, intake_ml, week_over_week_trend,
    BalanceStatus, FluidBalance, Trend, TrendDirection, HIGH_BALANCE_RATIO, LOW_BALANCE_RATIO,
};
pub use filter::{entries_on, filter_by_date_range, group_by_time_period, TimePeriod};
pub use rollup::{
    average_by, daily_rollup, daily_series, goal_progress, monthly_series, weekly_series,
    DailyRollup, GoalProgress,
};
