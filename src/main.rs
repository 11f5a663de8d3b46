//! Bladder Diary CLI
//!
//! Command-line front end over the diary store:
//! - Log voids, drinks and leaks
//! - Review days, weeks and months against goals
//! - Manage goals, reminders and preferences
//! - Export entries and back up / restore the diary

use anyhow::{bail, Context};
use bladder_diary::config::{generate_default_config, Config, LoggingConfig};
use bladder_diary::diary::{
    parse_time_of_day, DiaryEntry, DiaryStore, DrinkType, EntryKind, EntryPatch, FileStorage,
    GoalsPatch, Language, LeakActivity, LeakSeverity, NewFluid, NewLeak, NewUrination,
    ReminderPatch, Urgency, VolumeSize,
};
use bladder_diary::export::{
    export_backup, export_entries, BackupEncoding, Delivery, ExportFormat, FileSink,
    LocaleFormatter,
};
use bladder_diary::query::{
    average_by, daily_rollup, entries_on, filter_by_date_range, fluid_balance,
    goal_progress, group_by_time_period, monthly_series, week_over_week_trend, weekly_series,
    DailyRollup, TrendDirection,
};
use bladder_diary::reminders::reminder_schedule;
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bladder-diary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bladder diary for voids, fluid intake and leaks")]
#[command(long_about = "Bladder Diary keeps a local log of voids, drinks and leaks.\nTrack daily goals and streaks, review trends and share exports with your clinician.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: standard locations, then environment)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log an entry
    Add {
        #[command(subcommand)]
        entry: AddCommand,
    },

    /// Edit an entry with a JSON patch, e.g. '{"urgency":4,"notes":null}'
    Edit {
        id: String,
        patch: String,
    },

    /// Delete an entry
    Delete { id: String },

    /// Delete every entry
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// List entries, newest first
    List {
        /// First local day (default: 7 days ago)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last local day (default: today)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show one day against the goals
    Summary {
        /// Local day (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Last 7 days with averages and trend
    Week,

    /// Last 30 days
    Month,

    /// Show or update daily goals
    Goals {
        /// Fluid target in ml (clamped to 500..=5000)
        #[arg(long)]
        fluid: Option<i64>,
        /// Void target per day (clamped to 3..=15)
        #[arg(long)]
        voids: Option<i64>,
    },

    /// Show goal change history
    GoalHistory,

    /// Recompute and show the logging streak
    Streak,

    /// Show or update reminder settings
    Reminders {
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        #[arg(long)]
        disable: bool,
        /// Hours between reminders (2, 3, 4 or 6)
        #[arg(long)]
        interval: Option<u32>,
        /// Quiet hours start, HH:MM
        #[arg(long, requires = "quiet_end")]
        quiet_start: Option<String>,
        /// Quiet hours end, HH:MM
        #[arg(long, requires = "quiet_start")]
        quiet_end: Option<String>,
        /// Turn quiet hours on or off
        #[arg(long)]
        quiet: Option<bool>,
        /// Show the next N reminders
        #[arg(long, default_value = "0")]
        next: usize,
    },

    /// Show or set the language (en, es, pt)
    Language { language: Option<Language> },

    /// Onboarding and launch preferences
    Onboarding {
        #[arg(value_enum, default_value = "status")]
        action: OnboardingAction,
        /// Open the add menu on launch
        #[arg(long)]
        open_add_menu: Option<bool>,
    },

    /// Export entries as CSV or JSON
    Export {
        #[arg(value_enum)]
        kind: EntryFormat,
        /// Output directory (default: configured export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a backup file
    Backup {
        /// Write an LZ4-compressed .bdz container
        #[arg(long)]
        compress: bool,
        /// Output directory (default: configured export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the diary with a backup file (.json or .bdz)
    Restore { path: PathBuf },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AddCommand {
    /// Log a void
    Urination {
        volume: VolumeSize,
        urgency: Urgency,
        /// Measured volume in ml
        #[arg(long)]
        ml: Option<NonZeroU32>,
        #[arg(long)]
        leak: bool,
        #[arg(long)]
        pain: bool,
        #[arg(short, long)]
        notes: Option<String>,
        /// Time (default: now). Supports: "now", ISO 8601, or HH:MM today
        #[arg(short, long, value_parser = parse_time)]
        time: Option<DateTime<Utc>>,
    },

    /// Log a drink
    Fluid {
        drink: DrinkType,
        /// Amount in ml
        amount: NonZeroU32,
        #[arg(short, long)]
        notes: Option<String>,
        #[arg(short, long, value_parser = parse_time)]
        time: Option<DateTime<Utc>>,
    },

    /// Log a leak
    Leak {
        severity: LeakSeverity,
        urgency: Urgency,
        #[arg(short, long)]
        activity: Option<LeakActivity>,
        #[arg(short, long)]
        notes: Option<String>,
        #[arg(short, long, value_parser = parse_time)]
        time: Option<DateTime<Utc>>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OnboardingAction {
    Status,
    Complete,
    Reset,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntryFormat {
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging);

    let data_dir = config.storage.data_path();
    tracing::debug!(data_dir = %data_dir.display(), "Opening diary");

    let storage = Arc::new(FileStorage::new(data_dir));
    let mut store = DiaryStore::open(storage, config.storage.store_options()).await;

    let result = run(cli.command, cli.format, &config, &mut store).await;
    store.shutdown().await.context("failed to persist diary")?;
    result
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("bladder_diary={}", config.level)),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Config written to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

async fn run(
    command: Commands,
    format: OutputFormat,
    config: &Config,
    store: &mut DiaryStore,
) -> anyhow::Result<()> {
    let tz = Local;
    let today = store.clock().today();

    match command {
        Commands::Add { entry } => {
            let entry = match entry {
                AddCommand::Urination {
                    volume,
                    urgency,
                    ml,
                    leak,
                    pain,
                    notes,
                    time,
                } => {
                    let mut input = NewUrination::new(volume, urgency).had_leak(leak).had_pain(pain);
                    if let Some(ml) = ml {
                        input = input.volume_ml(ml);
                    }
                    if let Some(notes) = notes {
                        input = input.notes(notes);
                    }
                    if let Some(time) = time {
                        input = input.at(time);
                    }
                    store.add_urination_entry(input)
                }
                AddCommand::Fluid {
                    drink,
                    amount,
                    notes,
                    time,
                } => {
                    let mut input = NewFluid::new(drink, amount);
                    if let Some(notes) = notes {
                        input = input.notes(notes);
                    }
                    if let Some(time) = time {
                        input = input.at(time);
                    }
                    store.add_fluid_entry(input)
                }
                AddCommand::Leak {
                    severity,
                    urgency,
                    activity,
                    notes,
                    time,
                } => {
                    let mut input = NewLeak::new(severity, urgency);
                    if let Some(activity) = activity {
                        input = input.activity(activity);
                    }
                    if let Some(notes) = notes {
                        input = input.notes(notes);
                    }
                    if let Some(time) = time {
                        input = input.at(time);
                    }
                    store.add_leak_entry(input)
                }
            };
            store.refresh_streak();

            match format {
                OutputFormat::Json => print_json(&entry)?,
                OutputFormat::Table => println!("Logged {} {}", entry.entry_type(), entry.id),
            }
        }

        Commands::Edit { id, patch } => {
            let patch: EntryPatch = serde_json::from_str(&patch).context("invalid patch")?;
            if store.entry(&id).is_none() {
                bail!("no entry with id {}", id);
            }
            if store.update_entry(&id, &patch) {
                println!("Updated {}", id);
            } else {
                println!("No changes");
            }
        }

        Commands::Delete { id } => {
            if !store.delete_entry(&id) {
                bail!("no entry with id {}", id);
            }
            store.refresh_streak();
            println!("Deleted {}", id);
        }

        Commands::Clear { yes } => {
            if !yes {
                bail!("refusing to delete {} entries without --yes", store.entries().len());
            }
            let count = store.entries().len();
            store.clear_all_entries();
            store.refresh_streak();
            println!("Deleted {} entries", count);
        }

        Commands::List { from, to } => {
            let to = to.unwrap_or(today);
            let from = from.unwrap_or(to - Duration::days(6));
            if from > to {
                bail!("--from must not be after --to");
            }
            let mut entries = filter_by_date_range(store.entries(), from, to, &tz);
            entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

            match format {
                OutputFormat::Json => print_json(&entries)?,
                OutputFormat::Table => print_entries(&entries),
            }
        }

        Commands::Summary { date } => {
            let day = date.unwrap_or(today);
            let rollup = daily_rollup(store.entries(), day, &tz);
            let progress = goal_progress(&rollup, &store.goals());
            let day_entries: Vec<DiaryEntry> =
                entries_on(store.entries(), day, &tz).into_iter().cloned().collect();
            let balance = fluid_balance(&day_entries);
            let periods = group_by_time_period(&day_entries, &tz);

            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "rollup": rollup,
                    "progress": progress,
                    "balance": balance,
                    "byTimeOfDay": periods
                        .iter()
                        .map(|(period, entries)| (period.as_str(), entries.len()))
                        .collect::<std::collections::BTreeMap<_, _>>(),
                }))?,
                OutputFormat::Table => {
                    println!("{}", day);
                    println!("{}", "-".repeat(40));
                    println!("{:<12} {} / {}", "Voids", progress.void_count, progress.void_target);
                    println!(
                        "{:<12} {} / {} ml ({:.0}%){}",
                        "Fluids",
                        progress.fluid_ml,
                        progress.fluid_target,
                        progress.fluid_ratio * 100.0,
                        if progress.fluid_goal_met() { " met" } else { "" }
                    );
                    println!("{:<12} {}", "Leaks", rollup.leak_count);
                    println!("{:<12} {} ml (estimated)", "Output", rollup.output_ml);
                    println!("{:<12} {:.2} ({})", "Balance", balance.ratio, balance.status.as_str());
                    println!();
                    for (period, entries) in &periods {
                        println!("{:<14} {}", period.as_str(), entries.len());
                    }
                }
            }
        }

        Commands::Week => {
            let this_week = weekly_series(store.entries(), today, &tz);
            let last_week = weekly_series(store.entries(), today - Duration::days(7), &tz);
            let fluid_trend = week_over_week_trend(
                average_by(&this_week, |r| r.fluid_ml as f64),
                average_by(&last_week, |r| r.fluid_ml as f64),
            );
            let void_trend = week_over_week_trend(
                average_by(&this_week, |r| r.void_count as f64),
                average_by(&last_week, |r| r.void_count as f64),
            );

            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "days": this_week,
                    "fluidTrend": fluid_trend,
                    "voidTrend": void_trend,
                }))?,
                OutputFormat::Table => {
                    print_series(&this_week);
                    println!();
                    println!(
                        "Avg fluids {:.0} ml/day ({} {} ml vs last week)",
                        average_by(&this_week, |r| r.fluid_ml as f64),
                        arrow(fluid_trend.direction),
                        fluid_trend.difference
                    );
                    println!(
                        "Avg voids  {:.1}/day ({} {} vs last week)",
                        average_by(&this_week, |r| r.void_count as f64),
                        arrow(void_trend.direction),
                        void_trend.difference
                    );
                }
            }
        }

        Commands::Month => {
            let series = monthly_series(store.entries(), today, &tz);
            match format {
                OutputFormat::Json => print_json(&series)?,
                OutputFormat::Table => {
                    print_series(&series);
                    let met = series
                        .iter()
                        .filter(|r| goal_progress(r, &store.goals()).fluid_goal_met())
                        .count();
                    println!();
                    println!("Fluid goal met on {} of {} days", met, series.len());
                }
            }
        }

        Commands::Goals { fluid, voids } => {
            let mut patch = GoalsPatch::new();
            if let Some(ml) = fluid {
                patch = patch.fluid_target(ml);
            }
            if let Some(count) = voids {
                patch = patch.void_target(count);
            }
            if patch != GoalsPatch::new() && store.update_goals(patch).is_none() {
                println!("Goals unchanged");
            }

            let goals = store.goals();
            match format {
                OutputFormat::Json => print_json(&goals)?,
                OutputFormat::Table => {
                    println!("{:<12} {} ml", "Fluids", goals.fluid_target);
                    println!("{:<12} {}", "Voids", goals.void_target);
                }
            }
        }

        Commands::GoalHistory => match format {
            OutputFormat::Json => print_json(&store.goal_history())?,
            OutputFormat::Table => {
                if store.goal_history().is_empty() {
                    println!("No goal changes yet");
                }
                for record in store.goal_history() {
                    let changes: Vec<String> = record
                        .changes
                        .iter()
                        .map(|(field, change)| format!("{} {} -> {}", field, change.from, change.to))
                        .collect();
                    println!(
                        "{:<18} {}",
                        record.changed_at.with_timezone(&tz).format("%Y-%m-%d %H:%M"),
                        changes.join(", ")
                    );
                }
            }
        },

        Commands::Streak => {
            store.refresh_streak();
            let streak = store.streak();
            match format {
                OutputFormat::Json => print_json(&streak)?,
                OutputFormat::Table => {
                    println!("{:<10} {} days", "Current", streak.current_streak);
                    println!("{:<10} {} days", "Longest", streak.longest_streak);
                }
            }
        }

        Commands::Reminders {
            enable,
            disable,
            interval,
            quiet_start,
            quiet_end,
            quiet,
            next,
        } => {
            let mut patch = ReminderPatch::new();
            if enable || disable {
                patch = patch.enabled(enable);
            }
            if let Some(hours) = interval {
                patch = patch.interval_hours(hours);
            }
            if let (Some(start), Some(end)) = (quiet_start, quiet_end) {
                patch = patch.quiet_hours(
                    parse_time_of_day(&start)?,
                    parse_time_of_day(&end)?,
                );
            }
            if let Some(on) = quiet {
                patch = patch.quiet_hours_enabled(on);
            }
            store.update_reminder_settings(patch)?;

            let settings = store.reminder_settings();
            let schedule = reminder_schedule(&settings, &Local::now(), next);
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "settings": settings,
                    "next": schedule,
                }))?,
                OutputFormat::Table => {
                    println!("{:<12} {}", "Enabled", settings.enabled);
                    println!("{:<12} every {}h", "Interval", settings.interval_hours);
                    println!(
                        "{:<12} {} - {}{}",
                        "Quiet hours",
                        settings.quiet_hours_start.format("%H:%M"),
                        settings.quiet_hours_end.format("%H:%M"),
                        if settings.quiet_hours_enabled { "" } else { " (off)" }
                    );
                    for at in schedule {
                        println!("  {}", at.format("%a %H:%M"));
                    }
                }
            }
        }

        Commands::Language { language } => {
            if let Some(language) = language {
                store.set_language(language);
            }
            println!("{}", store.language());
        }

        Commands::Onboarding {
            action,
            open_add_menu,
        } => {
            match action {
                OnboardingAction::Complete => store.complete_onboarding(),
                OnboardingAction::Reset => store.reset_onboarding(),
                OnboardingAction::Status => {}
            }
            if let Some(open) = open_add_menu {
                store.set_open_add_menu_on_launch(open);
            }
            println!("{:<22} {}", "Onboarding complete", store.has_completed_onboarding());
            println!("{:<22} {}", "Open add menu", store.open_add_menu_on_launch());
        }

        Commands::Export { kind, output } => {
            let sink = FileSink::new(output.unwrap_or_else(|| config.export.path()));
            let export_format = match kind {
                EntryFormat::Csv => ExportFormat::Csv,
                EntryFormat::Json => ExportFormat::Json,
            };
            let delivery = export_entries(
                store.entries(),
                export_format,
                &LocaleFormatter::local(),
                store.language(),
                store.clock().now(),
                &sink,
            )
            .await?;
            report_delivery(&delivery);
        }

        Commands::Backup { compress, output } => {
            let sink = FileSink::new(output.unwrap_or_else(|| config.export.path()));
            let encoding = if compress {
                BackupEncoding::Compressed
            } else {
                config.export.backup_encoding()
            };
            let delivery = export_backup(store, encoding, &sink).await?;
            report_delivery(&delivery);
        }

        Commands::Restore { path } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let summary = store.restore_from_bytes(&bytes)?;
            store.refresh_streak();
            println!(
                "Restored {} entries and {} goal changes (backup v{}, exported {})",
                summary.entries,
                summary.goal_history,
                summary.version,
                summary.exported_at.with_timezone(&tz).format("%Y-%m-%d %H:%M")
            );
        }

        Commands::Config { output } => write_default_config(output.as_ref())?,
    }

    Ok(())
}

/// Parse "now", an RFC 3339 timestamp, or HH:MM today in local time
fn parse_time(s: &str) -> Result<DateTime<Utc>, String> {
    if s == "now" {
        return Ok(Utc::now());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let time = parse_time_of_day(s).map_err(|e| e.to_string())?;
    Local::now()
        .date_naive()
        .and_time(time)
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("{} does not exist today", s))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_entries(entries: &[&DiaryEntry]) {
    if entries.is_empty() {
        println!("No entries");
        return;
    }

    println!("{:<17} {:<10} {:<36} {}", "Time", "Type", "Details", "ID");
    println!("{}", "-".repeat(100));
    for entry in entries {
        println!(
            "{:<17} {:<10} {:<36} {}",
            entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            entry.entry_type().as_str(),
            describe(entry),
            entry.id
        );
    }
}

fn describe(entry: &DiaryEntry) -> String {
    let mut details = match &entry.kind {
        EntryKind::Urination {
            volume,
            volume_ml,
            urgency,
            had_leak,
            had_pain,
        } => {
            let mut s = match volume_ml {
                Some(ml) => format!("{} ml", ml),
                None => volume.as_str().to_string(),
            };
            s.push_str(&format!(", urgency {}", urgency.get()));
            if *had_leak {
                s.push_str(", leak");
            }
            if *had_pain {
                s.push_str(", pain");
            }
            s
        }
        EntryKind::Fluid { drink_type, amount } => format!("{} ml {}", amount, drink_type.as_str()),
        EntryKind::Leak {
            severity,
            urgency,
            activity,
        } => match activity {
            Some(activity) => format!(
                "{}, urgency {}, {}",
                severity.as_str(),
                urgency.get(),
                activity.as_str()
            ),
            None => format!("{}, urgency {}", severity.as_str(), urgency.get()),
        },
    };
    if entry.notes.is_some() {
        details.push_str(" *");
    }
    details
}

fn print_series(series: &[DailyRollup]) {
    println!("{:<12} {:>6} {:>10} {:>6} {:>10}", "Date", "Voids", "Fluid ml", "Leaks", "Output ml");
    println!("{}", "-".repeat(50));
    for day in series {
        println!(
            "{:<12} {:>6} {:>10} {:>6} {:>10}",
            day.date.to_string(),
            day.void_count,
            day.fluid_ml,
            day.leak_count,
            day.output_ml
        );
    }
}

fn arrow(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Up => "up",
        TrendDirection::Down => "down",
        TrendDirection::Stable => "flat",
    }
}

fn report_delivery(delivery: &Delivery) {
    match delivery {
        Delivery::Delivered(path) => println!("Written to {}", path.display()),
        Delivery::Dismissed => println!("Export cancelled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_urination_args() {
        let cli = Cli::try_parse_from([
            "bladder-diary",
            "add",
            "urination",
            "medium",
            "3",
            "--leak",
            "--ml",
            "280",
        ])
        .unwrap();

        match cli.command {
            Commands::Add {
                entry:
                    AddCommand::Urination {
                        volume,
                        urgency,
                        ml,
                        leak,
                        pain,
                        ..
                    },
            } => {
                assert_eq!(volume, VolumeSize::Medium);
                assert_eq!(urgency.get(), 3);
                assert_eq!(ml, NonZeroU32::new(280));
                assert!(leak);
                assert!(!pain);
            }
            _ => panic!("expected add urination"),
        }
    }

    #[test]
    fn test_rejects_out_of_range_urgency() {
        assert!(Cli::try_parse_from(["bladder-diary", "add", "leak", "drops", "6"]).is_err());
        assert!(Cli::try_parse_from(["bladder-diary", "add", "fluid", "water", "0"]).is_err());
    }

    #[test]
    fn test_parse_time() {
        let parsed = parse_time("2024-05-01T09:30:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T07:30:00+00:00");
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("07:45").is_ok());
    }

    #[test]
    fn test_language_arg() {
        let cli = Cli::try_parse_from(["bladder-diary", "language", "pt"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Language {
                language: Some(Language::Pt)
            }
        ));
    }
}
