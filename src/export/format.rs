//! Locale-aware date formatting for exports

use crate::diary::types::Language;
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

/// Renders instants for people; the core itself only ever writes ISO-8601
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, instant: &DateTime<Utc>, language: Language) -> String;

    fn format_time(&self, instant: &DateTime<Utc>, language: Language) -> String;
}

/// `MM/DD/YYYY h:mm AM` for English, `DD/MM/YYYY HH:mm` for Spanish and Portuguese
#[derive(Debug, Clone)]
pub struct LocaleFormatter<Tz: TimeZone> {
    tz: Tz,
}

impl<Tz: TimeZone> LocaleFormatter<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl LocaleFormatter<Utc> {
    pub fn utc() -> Self {
        Self::new(Utc)
    }
}

impl LocaleFormatter<Local> {
    pub fn local() -> Self {
        Self::new(Local)
    }
}

fn date_pattern(language: Language) -> &'static str {
    match language {
        Language::En => "%m/%d/%Y",
        Language::Es | Language::Pt => "%d/%m/%Y",
    }
}

fn time_pattern(language: Language) -> &'static str {
    match language {
        Language::En => "%-I:%M %p",
        Language::Es | Language::Pt => "%H:%M",
    }
}

impl<Tz> DateFormatter for LocaleFormatter<Tz>
where
    Tz: TimeZone + Send + Sync,
    Tz::Offset: Display,
{
    fn format_date(&self, instant: &DateTime<Utc>, language: Language) -> String {
        instant
            .with_timezone(&self.tz)
            .format(date_pattern(language))
            .to_string()
    }

    fn format_time(&self, instant: &DateTime<Utc>, language: Language) -> String {
        instant
            .with_timezone(&self.tz)
            .format(time_pattern(language))
            .to_string()
    }
}
