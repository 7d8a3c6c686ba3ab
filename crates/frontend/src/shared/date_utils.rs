/// Utilities for date and time formatting
///
/// Provides consistent date/time formatting across the application
use chrono::{DateTime, Local, TimeZone, Utc};

const DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";
const DATE_FORMAT: &str = "%d.%m.%Y";

/// Format a timestamp in the browser's local time zone as DD.MM.YYYY HH:MM:SS
pub fn format_local_datetime(ts: &DateTime<Utc>) -> String {
    format_datetime_in(ts, &Local)
}

/// Format a timestamp in the browser's local time zone as DD.MM.YYYY
pub fn format_local_date(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format(DATE_FORMAT).to_string()
}

pub fn format_datetime_in<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format(DATETIME_FORMAT).to_string()
}
