//! Absolute and relative rendering of backend timestamps.
//!
//! The backend serializes times as RFC 3339 strings and uses the zero time
//! (`0001-01-01T00:00:00Z`) to mean "never set". Every renderer here maps that
//! sentinel, and a missing value, to [`NOT_AVAILABLE`].
//!
//! Each renderer comes in two flavours: a convenience form that reads the
//! system clock and renders in the local timezone, and an `*_at` form that
//! takes the reference instant and display timezone explicitly.

use std::fmt::Display;

use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

/// Placeholder rendered for absent or unset timestamps.
pub const NOT_AVAILABLE: &str = "N/A";

/// Unix seconds of `0001-01-01T00:00:00Z`, the backend's unset-time sentinel.
const ZERO_TIME_UNIX_SECS: i64 = -62_135_596_800;

/// `Nov 12, 2025, 04:31:48 PM`
const ABSOLUTE_FORMAT: &str = "%b %-d, %Y, %I:%M:%S %p";

/// `Nov 12, 04:31 PM`
const SHORT_FORMAT: &str = "%b %-d, %I:%M %p";

/// `Nov 12, 2024, 04:31 PM`
const SHORT_FORMAT_WITH_YEAR: &str = "%b %-d, %Y, %I:%M %p";

/// Offset-less layouts accepted after RFC 3339; interpreted as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

const SECS_PER_MINUTE: i64 = 60;
const MINUTES_PER_HOUR: i64 = 60;
const HOURS_PER_DAY: i64 = 24;
const DAYS_PER_WEEK: i64 = 7;

/// Parses a raw timestamp into a UTC instant.
///
/// Accepts RFC 3339 (with or without fractional seconds) and the naive
/// `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS` layouts, which are taken
/// to be UTC. Returns `None` for anything else.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .map(|naive| naive.and_utc())
}

/// Returns true if `instant` is the backend's zero-time sentinel.
#[must_use]
pub fn is_unset(instant: &DateTime<Utc>) -> bool {
    instant.timestamp() == ZERO_TIME_UNIX_SECS && instant.timestamp_subsec_nanos() == 0
}

/// Resolves an optional raw timestamp, separating the "N/A" cases out.
enum Resolved {
    Missing,
    Unparseable,
    At(DateTime<Utc>),
}

fn resolve(timestamp: Option<&str>) -> Resolved {
    let Some(raw) = timestamp.filter(|raw| !raw.trim().is_empty()) else {
        return Resolved::Missing;
    };
    match parse_timestamp(raw) {
        Some(instant) if is_unset(&instant) => Resolved::Missing,
        Some(instant) => Resolved::At(instant),
        None => {
            debug!(timestamp = raw, "unparseable timestamp, rendering verbatim");
            Resolved::Unparseable
        }
    }
}

/// Renders a timestamp as `Nov 12, 2025, 04:31:48 PM` in the local timezone.
///
/// Absent input and the zero-time sentinel yield `"N/A"`. Input that cannot be
/// parsed is returned unchanged.
#[must_use]
pub fn format_absolute(timestamp: Option<&str>) -> String {
    format_absolute_in(timestamp, &Local)
}

/// [`format_absolute`] rendered in an explicit timezone.
#[must_use]
pub fn format_absolute_in<Tz>(timestamp: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match resolve(timestamp) {
        Resolved::Missing => NOT_AVAILABLE.to_string(),
        Resolved::Unparseable => timestamp.unwrap_or_default().to_string(),
        Resolved::At(instant) => instant.with_timezone(tz).format(ABSOLUTE_FORMAT).to_string(),
    }
}

/// Renders the time elapsed since `timestamp` ("5 minutes ago").
///
/// Elapsed times of a week or more fall back to `Nov 12, 04:31 PM`.
#[must_use]
pub fn format_relative(timestamp: &str) -> String {
    format_relative_at(timestamp, Utc::now(), &Local)
}

/// [`format_relative`] measured against `now` and rendered in `tz`.
///
/// Timestamps in the future of `now` count as zero seconds elapsed.
#[must_use]
pub fn format_relative_at<Tz>(timestamp: &str, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(instant) = parse_timestamp(timestamp) else {
        debug!(timestamp, "unparseable timestamp, rendering verbatim");
        return timestamp.to_string();
    };

    let seconds = (now - instant).num_seconds().max(0);
    let minutes = seconds / SECS_PER_MINUTE;
    let hours = minutes / MINUTES_PER_HOUR;
    let days = hours / HOURS_PER_DAY;

    if seconds < SECS_PER_MINUTE {
        ago(seconds, "second")
    } else if minutes < MINUTES_PER_HOUR {
        ago(minutes, "minute")
    } else if hours < HOURS_PER_DAY {
        ago(hours, "hour")
    } else if days < DAYS_PER_WEEK {
        ago(days, "day")
    } else {
        instant.with_timezone(tz).format(SHORT_FORMAT).to_string()
    }
}

fn ago(amount: i64, unit: &str) -> String {
    let suffix = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{suffix} ago")
}

/// Renders a timestamp as `Nov 12, 04:31 PM`, adding the year only when it
/// differs from the current one.
#[must_use]
pub fn format_short_date(timestamp: Option<&str>) -> String {
    format_short_date_at(timestamp, Utc::now(), &Local)
}

/// [`format_short_date`] with the current year taken from `now` in `tz`.
#[must_use]
pub fn format_short_date_at<Tz>(timestamp: Option<&str>, now: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match resolve(timestamp) {
        Resolved::Missing => NOT_AVAILABLE.to_string(),
        Resolved::Unparseable => timestamp.unwrap_or_default().to_string(),
        Resolved::At(instant) => {
            let local = instant.with_timezone(tz);
            let layout = if local.year() == now.with_timezone(tz).year() {
                SHORT_FORMAT
            } else {
                SHORT_FORMAT_WITH_YEAR
            };
            local.format(layout).to_string()
        }
    }
}
