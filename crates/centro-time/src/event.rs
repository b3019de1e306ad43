//! Parsing of bracketed job event lines.
//!
//! The backend records job events as plain strings of the form
//! `[2025-11-12T16:31:48+07:00] Job assigned to node`. The first bracketed
//! group anywhere in the line is taken as the timestamp and any text before
//! it is dropped. Lines without brackets pass through as bare messages.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::format::format_relative_at;

static EVENT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]\s*(.*)").unwrap_or_else(|_| unreachable!()));

/// Display-ready form of one event line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Raw timestamp taken from between the brackets.
    pub timestamp: Option<String>,
    /// Text following the timestamp, or the whole line when there is none.
    pub message: String,
    /// Relative rendering of `timestamp`; empty when there is no timestamp.
    pub formatted_time: String,
}

impl EventRecord {
    /// Builds a record for a line without a bracketed timestamp.
    #[must_use]
    pub fn bare(line: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            message: line.into(),
            formatted_time: String::new(),
        }
    }

    /// Returns true if the line carried a timestamp.
    #[must_use]
    pub fn has_timestamp(&self) -> bool {
        self.timestamp.is_some()
    }
}

/// Parses one event line, rendering its age against the system clock.
#[must_use]
pub fn parse_log_line(line: &str) -> EventRecord {
    parse_log_line_at(line, Utc::now(), &Local)
}

/// [`parse_log_line`] with an explicit reference instant and display timezone.
#[must_use]
pub fn parse_log_line_at<Tz>(line: &str, now: DateTime<Utc>, tz: &Tz) -> EventRecord
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(captures) = EVENT_LINE.captures(line) else {
        return EventRecord::bare(line);
    };

    let timestamp = captures.get(1).map_or("", |m| m.as_str());
    let message = captures.get(2).map_or("", |m| m.as_str());

    EventRecord {
        timestamp: Some(timestamp.to_string()),
        message: message.to_string(),
        formatted_time: format_relative_at(timestamp, now, tz),
    }
}

/// Parses a batch of event lines, preserving order.
pub fn parse_log_lines<I, S>(lines: I) -> Vec<EventRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let now = Utc::now();
    lines
        .into_iter()
        .map(|line| parse_log_line_at(line.as_ref(), now, &Local))
        .collect()
}
