//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use centro_client::{JobEvents, Session};
use centro_time::{EventRecord, format_absolute, format_relative, parse_log_lines, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as human-readable text.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// A backend response shown as-is.
///
/// Table mode renders nested objects as indented `key: value` blocks, with
/// timestamp fields made human-readable.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Document {
    /// Decoded response body.
    pub value: Value,
}

impl Document {
    /// Wrap a response body.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self { value }
    }
}

impl TableDisplay for Document {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        match &self.value {
            Value::Object(map) if map.is_empty() => writeln!(writer, "(empty)")?,
            Value::Object(map) => {
                for (key, value) in map {
                    write_field(writer, key, value, 0)?;
                }
            }
            Value::Array(items) => write_items(writer, items, 0)?,
            other => writeln!(writer, "{}", scalar(other))?,
        }
        Ok(())
    }
}

const INDENT: usize = 2;

fn write_field<W: Write>(
    writer: &mut W,
    key: &str,
    value: &Value,
    depth: usize,
) -> Result<(), CliError> {
    let pad = " ".repeat(depth * INDENT);
    match value {
        Value::Object(map) if map.is_empty() => writeln!(writer, "{pad}{key}: -")?,
        Value::Object(map) => {
            writeln!(writer, "{pad}{key}:")?;
            for (k, v) in map {
                write_field(writer, k, v, depth + 1)?;
            }
        }
        Value::Array(items) if items.is_empty() => writeln!(writer, "{pad}{key}: []")?,
        Value::Array(items) if items.iter().all(is_scalar) => {
            let joined: Vec<String> = items.iter().map(scalar).collect();
            writeln!(writer, "{pad}{key}: {}", joined.join(", "))?;
        }
        Value::Array(items) => {
            writeln!(writer, "{pad}{key}:")?;
            write_items(writer, items, depth + 1)?;
        }
        Value::String(s) if is_time_key(key) => {
            writeln!(writer, "{pad}{key}: {}", display_time(s))?;
        }
        other => writeln!(writer, "{pad}{key}: {}", scalar(other))?,
    }
    Ok(())
}

fn write_items<W: Write>(writer: &mut W, items: &[Value], depth: usize) -> Result<(), CliError> {
    let pad = " ".repeat(depth * INDENT);
    for item in items {
        match item {
            Value::Object(map) => {
                writeln!(writer, "{pad}-")?;
                for (k, v) in map {
                    write_field(writer, k, v, depth + 1)?;
                }
            }
            other => writeln!(writer, "{pad}- {}", scalar(other))?,
        }
    }
    Ok(())
}

const fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_time_key(key: &str) -> bool {
    key.ends_with("_at") || key.contains("time") || key.contains("heartbeat")
}

/// `Nov 12, 2025, 04:31:48 PM (5 minutes ago)`; unparsable values verbatim.
fn display_time(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(instant) if !centro_time::is_unset(&instant) => {
            format!("{} ({})", format_absolute(Some(raw)), format_relative(raw))
        }
        Some(_) => format_absolute(Some(raw)),
        None => raw.to_string(),
    }
}

/// Parsed event log of one job.
#[derive(Debug, Clone, Serialize)]
pub struct EventList {
    /// Job ID.
    pub job_id: String,
    /// Events, oldest first.
    pub events: Vec<EventRecord>,
}

impl From<JobEvents> for EventList {
    fn from(raw: JobEvents) -> Self {
        Self {
            job_id: raw.job_id,
            events: parse_log_lines(raw.events),
        }
    }
}

impl TableDisplay for EventList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.events.is_empty() {
            writeln!(writer, "No events for job {}", self.job_id)?;
            return Ok(());
        }

        writeln!(writer, "{:<20}  MESSAGE", "WHEN")?;
        writeln!(writer, "{}", "─".repeat(72))?;
        for event in &self.events {
            writeln!(writer, "{:<20}  {}", event.formatted_time, event.message)?;
        }

        writeln!(writer)?;
        writeln!(writer, "Total: {} event(s)", self.events.len())?;
        Ok(())
    }
}

/// The stored session as shown by `whoami`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    /// Whether a token is stored.
    pub authenticated: bool,
    /// Stored username.
    pub username: Option<String>,
    /// Stored expiry, RFC 3339.
    pub expires_at: Option<String>,
    /// Whether the stored expiry has passed.
    pub expired: bool,
}

impl SessionInfo {
    /// Describe `session` as of `now`.
    #[must_use]
    pub fn new(session: &Session, now: DateTime<Utc>) -> Self {
        Self {
            authenticated: session.is_authenticated(),
            username: session.username.clone(),
            expires_at: session.expires_at.map(|at| at.to_rfc3339()),
            expired: session.is_expired(now),
        }
    }
}

impl TableDisplay for SessionInfo {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if !self.authenticated {
            writeln!(writer, "Not logged in")?;
            return Ok(());
        }

        writeln!(writer, "Username:  {}", self.username.as_deref().unwrap_or("-"))?;
        let expiry = format_absolute(self.expires_at.as_deref());
        if self.expired {
            writeln!(writer, "Expires:   {expiry} (expired)")?;
        } else {
            writeln!(writer, "Expires:   {expiry}")?;
        }
        Ok(())
    }
}

/// Simple message output.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Message text.
    pub message: String,
    /// Whether this is a success message.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub success: bool,
}

impl Message {
    /// Create a success message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// Create an informational message.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl TableDisplay for Message {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.success {
            writeln!(writer, "✓ {}", self.message)?;
        } else {
            writeln!(writer, "{}", self.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn table<T: Serialize + TableDisplay>(value: &T) -> String {
        OutputFormat::default().to_string(value).expect("render")
    }

    #[test]
    fn output_format_default_is_table() {
        assert!(!OutputFormat::default().is_json());
        assert!(OutputFormat::new(Format::Json).is_json());
    }

    #[test]
    fn document_json_is_passthrough() {
        let doc = Document::new(json!({"total_jobs": 3}));
        let out = OutputFormat::new(Format::Json).to_string(&doc).expect("render");
        let parsed: Value = serde_json::from_str(&out).expect("json");
        assert_eq!(parsed, json!({"total_jobs": 3}));
    }

    #[test]
    fn document_table_nests_objects() {
        let doc = Document::new(json!({
            "node_id": "node-1",
            "metadata": {"zone": "dc1"},
            "tags": ["gpu", "ssd"],
        }));

        let out = table(&doc);

        assert!(out.contains("node_id: node-1"));
        assert!(out.contains("metadata:\n  zone: dc1"));
        assert!(out.contains("tags: gpu, ssd"));
    }

    #[test]
    fn document_table_lists_objects() {
        let doc = Document::new(json!({
            "instances": [{"job_id": "a"}, {"job_id": "b"}],
            "count": 2,
        }));

        let out = table(&doc);

        assert!(out.contains("instances:\n  -\n    job_id: a\n  -\n    job_id: b"));
        assert!(out.contains("count: 2"));
    }

    #[test]
    fn document_table_humanizes_timestamps() {
        let doc = Document::new(json!({
            "last_heartbeat": "0001-01-01T00:00:00Z",
            "created_at": "not a time",
            "name": "2025-11-12T16:31:48Z",
        }));

        let out = table(&doc);

        assert!(out.contains("last_heartbeat: N/A"));
        assert!(out.contains("created_at: not a time"));
        assert!(out.contains("name: 2025-11-12T16:31:48Z"));
    }

    #[test]
    fn empty_document() {
        assert_eq!(table(&Document::new(json!({}))), "(empty)\n");
    }

    #[test]
    fn event_list_from_raw_lines() {
        let list = EventList::from(JobEvents {
            job_id: "j1".into(),
            events: vec!["[2025-11-12T16:31:48Z] started".into(), "garbage".into()],
        });

        assert_eq!(list.events[0].message, "started");
        assert!(!list.events[0].formatted_time.is_empty());
        assert_eq!(list.events[1].message, "garbage");
        assert_eq!(list.events[1].formatted_time, "");

        let out = table(&list);
        assert!(out.contains("started"));
        assert!(out.contains("Total: 2 event(s)"));
    }

    #[test]
    fn empty_event_list() {
        let list = EventList {
            job_id: "j1".into(),
            events: vec![],
        };
        assert_eq!(table(&list), "No events for job j1\n");
    }

    #[test]
    fn session_info_logged_out() {
        let info = SessionInfo::new(&Session::default(), Utc::now());
        assert_eq!(table(&info), "Not logged in\n");
    }

    #[test]
    fn session_info_marks_expiry() {
        let expiry = Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .expect("valid instant");
        let session = Session::authenticated("tok", "admin", Some(expiry));

        let info = SessionInfo::new(&session, expiry + chrono::Duration::hours(1));

        assert!(info.expired);
        let out = table(&info);
        assert!(out.contains("Username:  admin"));
        assert!(out.contains("(expired)"));
    }

    #[test]
    fn session_info_json_has_no_token() {
        let session = Session::authenticated("secret-token", "admin", None);
        let out = OutputFormat::new(Format::Json)
            .to_string(&SessionInfo::new(&session, Utc::now()))
            .expect("render");
        assert!(!out.contains("secret-token"));
        assert!(out.contains("\"username\": \"admin\""));
    }

    #[test]
    fn message_table_and_json() {
        assert_eq!(table(&Message::success("Logged out")), "✓ Logged out\n");
        assert_eq!(table(&Message::info("hi")), "hi\n");
        let out = OutputFormat::new(Format::Json)
            .to_string(&Message::info("hi"))
            .expect("render");
        assert!(!out.contains("success"));
    }
}
