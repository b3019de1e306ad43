//! # centro-time
//!
//! Timestamp rendering for the Centro admin panel.
//!
//! This crate provides:
//!
//! - [`format_absolute`]: `Nov 12, 2025, 04:31:48 PM`, or `N/A` for unset times
//! - [`format_relative`]: `5 minutes ago`, falling back to a short date after a week
//! - [`format_short_date`]: `Nov 12, 04:31 PM`, with the year only when it is not the current one
//! - [`parse_log_line`]: splits `[timestamp] message` event lines into an [`EventRecord`]
//!
//! Everything here is pure: no shared state, no I/O.
//!
//! ## Example
//!
//! ```rust
//! use centro_time::{format_absolute, parse_log_line};
//!
//! assert_eq!(format_absolute(Some("0001-01-01T00:00:00Z")), "N/A");
//!
//! let event = parse_log_line("[2025-11-12T16:31:48+07:00] started job");
//! assert_eq!(event.message, "started job");
//! assert!(!event.formatted_time.is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod event;
pub mod format;

pub use event::{EventRecord, parse_log_line, parse_log_line_at, parse_log_lines};
pub use format::{
    NOT_AVAILABLE, format_absolute, format_absolute_in, format_relative, format_relative_at,
    format_short_date, format_short_date_at, is_unset, parse_timestamp,
};
