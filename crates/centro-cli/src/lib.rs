//! # centro-cli
//!
//! Command-line front end for the Centro scheduler.
//!
//! Provides commands for:
//! - Logging in and out, and showing the stored session
//! - Listing and inspecting jobs, their status and event logs
//! - Submitting jobs from JSON files
//! - Listing and inspecting instances and nodes
//! - Cluster-wide counters
//!
//! # Architecture
//!
//! Every command goes through [`centro_client::PanelClient`], so the stored
//! session is attached to each call and cleared whenever the backend answers
//! 401.
//!
//! ```text
//! ┌───────────┐    REST + Bearer     ┌─────────────────┐
//! │ centroctl │◄────────────────────►│  centro backend │
//! └───────────┘      (/api/v1)       └─────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, Format, InstanceCommands, JobCommands, NodeCommands};
pub use error::CliError;
pub use output::OutputFormat;
