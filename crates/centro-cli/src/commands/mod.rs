//! CLI command implementations.
//!
//! Each submodule implements one command group:
//! - [`auth`] - Login, logout and session inspection
//! - [`jobs`] - Job listing, inspection, events and submission
//! - [`instances`] - Instance listing and inspection
//! - [`nodes`] - Node listing, inspection and health
//! - [`stats`] - Cluster-wide counters

pub mod auth;
pub mod instances;
pub mod jobs;
pub mod nodes;
pub mod stats;

pub use auth::AuthCommand;
pub use instances::InstanceCommand;
pub use jobs::JobCommand;
pub use nodes::NodeCommand;
pub use stats::StatsCommand;
