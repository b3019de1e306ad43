//! # centro-client
//!
//! Session-aware client for the Centro scheduler REST API.
//!
//! This crate provides:
//!
//! - [`SessionStore`]: the process-wide session, persisted and observable
//! - [`RequestDispatcher`]: bearer injection, 401 handling and error normalization
//! - Endpoint facades in [`api`]: auth, jobs, instances, nodes and stats
//! - [`PanelClient`]: all of the above wired from a [`ClientConfig`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use centro_client::{ClientConfig, PanelClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let client = PanelClient::from_config(&config)?;
//!
//! client.login("admin", "secret").await?;
//! let stats = client.stats().get().await?;
//! println!("{stats}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod session;
pub mod storage;
pub mod transport;

pub use api::{
    Auth, InstanceConfig, Instances, JobEvents, JobStatusFilter, JobSubmission, Jobs,
    LoginRequest, LoginResponse, Nodes, ResourceRequest, Stats, VolumeMount,
};
pub use client::PanelClient;
pub use config::ClientConfig;
pub use dispatcher::{LOGIN_ENDPOINT, RequestDispatcher, RequestOptions};
pub use error::{ConfigError, ErrorKind, ErrorOutcome, Result, StorageError, TransportError};
pub use session::{Session, SessionAccess, SessionStore, Subscription};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
