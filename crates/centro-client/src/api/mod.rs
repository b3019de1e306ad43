//! Endpoint facades.
//!
//! Each facade borrows a [`RequestDispatcher`](crate::dispatcher::RequestDispatcher)
//! and maps its arguments onto one endpoint. Nothing here touches the session
//! or interprets failures; that is the dispatcher's job.

pub mod auth;
pub mod instances;
pub mod jobs;
pub mod nodes;
pub mod stats;

pub use auth::{Auth, LoginRequest, LoginResponse};
pub use instances::Instances;
pub use jobs::{
    InstanceConfig, JobEvents, JobStatusFilter, JobSubmission, Jobs, ParseStatusFilterError,
    ResourceRequest, VolumeMount,
};
pub use nodes::Nodes;
pub use stats::Stats;
