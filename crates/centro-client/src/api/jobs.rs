//! Job endpoints.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::dispatcher::{RequestDispatcher, RequestOptions};
use crate::error::Result;
use crate::transport::Transport;

/// Status values the job list can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatusFilter {
    /// Waiting in the queue.
    Queued,
    /// Claimed by an agent and not yet finished.
    Active,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
}

impl JobStatusFilter {
    /// Every filter, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Queued, Self::Active, Self::Completed, Self::Failed];

    /// The query value the backend expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown job status filter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown job status '{0}': expected queued, active, completed or failed")]
pub struct ParseStatusFilterError(pub String);

impl FromStr for JobStatusFilter {
    type Err = ParseStatusFilterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStatusFilterError(s.to_string()))
    }
}

/// Body of a job submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSubmission {
    /// Caller-chosen identifier.
    #[serde(default)]
    pub job_id: String,
    /// Display name.
    #[serde(default)]
    pub job_name: String,
    /// Job type, e.g. `service` or `batch`.
    #[serde(default)]
    pub job_type: String,
    /// Clusters the job may be placed in.
    #[serde(default)]
    pub selected_clusters: Vec<String>,
    /// Free-form labels.
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    /// Execution driver, e.g. `podman`.
    #[serde(default)]
    pub driver: String,
    /// Workload type, e.g. `container`.
    #[serde(default)]
    pub workload_type: String,
    /// Shell command for non-container workloads.
    #[serde(default)]
    pub command: String,
    /// Container settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_config: Option<InstanceConfig>,
    /// Resource limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequest>,
    /// Volume mounts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<VolumeMount>,
}

/// Container settings of a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Image reference.
    pub image: String,
    /// Entrypoint override.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Driver-specific options.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

/// Resource limits of a submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequest {
    /// Memory limit in MiB.
    pub memory_mb: i64,
    /// Reserved memory in MiB.
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub memory_reserve_mb: i64,
    /// CPU limit in cores.
    pub cpu: f32,
    /// Reserved CPU in cores.
    #[serde(default, skip_serializing_if = "is_zero_f32")]
    pub cpu_reserve: f32,
}

/// A host directory mounted into the instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeMount {
    /// Directory on the node.
    pub host_path: String,
    /// Mount point inside the instance.
    pub instance_path: String,
    /// Mount read-only.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero_i64(v: &i64) -> bool {
    *v == 0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero_f32(v: &f32) -> bool {
    *v == 0.0
}

/// Answer of the events endpoint: raw bracketed log lines, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEvents {
    /// The job the events belong to.
    #[serde(default)]
    pub job_id: String,
    /// `[timestamp] message` lines.
    #[serde(default)]
    pub events: Vec<String>,
}

/// Job endpoints.
#[derive(Debug)]
pub struct Jobs<'a, T> {
    dispatcher: &'a RequestDispatcher<T>,
}

impl<'a, T: Transport> Jobs<'a, T> {
    /// Creates the facade.
    #[must_use]
    pub const fn new(dispatcher: &'a RequestDispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// Lists jobs, optionally narrowed to one status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self, status: Option<JobStatusFilter>) -> Result<Value> {
        let endpoint = match status {
            Some(status) => format!("/jobs?status={status}"),
            None => "/jobs".to_string(),
        };
        self.dispatcher.request(&endpoint, RequestOptions::get()).await
    }

    /// Fetches one job.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, id: &str) -> Result<Value> {
        self.dispatcher
            .request(&format!("/jobs/{id}"), RequestOptions::get())
            .await
    }

    /// Submits a job. Any serializable payload is accepted; see
    /// [`JobSubmission`] for the usual shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be encoded or the request fails.
    pub async fn create<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Value> {
        let options = RequestOptions::post().with_json(payload)?;
        self.dispatcher.request("/jobs", options).await
    }

    /// Fetches the current status of one job.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_status(&self, id: &str) -> Result<Value> {
        self.dispatcher
            .request(&format!("/jobs/{id}/status"), RequestOptions::get())
            .await
    }

    /// Fetches the event log of one job.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not an event list.
    pub async fn get_events(&self, id: &str) -> Result<JobEvents> {
        self.dispatcher
            .request_json(&format!("/jobs/{id}/events"), RequestOptions::get())
            .await
    }
}
