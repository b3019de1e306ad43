//! Job command implementation.
//!
//! Provides subcommands for:
//! - Listing jobs, optionally by status
//! - Inspecting one job and its status
//! - Reading a job's event log
//! - Submitting a job from a JSON file

use std::fs;
use std::io::Write;
use std::path::Path;

use centro_client::{JobSubmission, PanelClient, Transport};
use tracing::info;

use crate::cli::JobCommands;
use crate::error::CliError;
use crate::output::{Document, EventList, OutputFormat};

/// Job command executor.
pub struct JobCommand<'a, T> {
    client: &'a PanelClient<T>,
}

impl<'a, T: Transport> JobCommand<'a, T> {
    /// Create a new job command.
    #[must_use]
    pub const fn new(client: &'a PanelClient<T>) -> Self {
        Self { client }
    }

    /// Execute a job subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &JobCommands,
    ) -> Result<(), CliError> {
        let jobs = self.client.jobs();
        match command {
            JobCommands::List { status } => {
                let listed = jobs.list(*status).await?;
                format.write(writer, &Document::new(listed))?;
            }
            JobCommands::Get { id } => {
                let job = jobs.get(require_id(id)?).await?;
                format.write(writer, &Document::new(job))?;
            }
            JobCommands::Status { id } => {
                let status = jobs.get_status(require_id(id)?).await?;
                format.write(writer, &Document::new(status))?;
            }
            JobCommands::Events { id } => {
                let events = jobs.get_events(require_id(id)?).await?;
                format.write(writer, &EventList::from(events))?;
            }
            JobCommands::Submit { file } => {
                let submission = read_submission(file)?;
                info!(job_id = %submission.job_id, "submitting job");
                let created = jobs.create(&submission).await?;
                format.write(writer, &Document::new(created))?;
            }
        }
        Ok(())
    }
}

fn require_id(id: &str) -> Result<&str, CliError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CliError::InvalidArgument("job ID cannot be empty".into()));
    }
    Ok(id)
}

/// Load and check a submission payload.
fn read_submission(path: &Path) -> Result<JobSubmission, CliError> {
    let raw = fs::read_to_string(path)?;
    let submission: JobSubmission = serde_json::from_str(&raw).map_err(|e| {
        CliError::InvalidArgument(format!("{}: not a job submission: {e}", path.display()))
    })?;
    if submission.job_name.trim().is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "{}: job_name is required",
            path.display()
        )));
    }
    Ok(submission)
}
