//! Instance command implementation.

use std::io::Write;

use centro_client::{PanelClient, Transport};

use crate::cli::InstanceCommands;
use crate::error::CliError;
use crate::output::{Document, OutputFormat};

/// Instance command executor.
pub struct InstanceCommand<'a, T> {
    client: &'a PanelClient<T>,
}

impl<'a, T: Transport> InstanceCommand<'a, T> {
    /// Create a new instance command.
    #[must_use]
    pub const fn new(client: &'a PanelClient<T>) -> Self {
        Self { client }
    }

    /// Execute an instance subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &InstanceCommands,
    ) -> Result<(), CliError> {
        let value = match command {
            InstanceCommands::List => self.client.instances().list().await?,
            InstanceCommands::Get { id } => {
                if id.trim().is_empty() {
                    return Err(CliError::InvalidArgument("instance ID cannot be empty".into()));
                }
                self.client.instances().get(id.trim()).await?
            }
        };
        format.write(writer, &Document::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use crate::commands::testing::client;
    use centro_client::MemoryStorage;
    use std::sync::Arc;

    #[tokio::test]
    async fn list_prints_json_passthrough() {
        let client = client(
            &[(200, r#"{"instances":[{"job_id":"j1"}],"count":1}"#)],
            Arc::new(MemoryStorage::new()),
        );
        let mut out = Vec::new();

        InstanceCommand::new(&client)
            .execute(&mut out, &OutputFormat::new(Format::Json), &InstanceCommands::List)
            .await
            .expect("list");

        let parsed: serde_json::Value = serde_json::from_slice(&out).expect("json");
        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["instances"][0]["job_id"], "j1");
    }

    #[tokio::test]
    async fn get_hits_instance_endpoint() {
        let client = client(&[(200, r#"{"job_id":"j1"}"#)], Arc::new(MemoryStorage::new()));
        let mut out = Vec::new();

        InstanceCommand::new(&client)
            .execute(
                &mut out,
                &OutputFormat::default(),
                &InstanceCommands::Get { id: "j1".into() },
            )
            .await
            .expect("get");

        assert_eq!(
            client.dispatcher().transport().urls(),
            vec!["http://centro.test/api/v1/instances/j1"]
        );
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let client = client(&[], Arc::new(MemoryStorage::new()));
        let mut out = Vec::new();

        let err = InstanceCommand::new(&client)
            .execute(&mut out, &OutputFormat::default(), &InstanceCommands::List)
            .await
            .expect_err("no backend");

        assert_eq!(err.to_string(), "connection refused");
    }
}
