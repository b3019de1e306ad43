//! Node command implementation.
//!
//! Provides subcommands for:
//! - Listing all nodes
//! - Getting detailed node information
//! - Reading a node's health report

use std::io::Write;

use centro_client::{PanelClient, Transport};

use crate::cli::NodeCommands;
use crate::error::CliError;
use crate::output::{Document, OutputFormat};

/// Node command executor.
pub struct NodeCommand<'a, T> {
    client: &'a PanelClient<T>,
}

impl<'a, T: Transport> NodeCommand<'a, T> {
    /// Create a new node command.
    #[must_use]
    pub const fn new(client: &'a PanelClient<T>) -> Self {
        Self { client }
    }

    /// Execute a node subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &NodeCommands,
    ) -> Result<(), CliError> {
        let nodes = self.client.nodes();
        let value = match command {
            NodeCommands::List => nodes.list().await?,
            NodeCommands::Get { id } => nodes.get(require_id(id)?).await?,
            NodeCommands::Health { id } => nodes.get_health(require_id(id)?).await?,
        };
        format.write(writer, &Document::new(value))
    }
}

fn require_id(id: &str) -> Result<&str, CliError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CliError::InvalidArgument("node ID cannot be empty".into()));
    }
    Ok(id)
}
