//! Stats command implementation.

use std::io::Write;

use centro_client::{PanelClient, Transport};

use crate::error::CliError;
use crate::output::{Document, OutputFormat};

/// Stats command executor.
pub struct StatsCommand<'a, T> {
    client: &'a PanelClient<T>,
}

impl<'a, T: Transport> StatsCommand<'a, T> {
    /// Create a new stats command.
    #[must_use]
    pub const fn new(client: &'a PanelClient<T>) -> Self {
        Self { client }
    }

    /// Fetch and print the cluster counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
    ) -> Result<(), CliError> {
        let stats = self.client.stats().get().await?;
        format.write(writer, &Document::new(stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::client;
    use centro_client::MemoryStorage;
    use std::sync::Arc;

    #[tokio::test]
    async fn prints_counters() {
        let client = client(
            &[(200, r#"{"total_nodes":3,"active_jobs":2,"queued_jobs":0}"#)],
            Arc::new(MemoryStorage::new()),
        );
        let mut out = Vec::new();

        StatsCommand::new(&client)
            .execute(&mut out, &OutputFormat::default())
            .await
            .expect("stats");

        let out = String::from_utf8(out).expect("utf-8");
        assert_eq!(out, "active_jobs: 2\nqueued_jobs: 0\ntotal_nodes: 3\n");
    }

    #[tokio::test]
    async fn stats_carries_bearer() {
        let storage = Arc::new(MemoryStorage::with_record(r#"{"token":"abc"}"#));
        let client = client(&[(200, "{}")], storage);
        let mut out = Vec::new();

        StatsCommand::new(&client)
            .execute(&mut out, &OutputFormat::default())
            .await
            .expect("stats");

        let sent = client.dispatcher().transport().sent();
        let auth = sent[0]
            .headers
            .get(centro_client::transport::header::AUTHORIZATION)
            .expect("bearer");
        assert_eq!(auth, "Bearer abc");
    }
}
