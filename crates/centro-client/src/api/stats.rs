//! Cluster-wide statistics.

use serde_json::Value;

use crate::dispatcher::{RequestDispatcher, RequestOptions};
use crate::error::Result;
use crate::transport::Transport;

/// Statistics endpoint.
#[derive(Debug)]
pub struct Stats<'a, T> {
    dispatcher: &'a RequestDispatcher<T>,
}

impl<'a, T: Transport> Stats<'a, T> {
    /// Creates the facade.
    #[must_use]
    pub const fn new(dispatcher: &'a RequestDispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// Fetches the dashboard counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self) -> Result<Value> {
        self.dispatcher.request("/stats", RequestOptions::get()).await
    }
}
