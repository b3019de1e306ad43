//! Node endpoints.

use serde_json::Value;

use crate::dispatcher::{RequestDispatcher, RequestOptions};
use crate::error::Result;
use crate::transport::Transport;

/// Node endpoints.
#[derive(Debug)]
pub struct Nodes<'a, T> {
    dispatcher: &'a RequestDispatcher<T>,
}

impl<'a, T: Transport> Nodes<'a, T> {
    /// Creates the facade.
    #[must_use]
    pub const fn new(dispatcher: &'a RequestDispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// Lists every node.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Value> {
        self.dispatcher.request("/nodes", RequestOptions::get()).await
    }

    /// Fetches one node.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, id: &str) -> Result<Value> {
        self.dispatcher
            .request(&format!("/nodes/{id}"), RequestOptions::get())
            .await
    }

    /// Fetches the health report of one node.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_health(&self, id: &str) -> Result<Value> {
        self.dispatcher
            .request(&format!("/nodes/{id}/health"), RequestOptions::get())
            .await
    }
}
