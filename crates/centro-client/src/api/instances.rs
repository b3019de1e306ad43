//! Instance endpoints.

use serde_json::Value;

use crate::dispatcher::{RequestDispatcher, RequestOptions};
use crate::error::Result;
use crate::transport::Transport;

/// Instance endpoints.
#[derive(Debug)]
pub struct Instances<'a, T> {
    dispatcher: &'a RequestDispatcher<T>,
}

impl<'a, T: Transport> Instances<'a, T> {
    /// Creates the facade.
    #[must_use]
    pub const fn new(dispatcher: &'a RequestDispatcher<T>) -> Self {
        Self { dispatcher }
    }

    /// Lists every instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self) -> Result<Value> {
        self.dispatcher.request("/instances", RequestOptions::get()).await
    }

    /// Fetches one instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, id: &str) -> Result<Value> {
        self.dispatcher
            .request(&format!("/instances/{id}"), RequestOptions::get())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::dispatcher;

    #[tokio::test]
    async fn list_and_get() {
        let (d, _store) = dispatcher(200, r#"{"instances":[],"count":0}"#);
        let instances = Instances::new(&d);

        let listed = instances.list().await.expect("list");
        assert_eq!(listed["count"], 0);
        assert_eq!(d.transport().last().url, "http://centro.test/api/v1/instances");

        instances.get("job-7").await.expect("get");
        assert_eq!(d.transport().last().url, "http://centro.test/api/v1/instances/job-7");
    }
}
