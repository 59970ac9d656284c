use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use tracing::warn;

use super::client::HttpClient;

/// An [`HttpClient`] wrapper that adds the agency's configured headers
/// (for example an `Authorization` key) to every request.
pub struct WithHeaders<C> {
    pub inner: C,
    pub headers: HashMap<String, String>,
}

#[async_trait]
impl<C: HttpClient> HttpClient for WithHeaders<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    req.headers_mut().insert(name, value);
                }
                _ => warn!(header = %name, "Skipping invalid request header"),
            }
        }
        self.inner.execute(req).await
    }
}
