//! REST store data source.
//!
//! Pulls the whole telemetry node from a realtime-database style REST API,
//! where `GET {base_url}/{path}.json` returns the node as JSON and an
//! optional `auth` query parameter carries the access token.
//!
//! ## Example
//!
//! ```rust,no_run
//! use vitalwatch::{DataSource, HttpSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut source = HttpSource::builder()
//!         .base_url("https://example-default-rtdb.firebaseio.com")
//!         .path("sensorData")
//!         .build()?;
//!
//!     let snapshot = source.fetch().await?;
//!     println!("Fetched {} records", snapshot.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{snapshot_from_value, DataSource, TelemetrySnapshot};
use crate::error::SourceError;

/// Default node holding the device records.
pub const DEFAULT_PATH: &str = "sensorData";

/// HTTP snapshot source.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
    auth: Option<String>,
    description: String,
}

impl HttpSource {
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::default()
    }

    /// Full URL of the node being fetched.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&mut self) -> Result<TelemetrySnapshot, SourceError> {
        let mut request = self.client.get(&self.url);
        if let Some(ref token) = self.auth {
            request = request.query(&[("auth", token)]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Http(format!(
                "store returned status {}",
                response.status()
            )));
        }

        let value: Value = response.json().await.map_err(|e| SourceError::Parse(e.to_string()))?;
        let snapshot = snapshot_from_value(value)?;
        debug!(records = snapshot.len(), url = %self.url, "fetched snapshot");
        Ok(snapshot)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for [`HttpSource`].
#[derive(Debug, Default)]
pub struct HttpSourceBuilder {
    base_url: Option<String>,
    path: Option<String>,
    auth: Option<String>,
    timeout: Option<Duration>,
}

impl HttpSourceBuilder {
    /// Set the database base URL (e.g., "https://my-db.firebaseio.com").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the node path to fetch (default: "sensorData").
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the access token sent as the `auth` query parameter.
    pub fn auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(token.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpSource, SourceError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));
        let client = Client::builder().timeout(timeout).build()?;

        let base_url = self.base_url.unwrap_or_else(|| "http://localhost:9000".to_string());
        let path = self.path.unwrap_or_else(|| DEFAULT_PATH.to_string());
        let url = node_url(&base_url, &path);

        Ok(HttpSource {
            client,
            description: format!("http: {}", url),
            url,
            auth: self.auth,
        })
    }
}

fn node_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".json").unwrap_or(path);
    format!("{}/{}.json", base, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let source = HttpSource::builder().build().unwrap();
        assert_eq!(source.url(), "http://localhost:9000/sensorData.json");
        assert!(source.auth.is_none());
    }

    #[test]
    fn test_builder_custom() {
        let source = HttpSource::builder()
            .base_url("https://db.example.com/")
            .path("/devices/watch1/")
            .auth("token")
            .build()
            .unwrap();

        assert_eq!(source.url(), "https://db.example.com/devices/watch1.json");
        assert_eq!(source.auth.as_deref(), Some("token"));
        assert_eq!(source.description(), "http: https://db.example.com/devices/watch1.json");
    }

    #[test]
    fn test_node_url_accepts_json_suffix() {
        assert_eq!(node_url("http://h", "sensorData.json"), "http://h/sensorData.json");
    }

    #[tokio::test]
    async fn test_unreachable_store_is_an_error() {
        let mut source = HttpSource::builder()
            .base_url("http://127.0.0.1:9")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        assert!(source.fetch().await.is_err());
    }
}
