//! Remote JSON sources for layer data and color scales.
//!
//! Layers never talk to the network directly; the orchestrator hands their
//! [`FetchRequest`](crate::FetchRequest) URLs to a [`GeoJsonSource`]:
//! - [`HttpSource`]: plain GET over `reqwest`, relative URLs resolved against a base
//! - [`MemorySource`]: canned responses keyed by URL, for tests and offline demos

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tokio::sync::RwLock;

/// Error type for source operations.
#[derive(Debug)]
pub struct SourceError {
    pub url: String,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.url)
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl SourceError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        url: impl Into<String>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Anything that can answer a GET with a JSON document.
///
/// Methods return boxed futures for dyn-compatibility.
pub trait GeoJsonSource: Send + Sync {
    fn fetch_json(&self, url: &str) -> BoxFuture<'_, Result<Value, SourceError>>;
}

/// HTTP source backed by a shared `reqwest::Client`.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Option<reqwest::Url>,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: None,
        }
    }

    /// Resolves relative layer URLs (`/api/parcels`) against `base_url`.
    pub fn with_base_url(base_url: &str) -> Result<Self, SourceError> {
        let base = reqwest::Url::parse(base_url)
            .map_err(|e| SourceError::with_source(base_url, "invalid base URL", e))?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: Some(base),
        })
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn resolve(&self, url: &str) -> Result<reqwest::Url, SourceError> {
        match (reqwest::Url::parse(url), &self.base_url) {
            (Ok(u), _) => Ok(u),
            (Err(_), Some(base)) => base
                .join(url)
                .map_err(|e| SourceError::with_source(url, "cannot resolve URL", e)),
            (Err(e), None) => Err(SourceError::with_source(
                url,
                "relative URL without a base URL",
                e,
            )),
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoJsonSource for HttpSource {
    fn fetch_json(&self, url: &str) -> BoxFuture<'_, Result<Value, SourceError>> {
        let url = url.to_string();
        Box::pin(async move {
            let resolved = self.resolve(&url)?;
            tracing::debug!("GET {resolved}");

            let resp = self
                .client
                .get(resolved)
                .send()
                .await
                .map_err(|e| SourceError::with_source(&url, "HTTP request failed", e))?;

            if !resp.status().is_success() {
                return Err(SourceError::new(
                    &url,
                    format!("HTTP error: {}", resp.status()),
                ));
            }

            resp.json::<Value>()
                .await
                .map_err(|e| SourceError::with_source(&url, "invalid JSON body", e))
        })
    }
}

/// In-memory source for tests or canned demos.
///
/// Lookups try the exact URL first, then the URL with its query string
/// stripped, so one route can answer every bbox variant of a layer URL.
#[derive(Default)]
pub struct MemorySource {
    routes: RwLock<HashMap<String, Result<Value, String>>>,
    log: RwLock<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_response(&self, url: impl Into<String>, body: Value) {
        self.routes.write().await.insert(url.into(), Ok(body));
    }

    pub async fn set_failure(&self, url: impl Into<String>, message: impl Into<String>) {
        self.routes
            .write()
            .await
            .insert(url.into(), Err(message.into()));
    }

    /// Every URL requested so far, in request order.
    pub async fn requests(&self) -> Vec<String> {
        self.log.read().await.clone()
    }
}

impl GeoJsonSource for MemorySource {
    fn fetch_json(&self, url: &str) -> BoxFuture<'_, Result<Value, SourceError>> {
        let url = url.to_string();
        Box::pin(async move {
            self.log.write().await.push(url.clone());

            let routes = self.routes.read().await;
            let path = url.split('?').next().unwrap_or(&url);
            let hit = routes.get(&url).or_else(|| routes.get(path));
            match hit {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(message)) => Err(SourceError::new(&url, message.clone())),
                None => Err(SourceError::new(&url, "HTTP error: 404 Not Found")),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoJsonSource, HttpSource, MemorySource};
    use serde_json::json;

    #[tokio::test]
    async fn memory_source_matches_exact_then_path() {
        let src = MemorySource::new();
        src.set_response("/api/parcels", json!({"k": "path"})).await;
        src.set_response("/api/parcels?year=2015", json!({"k": "exact"}))
            .await;

        let exact = src.fetch_json("/api/parcels?year=2015").await.expect("exact");
        assert_eq!(exact["k"], "exact");
        let by_path = src
            .fetch_json("/api/parcels?in_bbox=1,2,3,4")
            .await
            .expect("path");
        assert_eq!(by_path["k"], "path");

        assert_eq!(src.requests().await.len(), 2);
    }

    #[tokio::test]
    async fn memory_source_reports_failures() {
        let src = MemorySource::new();
        src.set_failure("/api/broken", "HTTP error: 500").await;
        let err = src.fetch_json("/api/broken").await.unwrap_err();
        assert_eq!(err.url, "/api/broken");
        assert!(src.fetch_json("/api/unknown").await.is_err());
    }

    #[test]
    fn http_source_resolves_relative_urls() {
        let src = HttpSource::with_base_url("http://localhost:8000/").expect("base");
        let u = src.resolve("/api/parcels?in_bbox=1,2,3,4").expect("resolve");
        assert_eq!(u.as_str(), "http://localhost:8000/api/parcels?in_bbox=1,2,3,4");
    }

    #[tokio::test]
    async fn http_source_without_base_rejects_relative_urls() {
        let src = HttpSource::new();
        let err = src.fetch_json("/api/parcels").await.unwrap_err();
        assert!(err.message.contains("relative URL"));
    }
}
