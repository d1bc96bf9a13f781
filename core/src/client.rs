//! The API service: one endpoint, one operation.
//!
//! # Design
//! `ApiService` holds only its endpoint and an injected transport. `request`
//! turns a method name into an `HttpRequest` aimed at the endpoint and wraps
//! it in a `Deferred`; it never validates the method, retries, caches, or
//! looks at the response.

use std::sync::Arc;

use crate::deferred::Deferred;
use crate::error::ConfigError;
use crate::http::{HttpClient, HttpMethod, HttpRequest};

/// Endpoint every `ApiService::new` instance talks to.
pub const API_URL: &str = "https://some_api:4000";

#[derive(Clone)]
pub struct ApiService {
    url: String,
    http: Arc<dyn HttpClient>,
}

impl ApiService {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            url: API_URL.to_string(),
            http,
        }
    }

    /// Build a service pinned to `url` instead of `API_URL`.
    pub fn with_endpoint(http: Arc<dyn HttpClient>, url: &str) -> Result<Self, ConfigError> {
        if url.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        Ok(Self {
            url: url.to_string(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Prepare a `method` request to the endpoint.
    ///
    /// The returned `Deferred` sends exactly one request per subscription.
    pub fn request(&self, method: &str) -> Deferred {
        let request = HttpRequest::new(HttpMethod::parse(method), self.url.clone());
        Deferred::new(Arc::clone(&self.http), request)
    }
}

impl std::fmt::Debug for ApiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiService").field("url", &self.url).finish_non_exhaustive()
    }
}
