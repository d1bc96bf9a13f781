//! Production `HttpClient` backed by ureq.
//!
//! ureq is blocking, so each request runs on tokio's blocking pool. Status
//! codes are read as data (`http_status_as_error(false)`) and anything
//! outside 2xx is reported as `TransportError::Status`.

use async_trait::async_trait;
use ureq::http;

use crate::error::TransportError;
use crate::http::{HttpClient, HttpRequest, HttpResponse};

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .build()
            .new_agent();
        Self { agent }
    }

    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let name = req.method.as_str();
        let method = http::Method::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::InvalidRequest(format!("method {name:?}: {e}")))?;

        let mut builder = http::Request::builder().method(method).uri(req.url.as_str());
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let result = match req.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))
                .and_then(|r| self.agent.run(r).map_err(into_transport_error)),
            None => builder
                .body(())
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))
                .and_then(|r| self.agent.run(r).map_err(into_transport_error)),
        };
        let mut response = result?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(into_transport_error)?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            url: Some(req.url),
            headers,
            body,
        })
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let transport = self.clone();
        tokio::task::spawn_blocking(move || transport.execute(request))
            .await
            .map_err(|e| TransportError::Network(format!("transport task failed: {e}")))?
    }
}

fn into_transport_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Http(e) => TransportError::InvalidRequest(e.to_string()),
        ureq::Error::BadUri(uri) => TransportError::InvalidRequest(format!("bad uri: {uri}")),
        ureq::Error::Protocol(e) => TransportError::InvalidRequest(e.to_string()),
        other => TransportError::Network(other.to_string()),
    }
}
