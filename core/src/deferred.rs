//! Cold, single-shot producer of one HTTP response.
//!
//! # Design
//! `Deferred` holds the transport handle and a fully-built request but does
//! no I/O. Every call to `subscribe` returns a fresh future that sends the
//! request once when polled, so the same `Deferred` can be subscribed
//! repeatedly without shared state between subscriptions.

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use crate::error::TransportError;
use crate::http::{HttpClient, HttpRequest, HttpResponse};

/// Future returned by `Deferred::subscribe`.
pub type ResponseFuture =
    Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send>>;

#[derive(Clone)]
pub struct Deferred {
    client: Arc<dyn HttpClient>,
    request: HttpRequest,
}

impl Deferred {
    pub(crate) fn new(client: Arc<dyn HttpClient>, request: HttpRequest) -> Self {
        Self { client, request }
    }

    /// The request each subscription will send.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Start a new, independent execution of the request.
    ///
    /// Nothing is sent until the returned future is polled. The future
    /// resolves with exactly one response or error; errors come back from
    /// the transport unchanged.
    pub fn subscribe(&self) -> ResponseFuture {
        let client = Arc::clone(&self.client);
        let request = self.request.clone();
        Box::pin(async move {
            let method = request.method.clone();
            let url = request.url.clone();
            tracing::debug!(%method, %url, "dispatching request");
            let result = client.send(request).await;
            match &result {
                Ok(response) => {
                    tracing::debug!(%method, %url, status = response.status, "request completed")
                }
                Err(err) => tracing::warn!(%method, %url, error = %err, "request failed"),
            }
            result
        })
    }
}

impl IntoFuture for Deferred {
    type Output = Result<HttpResponse, TransportError>;
    type IntoFuture = ResponseFuture;

    fn into_future(self) -> Self::IntoFuture {
        self.subscribe()
    }
}

impl std::fmt::Debug for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred").field("request", &self.request).finish_non_exhaustive()
    }
}
