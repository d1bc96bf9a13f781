//! Minimal HTTP API client with an injectable transport.
//!
//! # Overview
//! `ApiService` sends a caller-chosen HTTP method to one fixed endpoint. It
//! does no I/O itself: every request goes through the `HttpClient` it was
//! built with, and comes back as a `Deferred` that sends nothing until it is
//! subscribed (or awaited).
//!
//! # Design
//! - `ApiService` holds only its endpoint and an `Arc<dyn HttpClient>`.
//! - `UreqTransport` is the production transport; `testing::MockBackend`
//!   intercepts requests so tests can inspect and resolve them by hand.
//! - Responses and transport errors pass through the service unchanged.

pub mod client;
pub mod deferred;
pub mod error;
pub mod http;
pub mod testing;
pub mod transport;

pub use client::{ApiService, API_URL};
pub use deferred::{Deferred, ResponseFuture};
pub use error::{ConfigError, TransportError};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use transport::UreqTransport;
