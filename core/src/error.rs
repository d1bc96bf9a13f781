//! Error types for the API client.
//!
//! # Design
//! `ApiService` never matches on `TransportError`; it only forwards it. The
//! variants exist so transports can say what went wrong and callers can
//! log it, not so the wrapper can branch on them.

use thiserror::Error;

/// Failure reported by an `HttpClient` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection, DNS, TLS or IO failure before a response was read.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The transport refused to build the request (e.g. a method name that is
    /// not a valid HTTP token).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A failure injected by a test double.
    #[error("{0}")]
    Mocked(String),
}

/// Errors raised while constructing an `ApiService`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("endpoint must not be empty")]
    EmptyEndpoint,
}
