//! Programmable transport stub for tests.
//!
//! # Design
//! `MockBackend` implements `HttpClient` without touching the network. Each
//! `send` parks the request as a `MockConnection` on a queue and
//! waits for the test to resolve it. The test pulls connections off the queue,
//! inspects `request()`, then calls `mock_respond` or `mock_error`.
//!
//! A connection that is never resolved never completes, and neither does the
//! subscriber waiting on it. Dropping a connection unresolved behaves the
//! same way; there is no implicit timeout.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::{oneshot, Notify};

use crate::error::TransportError;
use crate::http::{HttpClient, HttpRequest, HttpResponse};

type Reply = Result<HttpResponse, TransportError>;

/// Lifecycle of a `MockConnection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Open,
    Done,
}

/// One intercepted request, waiting for the test to resolve it.
#[derive(Debug)]
pub struct MockConnection {
    request: HttpRequest,
    reply: Option<oneshot::Sender<Reply>>,
}

impl MockConnection {
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn ready_state(&self) -> ReadyState {
        if self.reply.is_some() {
            ReadyState::Open
        } else {
            ReadyState::Done
        }
    }

    /// Complete the connection with `response`.
    pub fn mock_respond(&mut self, response: HttpResponse) {
        self.resolve(Ok(response));
    }

    /// Fail the connection with `error`.
    pub fn mock_error(&mut self, error: TransportError) {
        self.resolve(Err(error));
    }

    fn resolve(&mut self, reply: Reply) {
        match self.reply.take() {
            Some(tx) => {
                // The subscriber may already be gone; nobody is left to notify.
                let _ = tx.send(reply);
            }
            None => tracing::warn!(url = %self.request.url, "connection already resolved"),
        }
    }
}

/// `HttpClient` double that records every request as a `MockConnection`.
#[derive(Debug, Default)]
pub struct MockBackend {
    queue: Mutex<VecDeque<MockConnection>>,
    arrived: Notify,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the next intercepted connection, in send order.
    pub async fn next_connection(&self) -> MockConnection {
        loop {
            if let Some(conn) = self.try_next_connection() {
                return conn;
            }
            self.arrived.notified().await;
        }
    }

    /// Take the next intercepted connection if one is already queued.
    pub fn try_next_connection(&self) -> Option<MockConnection> {
        self.queue().pop_front()
    }

    /// Connections sent but not yet taken off the queue.
    pub fn pending_connections(&self) -> usize {
        self.queue().len()
    }

    fn queue(&self) -> MutexGuard<'_, VecDeque<MockConnection>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl HttpClient for MockBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        tracing::debug!(method = %request.method, url = %request.url, "intercepted connection");
        self.queue().push_back(MockConnection {
            request,
            reply: Some(reply_tx),
        });
        // Stores a permit when nobody is waiting yet.
        self.arrived.notify_one();

        match reply_rx.await {
            Ok(reply) => reply,
            Err(_) => std::future::pending().await,
        }
    }
}
