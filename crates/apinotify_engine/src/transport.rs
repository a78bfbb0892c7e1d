//! Transport layer abstraction for outbound requests.

use apinotify_model::Method;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

/// A raw reply from the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Value,
}

impl TransportReply {
    /// Creates a reply.
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// Network communication with the remote API.
///
/// This trait abstracts the HTTP layer, allowing different
/// implementations (reqwest, ureq, a message bus, mock for testing).
/// An `Err` is a transport-level failure (connection refused, timeout);
/// a received non-2xx status is an `Ok` reply and is classified by the
/// synchronizer.
pub trait Transport: Send + Sync {
    /// Sends one request and returns the raw reply.
    fn send(&self, address: &str, method: Method, body: &Value) -> Result<TransportReply, String>;
}

/// A request captured by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    /// Target address.
    pub address: String,
    /// HTTP method.
    pub method: Method,
    /// Request body.
    pub body: Value,
}

/// A mock transport for testing.
///
/// Replies are scripted: one-shot replies are consumed in order, then
/// the sticky reply (if set) answers every remaining request. Every
/// request is captured for assertions.
#[derive(Default)]
pub struct MockTransport {
    scripted: Mutex<VecDeque<Result<TransportReply, String>>>,
    sticky: Mutex<Option<Result<TransportReply, String>>>,
    requests: Mutex<Vec<SentRequest>>,
}

impl MockTransport {
    /// Creates a mock with no scripted replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a one-shot successful reply.
    pub fn enqueue_reply(&self, status: u16, body: Value) {
        self.scripted
            .lock()
            .push_back(Ok(TransportReply::new(status, body)));
    }

    /// Queues a one-shot transport failure.
    pub fn enqueue_error(&self, message: impl Into<String>) {
        self.scripted.lock().push_back(Err(message.into()));
    }

    /// Sets the sticky reply used once scripted replies run out.
    pub fn always_reply(&self, status: u16, body: Value) {
        *self.sticky.lock() = Some(Ok(TransportReply::new(status, body)));
    }

    /// Sets a sticky transport failure.
    pub fn always_error(&self, message: impl Into<String>) {
        *self.sticky.lock() = Some(Err(message.into()));
    }

    /// Returns all captured requests, in send order.
    #[must_use]
    pub fn requests(&self) -> Vec<SentRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests sent.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Transport for MockTransport {
    fn send(&self, address: &str, method: Method, body: &Value) -> Result<TransportReply, String> {
        self.requests.lock().push(SentRequest {
            address: address.to_string(),
            method,
            body: body.clone(),
        });

        if let Some(reply) = self.scripted.lock().pop_front() {
            return reply;
        }
        self.sticky
            .lock()
            .clone()
            .unwrap_or_else(|| Err("no mock reply set".to_string()))
    }
}
