//! In-memory transport implementation.
//!
//! This module provides a transport that never touches the network: it records
//! every request it is given and answers from a queue of scripted responses.

use async_trait::async_trait;
use mea::rwlock::RwLock;
use serde_json::Value;
use std::{collections::VecDeque, sync::Arc};
use tracing::trace;

use docmonad_core::{
    error::{ClientError, ClientResult},
    request::HttpRequest,
    transport::{Transport, TransportBuilder},
};

type ResponseQueue = VecDeque<ClientResult<Value>>;

/// Recording, scriptable transport.
///
/// Each call to [`Transport::send`] appends the request to the log and pops the
/// next scripted response. When the queue is empty the transport answers with
/// `null`.
///
/// # Thread Safety
///
/// `InMemoryTransport` is cloneable and uses `Arc`-wrapped state; clones share
/// the same request log and response queue.
///
/// # Example
///
/// ```ignore
/// use docmonad_memory::InMemoryTransport;
/// use serde_json::json;
///
/// let transport = InMemoryTransport::new();
/// transport.respond_with(json!([["id1", { "x": 1 }]])).await;
///
/// // ... hand `transport` to a connection and run a request ...
///
/// let sent = transport.last_request().await.unwrap();
/// assert_eq!(sent.header("Authorization"), Some("API_KEY"));
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryTransport {
    /// Every request sent so far, in order
    requests: Arc<RwLock<Vec<HttpRequest>>>,
    /// Responses handed out by upcoming calls, front first
    responses: Arc<RwLock<ResponseQueue>>,
}

impl InMemoryTransport {
    /// Creates a transport with an empty log and no scripted responses.
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(ResponseQueue::new())),
        }
    }

    /// Creates a builder for scripting responses up front.
    pub fn builder() -> InMemoryTransportBuilder {
        InMemoryTransportBuilder::default()
    }

    /// Queues a successful response.
    pub async fn respond_with(&self, value: Value) {
        self.responses.write().await.push_back(Ok(value));
    }

    /// Queues a failure.
    pub async fn fail_with(&self, error: ClientError) {
        self.responses.write().await.push_back(Err(error));
    }

    /// Returns every request sent so far.
    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.read().await.clone()
    }

    /// Returns the most recent request, if any.
    pub async fn last_request(&self) -> Option<HttpRequest> {
        self.requests.read().await.last().cloned()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Returns the JSON bodies of every request sent so far.
    pub async fn bodies(&self) -> ClientResult<Vec<Value>> {
        self.requests
            .read()
            .await
            .iter()
            .map(HttpRequest::json_body)
            .collect()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<Value> {
        trace!(url = %request.url, method = %request.method, "recording request");

        self.requests.write().await.push(request);

        self.responses
            .write()
            .await
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

/// Builder for constructing [`InMemoryTransport`] instances with scripted responses.
///
/// # Example
///
/// ```ignore
/// use docmonad_memory::InMemoryTransport;
/// use docmonad::transport::TransportBuilder;
///
/// let transport = InMemoryTransport::builder()
///     .respond_with(serde_json::json!(["Users", "Posts"]))
///     .build()
///     .await?;
/// ```
#[derive(Default)]
pub struct InMemoryTransportBuilder {
    responses: ResponseQueue,
}

impl InMemoryTransportBuilder {
    /// Queues a successful response.
    pub fn respond_with(mut self, value: Value) -> Self {
        self.responses.push_back(Ok(value));
        self
    }

    /// Queues a failure.
    pub fn fail_with(mut self, error: ClientError) -> Self {
        self.responses.push_back(Err(error));
        self
    }
}

#[async_trait]
impl TransportBuilder for InMemoryTransportBuilder {
    type Transport = InMemoryTransport;

    /// Builds the transport with the scripted responses queued in order.
    async fn build(self) -> ClientResult<Self::Transport> {
        Ok(InMemoryTransport {
            requests: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(self.responses)),
        })
    }
}
