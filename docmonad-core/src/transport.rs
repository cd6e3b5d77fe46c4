//! Transport abstraction for delivering requests to the remote database.
//!
//! The library never performs network I/O itself. A [`Transport`] receives one
//! rendered [`HttpRequest`] per terminal call and resolves to the decoded JSON body
//! of the response, or fails with [`ClientError::Transport`] /
//! [`ClientError::Remote`].
//!
//! # Example
//!
//! ```ignore
//! use docmonad::transport::Transport;
//! use docmonad::request::HttpRequest;
//! use docmonad::error::{ClientError, ClientResult};
//! use serde_json::Value;
//!
//! #[derive(Debug)]
//! struct Offline;
//!
//! #[async_trait::async_trait]
//! impl Transport for Offline {
//!     async fn send(&self, request: HttpRequest) -> ClientResult<Value> {
//!         Err(ClientError::Transport(format!("offline, cannot reach {}", request.url)))
//!     }
//! }
//! ```
//!
//! [`ClientError::Transport`]: crate::error::ClientError::Transport
//! [`ClientError::Remote`]: crate::error::ClientError::Remote

use async_trait::async_trait;
use serde_json::Value;
use std::{fmt::Debug, sync::Arc};

use crate::{error::ClientResult, request::HttpRequest};

/// Abstract interface for delivering requests.
///
/// # Contract
///
/// - `send` performs exactly one call for each invocation and does not retry.
/// - The request body must be transmitted whatever [`HttpRequest::advisory_method`] says.
/// - Timeouts and cancellation are the implementer's concern.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Sends `request` and resolves to the decoded JSON response body.
    async fn send(&self, request: HttpRequest) -> ClientResult<Value>;
}

#[async_trait]
impl<'a, T: Transport + ?Sized> Transport for &'a T {
    async fn send(&self, request: HttpRequest) -> ClientResult<Value> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&self, request: HttpRequest) -> ClientResult<Value> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> ClientResult<Value> {
        (**self).send(request).await
    }
}

/// Factory trait for transports that need asynchronous, fallible setup.
///
/// This is the extension point for network transports: an HTTP client that
/// opens a connection pool or loads TLS roots does that work in `build`.
/// `docmonad_memory::InMemoryTransportBuilder` implements it so tests go through
/// the same construction path, even though its own setup never fails.
#[async_trait]
pub trait TransportBuilder {
    type Transport: Transport;

    /// Builds the transport.
    async fn build(self) -> ClientResult<Self::Transport>;
}
