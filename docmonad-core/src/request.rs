//! Request envelope construction and dispatch.
//!
//! Every call to the remote database is described by a [`RequestEnvelope`]: the
//! [`Target`] it is addressed to, the [`Action`] to perform (which carries its own
//! body), and whether the remote interpreter should record a debug trace.
//!
//! The envelope renders to a single JSON body:
//!
//! ```text
//! { "action": "Monadic", "action_body": { "operations": [ ... ] }, "debug": false }
//! ```
//!
//! and is sent with [`dispatch`], which performs exactly one [`Transport::send`]
//! call. Each action also carries an advisory verb ([`Action::method`]); it is
//! exposed on the rendered [`HttpRequest`] but the wire call always carries the
//! full body.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::{ClientError, ClientResult},
    query::Program,
    transport::Transport,
};

/// Content type attached to every outbound request.
pub const CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// The address and credential a request is sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    url: Url,
    credential: String,
}

impl Target {
    /// Creates a target from an already validated URL and a credential.
    pub fn new(url: Url, credential: impl Into<String>) -> Self {
        Self { url, credential: credential.into() }
    }

    /// Parses `url` as an absolute URL and pairs it with `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `url` is not a valid absolute URL.
    pub fn parse(url: &str, credential: impl Into<String>) -> ClientResult<Self> {
        Ok(Self::new(validate_url(url)?, credential))
    }

    /// The absolute address requests are sent to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The value of the `Authorization` header.
    pub fn credential(&self) -> &str {
        &self.credential
    }
}

/// Checks that `url` is a syntactically valid absolute URL.
///
/// # Errors
///
/// Returns [`ClientError::InvalidUrl`] naming the offending input.
pub fn validate_url(url: &str) -> ClientResult<Url> {
    Url::parse(url).map_err(|e| ClientError::InvalidUrl(format!("{url} is not a valid URL: {e}")))
}

/// The HTTP verb an action semantically corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// A read, such as fetching a document or running a program.
    Get,
    /// A write, such as inserting a document.
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// The database action to perform, together with its body.
///
/// Serializes adjacently tagged, as `"action"` and `"action_body"` fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", content = "action_body")]
pub enum Action {
    /// Fetch a single document by id.
    Document { doc_id: String },
    /// Insert a new document.
    Insert { doc_data: Value },
    /// Replace the data of an existing document.
    Update { doc_id: String, doc_data: Value },
    /// Fetch every document of the collection as `[id, data]` pairs.
    AllDocuments {},
    /// List the collections reachable from the connection.
    CollectionList {},
    /// Create a collection.
    CollectionCreate { name: String },
    /// Run a query program.
    Monadic(Program),
}

impl Action {
    /// The wire name of this action.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Document { .. } => "Document",
            Action::Insert { .. } => "Insert",
            Action::Update { .. } => "Update",
            Action::AllDocuments {} => "AllDocuments",
            Action::CollectionList {} => "CollectionList",
            Action::CollectionCreate { .. } => "CollectionCreate",
            Action::Monadic(_) => "Monadic",
        }
    }

    /// The advisory verb for this action. Reads are `GET`, writes are `POST`.
    pub fn method(&self) -> Method {
        match self {
            Action::Document { .. }
            | Action::AllDocuments {}
            | Action::CollectionList {}
            | Action::Monadic(_) => Method::Get,
            Action::Insert { .. } | Action::Update { .. } | Action::CollectionCreate { .. } => {
                Method::Post
            }
        }
    }
}

/// The complete description of one outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    target: Target,
    action: Action,
    debug: bool,
}

#[derive(Serialize)]
struct WireBody<'a> {
    #[serde(flatten)]
    action: &'a Action,
    debug: bool,
}

impl RequestEnvelope {
    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Returns the JSON body carried by this request.
    pub fn body(&self) -> ClientResult<Value> {
        Ok(serde_json::to_value(WireBody { action: &self.action, debug: self.debug })?)
    }

    /// Renders this envelope into the request handed to a [`Transport`].
    pub fn to_http(&self) -> ClientResult<HttpRequest> {
        Ok(HttpRequest {
            url: self.target.url.clone(),
            method: Method::Post,
            advisory_method: self.action.method(),
            headers: vec![
                ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
                ("Authorization".to_string(), self.target.credential.clone()),
            ],
            body: serde_json::to_string(&WireBody { action: &self.action, debug: self.debug })?,
        })
    }
}

/// Assembles an envelope. No validation happens here.
pub fn build_envelope(target: &Target, action: Action, debug: bool) -> RequestEnvelope {
    RequestEnvelope { target: target.clone(), action, debug }
}

/// A rendered request, ready for a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Resolved address of the collection or connection.
    pub url: Url,
    /// The verb used on the wire. Always [`Method::Post`], since a body is always sent.
    pub method: Method,
    /// The verb the action semantically corresponds to.
    pub advisory_method: Method,
    /// `Content-Type` and `Authorization`, in that order.
    pub headers: Vec<(String, String)>,
    /// JSON body.
    pub body: String,
}

impl HttpRequest {
    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parses the body back into JSON.
    pub fn json_body(&self) -> ClientResult<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Sends `envelope` through `transport` with a single call and returns the decoded body.
///
/// Transport failures are returned as-is; nothing is retried.
pub async fn dispatch<T>(transport: &T, envelope: &RequestEnvelope) -> ClientResult<Value>
where
    T: Transport + ?Sized,
{
    let request = envelope.to_http()?;

    debug!(
        action = envelope.action.name(),
        url = %request.url,
        trace_mode = envelope.debug,
        "dispatching request"
    );

    transport.send(request).await.inspect_err(|e| {
        warn!(action = envelope.action.name(), error = %e, "request failed");
    })
}
