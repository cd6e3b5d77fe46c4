//! Error types and result types for building and dispatching requests.
//!
//! Build-time errors ([`ClientError::MissingArgument`], [`ClientError::MalformedChain`],
//! [`ClientError::UnknownComparator`], [`ClientError::InvalidLimit`],
//! [`ClientError::MissingCollectionName`], [`ClientError::InvalidUrl`]) are raised
//! before any network activity. Everything else comes out of the codec or the
//! transport. Use [`ClientResult<T>`] as the return type for fallible operations.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use url::ParseError as UrlParseError;

/// Represents all possible errors that can occur when building or sending a request.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A required argument was absent or empty.
    #[error("Missing argument: {0}")]
    MissingArgument(String),
    /// The attribute chain does not match the identifier chain grammar.
    #[error("Malformed attribute chain: {0}")]
    MalformedChain(String),
    /// The comparator is not one of `==`, `<`, `<=`, `>`, `>=`.
    #[error("Unknown comparator: {0}")]
    UnknownComparator(String),
    /// The argument of `limit` is not a finite number greater than zero.
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),
    /// A collection name was required but not given.
    #[error("Missing collection name")]
    MissingCollectionName,
    /// The address is not a syntactically valid absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Converting a request or response to or from JSON failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The response does not have the shape the action promises.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// The transport could not complete the call.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The remote interpreter answered with a failure status.
    #[error("Remote error ({status}): {message}")]
    Remote {
        /// The status code returned by the remote end.
        status: u16,
        /// The failure reason as reported by the remote end.
        message: String,
    },
}

impl ClientError {
    /// Returns `true` for errors raised while validating builder or handle arguments.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ClientError::MissingArgument(_)
                | ClientError::MalformedChain(_)
                | ClientError::UnknownComparator(_)
                | ClientError::InvalidLimit(_)
                | ClientError::MissingCollectionName
                | ClientError::InvalidUrl(_)
        )
    }
}

/// A specialized `Result` type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl From<SerdeJsonError> for ClientError {
    fn from(err: SerdeJsonError) -> Self {
        ClientError::Serialization(err.to_string())
    }
}

impl From<UrlParseError> for ClientError {
    fn from(err: UrlParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}
