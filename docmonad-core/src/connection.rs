//! Connection and collection handles.
//!
//! A [`Connection`] owns a [`Transport`] together with the base address and API key
//! of the remote database. [`Collection`] handles borrow the connection's transport
//! and resolve to `<base>/<name>`. Both are thin: they only validate their
//! arguments and hand out request builders.
//!
//! # Example
//!
//! ```ignore
//! use docmonad::{prelude::*, memory::InMemoryTransport};
//!
//! let conn = Connection::builder("http://localhost:3000", "API_KEY")
//!     .build(InMemoryTransport::new())?;
//! let users = conn.collection("Users")?;
//!
//! let doc = users.document("DOC_ID")?.get(Mode::Normal).await?;
//! ```

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use crate::{
    action::{
        AllDocumentsRequest, CollectionCreateRequest, CollectionListRequest, DocumentRequest,
        InsertRequest, UpdateRequest,
    },
    error::{ClientError, ClientResult},
    query::Monad,
    request::{Target, validate_url},
    transport::Transport,
};

/// Connection settings that can be loaded from any serde source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Absolute base URL of the database.
    pub url: String,
    /// Credential sent in the `Authorization` header.
    pub api_key: String,
}

impl ConnectionConfig {
    pub fn into_builder<T: Transport>(self) -> ConnectionBuilder<T> {
        ConnectionBuilder::new(self.url, self.api_key)
    }
}

impl<T: Transport> From<ConnectionConfig> for ConnectionBuilder<T> {
    fn from(config: ConnectionConfig) -> Self {
        config.into_builder()
    }
}

/// Builder for [`Connection`].
///
/// The transport type is fixed by [`build`](Self::build).
#[derive(Debug)]
pub struct ConnectionBuilder<T> {
    url: String,
    api_key: String,
    _transport: PhantomData<fn() -> T>,
}

impl<T: Transport> ConnectionBuilder<T> {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { url: url.into(), api_key: api_key.into(), _transport: PhantomData }
    }

    /// Validates the settings and binds them to `transport`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MissingArgument`] if the URL or the API key is empty
    /// - [`ClientError::InvalidUrl`] if the URL is not a valid absolute URL
    pub fn build(self, transport: T) -> ClientResult<Connection<T>> {
        if self.url.is_empty() || self.api_key.is_empty() {
            return Err(ClientError::MissingArgument(
                "a connection needs a URL and an API key".into(),
            ));
        }

        Ok(Connection {
            target: Target::parse(&self.url, self.api_key)?,
            base: self.url,
            transport,
        })
    }
}

/// A connection to a remote document database.
#[derive(Debug)]
pub struct Connection<T: Transport> {
    base: String,
    target: Target,
    transport: T,
}

impl<T: Transport> Connection<T> {
    /// Starts building a connection to `url`, authenticated with `api_key`.
    pub fn builder(url: impl Into<String>, api_key: impl Into<String>) -> ConnectionBuilder<T> {
        ConnectionBuilder::new(url, api_key)
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a handle to the collection `name`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MissingCollectionName`] if `name` is empty
    /// - [`ClientError::InvalidUrl`] if `<base>/<name>` is not a valid URL
    pub fn collection(&self, name: &str) -> ClientResult<Collection<'_, T>> {
        if name.is_empty() {
            return Err(ClientError::MissingCollectionName);
        }

        let base = self.base.strip_suffix('/').unwrap_or(&self.base);
        let url = validate_url(&format!("{base}/{name}"))?;

        Ok(Collection {
            transport: &self.transport,
            name: name.to_string(),
            target: Target::new(url, self.target.credential()),
        })
    }

    /// Lists the collections of this database.
    pub fn collection_list(&self) -> CollectionListRequest<'_, T> {
        CollectionListRequest::new(&self.transport, self.target.clone())
    }

    /// Creates the collection `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingCollectionName`] if `name` is empty.
    pub fn create_collection(&self, name: &str) -> ClientResult<CollectionCreateRequest<'_, T>> {
        if name.is_empty() {
            return Err(ClientError::MissingCollectionName);
        }

        Ok(CollectionCreateRequest::new(&self.transport, self.target.clone(), name.to_string()))
    }
}

/// A handle to one collection of a [`Connection`].
pub struct Collection<'a, T: Transport> {
    transport: &'a T,
    name: String,
    target: Target,
}

impl<'a, T: Transport> Clone for Collection<'a, T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport,
            name: self.name.clone(),
            target: self.target.clone(),
        }
    }
}

impl<'a, T: Transport> std::fmt::Debug for Collection<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("url", &self.target.url().as_str())
            .finish()
    }
}

impl<'a, T: Transport> Collection<'a, T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Fetches a single document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingArgument`] if `document_id` is empty.
    pub fn document(&self, document_id: &str) -> ClientResult<DocumentRequest<'a, T>> {
        if document_id.is_empty() {
            return Err(ClientError::MissingArgument(
                "the document id of the document to fetch".into(),
            ));
        }

        Ok(DocumentRequest::new(self.transport, self.target.clone(), document_id.to_string()))
    }

    /// Fetches every document of this collection, keyed by id.
    pub fn all_documents(&self) -> AllDocumentsRequest<'a, T> {
        AllDocumentsRequest::new(self.transport, self.target.clone())
    }

    /// Starts an empty query program over this collection.
    pub fn monadic(&self) -> Monad<'a, T> {
        Monad::new(self.transport, self.target.clone())
    }

    /// Inserts a new document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Serialization`] if `data` cannot be represented as JSON.
    pub fn insert_doc(&self, data: impl Serialize) -> ClientResult<InsertRequest<'a, T>> {
        Ok(InsertRequest::new(self.transport, self.target.clone(), serde_json::to_value(data)?))
    }

    /// Replaces the data of the document `document_id`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MissingArgument`] if `document_id` is empty
    /// - [`ClientError::Serialization`] if `data` cannot be represented as JSON
    pub fn update_doc(
        &self,
        document_id: &str,
        data: impl Serialize,
    ) -> ClientResult<UpdateRequest<'a, T>> {
        if document_id.is_empty() {
            return Err(ClientError::MissingArgument(
                "the document id of the document to update".into(),
            ));
        }

        Ok(UpdateRequest::new(
            self.transport,
            self.target.clone(),
            document_id.to_string(),
            serde_json::to_value(data)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpRequest;
    use async_trait::async_trait;
    use serde_json::Value;

    #[derive(Debug)]
    struct Null;

    #[async_trait]
    impl Transport for Null {
        async fn send(&self, _request: HttpRequest) -> ClientResult<Value> {
            Ok(Value::Null)
        }
    }

    fn connect(url: &str) -> ClientResult<Connection<Null>> {
        Connection::builder(url, "API_KEY").build(Null)
    }

    #[test]
    fn requires_url_and_api_key() {
        assert!(matches!(connect(""), Err(ClientError::MissingArgument(_))));
        assert!(matches!(
            Connection::builder("http://localhost:3000", "").build(Null),
            Err(ClientError::MissingArgument(_))
        ));
        assert!(matches!(connect("localhost 3000"), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn collection_url_joins_base_and_name() {
        let conn = connect("http://localhost:3000/").unwrap();
        let users = conn.collection("Users").unwrap();

        assert_eq!(users.name(), "Users");
        assert_eq!(users.target().url().as_str(), "http://localhost:3000/Users");
        assert_eq!(users.target().credential(), "API_KEY");

        let nested = connect("http://localhost:3000/db").unwrap();
        assert_eq!(
            nested.collection("Users").unwrap().target().url().as_str(),
            "http://localhost:3000/db/Users"
        );
    }

    #[test]
    fn empty_names_and_ids_are_rejected() {
        let conn = connect("http://localhost:3000").unwrap();
        assert!(matches!(conn.collection(""), Err(ClientError::MissingCollectionName)));
        assert!(matches!(conn.create_collection(""), Err(ClientError::MissingCollectionName)));

        let users = conn.collection("Users").unwrap();
        assert!(matches!(users.document(""), Err(ClientError::MissingArgument(_))));
        assert!(matches!(users.update_doc("", 1), Err(ClientError::MissingArgument(_))));
    }

    #[test]
    fn config_deserializes_into_builder() {
        let config: ConnectionConfig = serde_json::from_str(
            r#"{ "url": "http://localhost:3000", "api_key": "API_KEY" }"#,
        )
        .unwrap();

        let conn = ConnectionBuilder::from(config).build(Null).unwrap();
        assert_eq!(conn.target().url().as_str(), "http://localhost:3000/");
    }
}
