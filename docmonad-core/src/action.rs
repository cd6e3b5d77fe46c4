//! Single-shot action requests.
//!
//! Each type here is produced by a [`Connection`](crate::connection::Connection) or
//! [`Collection`](crate::connection::Collection) method and performs exactly one
//! request when its terminal method (`get` or `send`) is awaited. Reads accept a
//! [`Mode`]; writes are always sent with tracing disabled.

use serde_json::Value;
use std::collections::HashMap;

use crate::{
    error::ClientResult,
    request::{Action, Target, build_envelope, dispatch},
    shape::{Mode, Outcome, shape_all_documents},
    transport::Transport,
};

async fn run<T: Transport>(
    transport: &T,
    target: &Target,
    action: Action,
    debug: bool,
) -> ClientResult<Value> {
    dispatch(transport, &build_envelope(target, action, debug)).await
}

/// Fetches one document by id.
#[derive(Debug)]
pub struct DocumentRequest<'a, T: Transport> {
    transport: &'a T,
    target: Target,
    doc_id: String,
}

impl<'a, T: Transport> DocumentRequest<'a, T> {
    pub(crate) fn new(transport: &'a T, target: Target, doc_id: String) -> Self {
        Self { transport, target, doc_id }
    }

    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }

    pub async fn get(&self, mode: Mode) -> ClientResult<Outcome<Value>> {
        let action = Action::Document { doc_id: self.doc_id.clone() };
        let raw = run(self.transport, &self.target, action, mode.is_debug()).await?;
        Outcome::decode(raw, mode, Ok)
    }
}

/// Inserts a document.
#[derive(Debug)]
pub struct InsertRequest<'a, T: Transport> {
    transport: &'a T,
    target: Target,
    doc_data: Value,
}

impl<'a, T: Transport> InsertRequest<'a, T> {
    pub(crate) fn new(transport: &'a T, target: Target, doc_data: Value) -> Self {
        Self { transport, target, doc_data }
    }

    /// Sends the insert. Not idempotent: sending twice inserts twice.
    pub async fn send(&self) -> ClientResult<Value> {
        let action = Action::Insert { doc_data: self.doc_data.clone() };
        run(self.transport, &self.target, action, false).await
    }
}

/// Replaces the data of an existing document.
#[derive(Debug)]
pub struct UpdateRequest<'a, T: Transport> {
    transport: &'a T,
    target: Target,
    doc_id: String,
    doc_data: Value,
}

impl<'a, T: Transport> UpdateRequest<'a, T> {
    pub(crate) fn new(transport: &'a T, target: Target, doc_id: String, doc_data: Value) -> Self {
        Self { transport, target, doc_id, doc_data }
    }

    pub async fn send(&self) -> ClientResult<Value> {
        let action = Action::Update {
            doc_id: self.doc_id.clone(),
            doc_data: self.doc_data.clone(),
        };
        run(self.transport, &self.target, action, false).await
    }
}

/// Fetches every document of a collection.
#[derive(Debug)]
pub struct AllDocumentsRequest<'a, T: Transport> {
    transport: &'a T,
    target: Target,
}

impl<'a, T: Transport> AllDocumentsRequest<'a, T> {
    pub(crate) fn new(transport: &'a T, target: Target) -> Self {
        Self { transport, target }
    }

    /// Returns a map of document id to document data, or the raw trace in debug mode.
    pub async fn get(&self, mode: Mode) -> ClientResult<Outcome<HashMap<String, Value>>> {
        let raw = run(self.transport, &self.target, Action::AllDocuments {}, mode.is_debug()).await?;
        shape_all_documents(raw, mode.is_debug())
    }
}

/// Lists the collections of a connection.
#[derive(Debug)]
pub struct CollectionListRequest<'a, T: Transport> {
    transport: &'a T,
    target: Target,
}

impl<'a, T: Transport> CollectionListRequest<'a, T> {
    pub(crate) fn new(transport: &'a T, target: Target) -> Self {
        Self { transport, target }
    }

    pub async fn get(&self) -> ClientResult<Value> {
        run(self.transport, &self.target, Action::CollectionList {}, false).await
    }
}

/// Creates a collection.
#[derive(Debug)]
pub struct CollectionCreateRequest<'a, T: Transport> {
    transport: &'a T,
    target: Target,
    name: String,
}

impl<'a, T: Transport> CollectionCreateRequest<'a, T> {
    pub(crate) fn new(transport: &'a T, target: Target, name: String) -> Self {
        Self { transport, target, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn send(&self) -> ClientResult<Value> {
        let action = Action::CollectionCreate { name: self.name.clone() };
        run(self.transport, &self.target, action, false).await
    }
}
