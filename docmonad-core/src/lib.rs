//! Client-side query builder and request codec for a remote JSON document database.
//!
//! This crate is the core of the docmonad project and provides:
//!
//! - **Attribute chains** ([`chain`]) - Validation of dot-separated property references
//! - **Query programs** ([`query`]) - The fluent, validated program builder and its operations
//! - **Request codec** ([`request`]) - Envelope construction, wire rendering and dispatch
//! - **Result shaping** ([`shape`]) - Final/trace decoding and the all-documents shaper
//! - **Handles** ([`connection`], [`action`]) - Connections, collections and single-shot actions
//! - **Transport abstraction** ([`transport`]) - The seam where HTTP is plugged in
//! - **Error handling** ([`error`]) - Error types and result types
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
//! let query = users
//!     .monadic()
//!     .map_attrs("doc.a")?
//!     .limit(5)?
//!     .with_id();
//!
//! let trace = query.execute(Mode::Debug).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmonad_core;

pub mod action;
pub mod chain;
pub mod connection;
pub mod error;
pub mod query;
pub mod request;
pub mod shape;
pub mod transport;
