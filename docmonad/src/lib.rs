//! Main docmonad crate providing a validated query builder for a remote document database.
//!
//! This crate is the primary entry point for users of docmonad. It re-exports the
//! core types from `docmonad-core` and the in-memory transport from
//! `docmonad-memory`.
//!
//! # Features
//!
//! - **Validated query programs** - Every builder call checks its arguments before anything is appended
//! - **Closed wire types** - Actions and operations are enums, so malformed envelopes do not typecheck
//! - **Debug traces** - Ask the remote interpreter for one recorded state per operation
//! - **Pluggable transport** - Bring your own HTTP client by implementing [`transport::Transport`]
//!
//! # Quick Start
//!
//! ```ignore
//! use docmonad::{prelude::*, memory::InMemoryTransport};
//!
//! #[tokio::main]
//! async fn main() -> ClientResult<()> {
//!     let conn = Connection::builder("http://localhost:3000", "API_KEY")
//!         .build(InMemoryTransport::new())?;
//!
//!     let users = conn.collection("Users")?;
//!     let posts = conn.collection("Posts")?;
//!
//!     // Titles of the posts written by adult users, at most ten of them
//!     let query = users
//!         .monadic()
//!         .filter("user.age", ">=", 18)?
//!         .map_attrs("user.post_ids")?
//!         .flat_map_arr()
//!         .map_id_to_collection(&posts)
//!         .map_attrs("post.title")?
//!         .limit(10)?;
//!
//!     let titles = query.execute(Mode::Normal).await?;
//!     println!("{titles:?}");
//!
//!     // Same program, with one recorded state per operation
//!     let trace = query.execute(Mode::Debug).await?;
//!     println!("{trace:?}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Single-shot actions
//!
//! ```ignore
//! let users = conn.collection("Users")?;
//!
//! users.insert_doc(json!({ "name": "Ada" }))?.send().await?;
//! users.update_doc("DOC_ID", json!({ "name": "Ada Lovelace" }))?.send().await?;
//! let doc = users.document("DOC_ID")?.get(Mode::Normal).await?;
//! let everything = users.all_documents().get(Mode::Normal).await?;
//!
//! conn.create_collection("Posts")?.send().await?;
//! let names = conn.collection_list().get().await?;
//! ```

pub mod prelude;

pub use docmonad_core::{action, chain, connection, error, query, request, shape, transport};

// Re-exported for implementing `Transport` and building payloads
pub use async_trait::async_trait;
pub use serde_json;

/// In-memory transport implementations.
pub mod memory {
    pub use docmonad_memory::{InMemoryTransport, InMemoryTransportBuilder};
}
