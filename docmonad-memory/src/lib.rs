//! In-memory transport for docmonad.
//!
//! This crate provides a [`Transport`](docmonad_core::transport::Transport) that
//! never touches the network. It records every request and answers from a queue
//! of scripted responses, which makes it the transport of choice for development
//! and tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use docmonad::{prelude::*, memory::InMemoryTransport};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = InMemoryTransport::new();
//!     transport.respond_with(json!(["Ada", "Grace"])).await;
//!
//!     let conn = Connection::builder("http://localhost:3000", "API_KEY").build(&transport)?;
//!     let names = conn
//!         .collection("Users")?
//!         .monadic()
//!         .map_attrs("doc.name")?
//!         .execute(Mode::Normal)
//!         .await?;
//!
//!     println!("{names:?}");
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docmonad_memory;

pub mod transport;

pub use transport::{InMemoryTransport, InMemoryTransportBuilder};
