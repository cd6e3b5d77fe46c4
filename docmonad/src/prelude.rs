//! Convenient re-exports of commonly used types from docmonad.
//!
//! ```ignore
//! use docmonad::prelude::*;
//! ```

pub use docmonad_core::{
    connection::{Collection, Connection, ConnectionBuilder, ConnectionConfig},
    query::{Comparator, Monad, Operation, Program, ResultLimit},
    request::{Action, HttpRequest, Method, RequestEnvelope, Target},
    shape::{Mode, Outcome},
    transport::{Transport, TransportBuilder},
    error::{ClientError, ClientResult},
};
