//! Response decoding and shaping.
//!
//! Whether a response is a final value or a debug trace is decided by the
//! [`Mode`] the caller asked for, never by looking at the response itself.

use serde_json::Value;
use std::collections::HashMap;

use crate::error::{ClientError, ClientResult};

/// Execution mode of a terminal call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Return only the final result.
    #[default]
    Normal,
    /// Ask the remote interpreter to record one state per step and return the trace.
    Debug,
}

impl Mode {
    pub fn is_debug(self) -> bool {
        matches!(self, Mode::Debug)
    }
}

impl From<bool> for Mode {
    fn from(debug: bool) -> Self {
        if debug { Mode::Debug } else { Mode::Normal }
    }
}

/// The decoded result of a terminal call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The final result of the action.
    Final(T),
    /// The recorded intermediate states, returned unshaped.
    Trace(Value),
}

impl<T> Outcome<T> {
    /// Wraps `raw` as a trace in debug mode, otherwise shapes it with `f`.
    pub fn decode(
        raw: Value,
        mode: Mode,
        f: impl FnOnce(Value) -> ClientResult<T>,
    ) -> ClientResult<Self> {
        match mode {
            Mode::Debug => Ok(Outcome::Trace(raw)),
            Mode::Normal => f(raw).map(Outcome::Final),
        }
    }

    pub fn is_trace(&self) -> bool {
        matches!(self, Outcome::Trace(_))
    }

    /// Returns the final value, or `None` for a trace.
    pub fn into_final(self) -> Option<T> {
        match self {
            Outcome::Final(value) => Some(value),
            Outcome::Trace(_) => None,
        }
    }

    /// Returns the trace, or `None` for a final value.
    pub fn into_trace(self) -> Option<Value> {
        match self {
            Outcome::Final(_) => None,
            Outcome::Trace(trace) => Some(trace),
        }
    }
}

/// Shapes the response of the "all documents" action.
///
/// In debug mode `raw` is returned unchanged as a trace. Otherwise it must be a
/// sequence of `[document_id, document_data]` pairs and is collected into a map;
/// on duplicate ids the last pair wins.
///
/// # Errors
///
/// Returns [`ClientError::MalformedResponse`] if `raw` is not a sequence of pairs
/// with string ids.
pub fn shape_all_documents(raw: Value, debug: bool) -> ClientResult<Outcome<HashMap<String, Value>>> {
    Outcome::decode(raw, Mode::from(debug), documents_by_id)
}

fn documents_by_id(raw: Value) -> ClientResult<HashMap<String, Value>> {
    let Value::Array(pairs) = raw else {
        return Err(ClientError::MalformedResponse(format!(
            "expected an array of [id, document] pairs, got {raw}"
        )));
    };

    let mut documents = HashMap::with_capacity(pairs.len());

    for pair in pairs {
        match pair {
            Value::Array(mut entry) if entry.len() == 2 => {
                let data = entry.pop().unwrap_or(Value::Null);
                match entry.pop() {
                    Some(Value::String(id)) => {
                        documents.insert(id, data);
                    }
                    other => {
                        return Err(ClientError::MalformedResponse(format!(
                            "document id must be a string, got {}",
                            other.unwrap_or(Value::Null)
                        )));
                    }
                }
            }
            other => {
                return Err(ClientError::MalformedResponse(format!(
                    "expected an [id, document] pair, got {other}"
                )));
            }
        }
    }

    Ok(documents)
}
