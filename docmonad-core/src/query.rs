//! Query program construction.
//!
//! A query is an ordered [`Program`] of [`Operation`]s that the remote interpreter
//! runs as a pipeline over the documents of a collection. Programs are built with
//! the fluent [`Monad`] builder, obtained from
//! [`Collection::monadic`](crate::connection::Collection::monadic):
//!
//! ```ignore
//! use docmonad::prelude::*;
//!
//! let adults = users
//!     .monadic()
//!     .filter("doc.age", ">=", 18)?
//!     .map_attrs("doc.address.city")?
//!     .limit(10)?
//!     .with_id();
//!
//! let cities = adults.execute(Mode::Normal).await?;
//! ```
//!
//! Each builder method validates its arguments first and returns a *new* builder
//! with one operation appended. The receiver is left untouched, so a rejected
//! call never leaves a half-built program behind.
//!
//! # Operations
//!
//! | Method | Wire op | Payload |
//! |---|---|---|
//! | [`Monad::map_attrs`] | `mapAttrs` | property path |
//! | [`Monad::map_id_to_collection`] | `mapIDToCollection` | collection name |
//! | [`Monad::filter`] | `where` | `{attrs, cmp, val}` |
//! | [`Monad::flat_map_arr`] | `flatMapArr` | none |
//! | [`Monad::limit`] | `limit` | number |
//! | [`Monad::with_id`] | `withID` | none |

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::{fmt, str::FromStr};
use tracing::trace;

use crate::{
    chain::{AttributeChain, validate_multi_chain},
    connection::Collection,
    error::{ClientError, ClientResult},
    request::{Action, RequestEnvelope, Target, build_envelope, dispatch},
    shape::{Mode, Outcome},
    transport::Transport,
};

/// Relational operators accepted by [`Monad::filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
}

impl Comparator {
    /// Every comparator, in declaration order.
    pub const ALL: [Comparator; 5] =
        [Comparator::Eq, Comparator::Lt, Comparator::Lte, Comparator::Gt, Comparator::Gte];

    /// The token used on the wire and in the builder API.
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Eq => "==",
            Comparator::Lt => "<",
            Comparator::Lte => "<=",
            Comparator::Gt => ">",
            Comparator::Gte => ">=",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparator {
    type Err = ClientError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Comparator::ALL
            .into_iter()
            .find(|cmp| cmp.as_str() == token)
            .ok_or_else(|| {
                ClientError::UnknownComparator(format!(
                    "the valid comparators are ==, <, <=, >, >=; got `{token}`"
                ))
            })
    }
}

/// Parses a comparator token. Exact match only.
pub fn validate_comparator(token: &str) -> ClientResult<Comparator> {
    token.parse()
}

/// A result cap: a finite number greater than zero.
///
/// The only way to obtain one is [`TryFrom`], which is also what deserializing goes
/// through, so a [`Program`] can never carry a zero, negative or non-numeric limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Number", try_from = "Number")]
pub struct ResultLimit(Number);

impl ResultLimit {
    /// The number sent on the wire.
    pub fn get(&self) -> &Number {
        &self.0
    }
}

impl TryFrom<Value> for ResultLimit {
    type Error = ClientError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(number) => Self::try_from(number),
            other => Err(invalid_limit(&other)),
        }
    }
}

impl TryFrom<Number> for ResultLimit {
    type Error = ClientError;

    fn try_from(number: Number) -> Result<Self, Self::Error> {
        if number.as_f64().is_some_and(|f| f.is_finite() && f > 0.0) {
            Ok(Self(number))
        } else {
            Err(invalid_limit(&number))
        }
    }
}

impl From<ResultLimit> for Number {
    fn from(limit: ResultLimit) -> Self {
        limit.0
    }
}

fn invalid_limit(got: &dyn fmt::Display) -> ClientError {
    ClientError::InvalidLimit(format!(
        "the argument of limit() must be a number greater than zero, got {got}"
    ))
}

/// One step of a query program.
///
/// Serializes as `{"op": <kind>, "data": <payload>}`; kinds without a payload
/// omit `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data")]
pub enum Operation {
    /// Projects each value onto the named property.
    #[serde(rename = "mapAttrs")]
    MapAttrs(AttributeChain),
    /// Resolves subsequent ids against another collection.
    #[serde(rename = "mapIDToCollection")]
    MapIdToCollection(String),
    /// Keeps values whose property compares true against `val`.
    #[serde(rename = "where")]
    Where {
        attrs: AttributeChain,
        cmp: Comparator,
        val: Value,
    },
    /// Flattens one level of array nesting.
    #[serde(rename = "flatMapArr")]
    FlatMapArr,
    /// Caps the number of results.
    #[serde(rename = "limit")]
    Limit(ResultLimit),
    /// Pairs each value with the id of the document it came from.
    #[serde(rename = "withID")]
    WithId,
}

impl Operation {
    /// The wire name of this operation.
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::MapAttrs(_) => "mapAttrs",
            Operation::MapIdToCollection(_) => "mapIDToCollection",
            Operation::Where { .. } => "where",
            Operation::FlatMapArr => "flatMapArr",
            Operation::Limit(_) => "limit",
            Operation::WithId => "withID",
        }
    }
}

/// An ordered sequence of operations. Order is execution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    operations: Vec<Operation>,
}

impl Program {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// The operations of this program, in execution order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// `true` for a program with no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns a copy of this program with `operation` appended.
    fn with(&self, operation: Operation) -> Self {
        trace!(op = operation.kind(), position = self.operations.len(), "appending operation");

        let mut operations = Vec::with_capacity(self.operations.len() + 1);
        operations.extend_from_slice(&self.operations);
        operations.push(operation);

        Self { operations }
    }
}

impl From<Vec<Operation>> for Program {
    fn from(operations: Vec<Operation>) -> Self {
        Self { operations }
    }
}

/// Fluent builder for a query program bound to one collection.
///
/// Builders are plain values: every method returns a new builder and leaves the
/// receiver unchanged. Executing a builder does not consume it; executing it
/// again sends a new request with the same program.
pub struct Monad<'a, T: Transport> {
    transport: &'a T,
    target: Target,
    program: Program,
}

impl<'a, T: Transport> Clone for Monad<'a, T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport,
            target: self.target.clone(),
            program: self.program.clone(),
        }
    }
}

impl<'a, T: Transport> fmt::Debug for Monad<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monad")
            .field("target", &self.target.url().as_str())
            .field("program", &self.program)
            .finish()
    }
}

impl<'a, T: Transport> Monad<'a, T> {
    pub(crate) fn new(transport: &'a T, target: Target) -> Self {
        Self { transport, target, program: Program::new() }
    }

    fn push(&self, operation: Operation) -> Self {
        Self {
            transport: self.transport,
            target: self.target.clone(),
            program: self.program.with(operation),
        }
    }

    /// The program accumulated so far.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Shorthand for `self.program().operations()`.
    pub fn operations(&self) -> &[Operation] {
        self.program.operations()
    }

    /// The number of operations appended so far.
    pub fn len(&self) -> usize {
        self.program.len()
    }

    /// `true` until the first operation is appended.
    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }

    /// Projects each flowing value onto a property.
    ///
    /// `chain` must name the flowing value and at least one property, e.g.
    /// `doc.address.city`; only `address.city` is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MalformedChain`] if `chain` is not a multi-token chain.
    pub fn map_attrs(&self, chain: &str) -> ClientResult<Self> {
        let attrs = validate_multi_chain(chain)?;
        Ok(self.push(Operation::MapAttrs(attrs)))
    }

    /// Resolves the ids flowing through the pipeline against `collection`.
    pub fn map_id_to_collection<U: Transport>(&self, collection: &Collection<'_, U>) -> Self {
        self.push(Operation::MapIdToCollection(collection.name().to_string()))
    }

    /// Keeps only the values whose property compares true against `value`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::MalformedChain`] if `chain` is not a multi-token chain
    /// - [`ClientError::UnknownComparator`] if `comparator` is not one of `==`, `<`, `<=`, `>`, `>=`
    /// - [`ClientError::Serialization`] if `value` cannot be represented as JSON
    #[doc(alias = "where")]
    pub fn filter(
        &self,
        chain: &str,
        comparator: &str,
        value: impl Serialize,
    ) -> ClientResult<Self> {
        let attrs = validate_multi_chain(chain)?;
        let cmp = validate_comparator(comparator)?;
        let val = serde_json::to_value(value)?;

        Ok(self.push(Operation::Where { attrs, cmp, val }))
    }

    /// Flattens one level of array nesting.
    pub fn flat_map_arr(&self) -> Self {
        self.push(Operation::FlatMapArr)
    }

    /// Caps the number of results at `n`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidLimit`] unless `n` is a finite number greater
    /// than zero. Non-numeric values (strings, `null`, `NaN`) are rejected too.
    pub fn limit(&self, n: impl Into<Value>) -> ClientResult<Self> {
        let limit = ResultLimit::try_from(n.into())?;
        Ok(self.push(Operation::Limit(limit)))
    }

    /// Pairs each flowing value with the id of the document it came from.
    pub fn with_id(&self) -> Self {
        self.push(Operation::WithId)
    }

    /// Builds the request [`execute`](Self::execute) would send, without sending it.
    pub fn build_request(&self, mode: Mode) -> RequestEnvelope {
        build_envelope(&self.target, Action::Monadic(self.program.clone()), mode.is_debug())
    }

    /// Sends the program to the remote interpreter.
    ///
    /// In [`Mode::Debug`] the interpreter records one state per operation and the
    /// result is returned as [`Outcome::Trace`].
    pub async fn execute(&self, mode: Mode) -> ClientResult<Outcome<Value>> {
        let raw = dispatch(self.transport, &self.build_request(mode)).await?;
        Outcome::decode(raw, mode, Ok)
    }
}
