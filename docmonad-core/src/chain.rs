//! Attribute chain validation.
//!
//! An attribute chain is a dot-separated sequence of identifiers, each matching
//! `[A-Za-z_$][A-Za-z0-9_$]*`. Two forms are accepted:
//!
//! - a *multi* chain names the value flowing through the pipeline followed by at
//!   least one property (`doc.address.city`). The leading token is dropped, only
//!   the property path (`address.city`) is stored.
//! - a *single-or-more* chain may also name the flowing value itself, and keeps
//!   every token.
//!
//! ```ignore
//! use docmonad::chain::validate_multi_chain;
//!
//! let chain = validate_multi_chain("doc.address.city")?;
//! assert_eq!(chain.tokens(), ["address", "city"]);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClientError, ClientResult};

static MULTI_CHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)+$")
        .expect("multi chain grammar is a valid regex")
});

static SINGLE_CHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("single chain grammar is a valid regex")
});

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier grammar is a valid regex")
});

/// A validated, non-empty path of property names.
///
/// Serializes as a JSON array of strings. Deserializing goes through
/// [`TryFrom<Vec<String>>`], so an empty array or a non-identifier token is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct AttributeChain(Vec<String>);

impl AttributeChain {
    /// Returns the tokens of this chain, in order.
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of tokens. Always at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; every constructor rejects an empty chain.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the chain, returning its tokens.
    pub fn into_tokens(self) -> Vec<String> {
        self.0
    }
}

impl TryFrom<Vec<String>> for AttributeChain {
    type Error = ClientError;

    /// Accepts an already split chain, checking every token against the identifier grammar.
    fn try_from(tokens: Vec<String>) -> Result<Self, Self::Error> {
        if tokens.is_empty() {
            return Err(ClientError::MalformedChain(
                "an attribute chain needs at least one token".into(),
            ));
        }

        if let Some(bad) = tokens.iter().find(|token| !IDENTIFIER.is_match(token)) {
            return Err(ClientError::MalformedChain(format!("`{bad}` is not a valid identifier")));
        }

        Ok(Self(tokens))
    }
}

impl From<AttributeChain> for Vec<String> {
    fn from(chain: AttributeChain) -> Self {
        chain.0
    }
}

impl fmt::Display for AttributeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Validates a chain naming the active value followed by at least one property.
///
/// Returns the property tokens, without the leading active value token.
///
/// # Errors
///
/// Returns [`ClientError::MalformedChain`] if `input` has fewer than two tokens
/// or any token is not a valid identifier.
pub fn validate_multi_chain(input: &str) -> ClientResult<AttributeChain> {
    if !MULTI_CHAIN.is_match(input) {
        return Err(ClientError::MalformedChain(format!(
            "expected the active value followed by at least one property, got `{input}`"
        )));
    }

    Ok(AttributeChain(
        input.split('.').skip(1).map(str::to_string).collect(),
    ))
}

/// Validates a chain of one or more identifiers, keeping every token.
///
/// # Errors
///
/// Returns [`ClientError::MalformedChain`] if `input` is empty or any token is
/// not a valid identifier.
pub fn validate_single_chain(input: &str) -> ClientResult<AttributeChain> {
    if !SINGLE_CHAIN.is_match(input) {
        return Err(ClientError::MalformedChain(format!(
            "expected one or more dot-separated identifiers, got `{input}`"
        )));
    }

    Ok(AttributeChain(input.split('.').map(str::to_string).collect()))
}

/// Like [`validate_multi_chain`], failing with [`ClientError::MissingArgument`] on `None`.
pub fn validate_multi_chain_opt(input: Option<&str>) -> ClientResult<AttributeChain> {
    validate_multi_chain(require(input)?)
}

/// Like [`validate_single_chain`], failing with [`ClientError::MissingArgument`] on `None`.
pub fn validate_single_chain_opt(input: Option<&str>) -> ClientResult<AttributeChain> {
    validate_single_chain(require(input)?)
}

fn require(input: Option<&str>) -> ClientResult<&str> {
    input.ok_or_else(|| ClientError::MissingArgument("the attribute chain must be defined".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const IDENT: &str = "[A-Za-z_$][A-Za-z0-9_$]{0,6}";

    #[test]
    fn multi_chain_drops_active_value() {
        let chain = validate_multi_chain("doc.address.city").unwrap();
        assert_eq!(chain.tokens(), ["address", "city"]);
        assert_eq!(chain.to_string(), "address.city");
    }

    #[test]
    fn multi_chain_rejects_single_token_and_garbage() {
        for input in ["", "doc", "doc.", ".a", "doc..a", "doc.1a", "doc.a-b", "doc. a", "doc.a\n"] {
            assert!(
                matches!(validate_multi_chain(input), Err(ClientError::MalformedChain(_))),
                "accepted `{input}`"
            );
        }
    }

    #[test]
    fn identifiers_allow_dollar_and_underscore() {
        let chain = validate_multi_chain("$doc._id.$ref2").unwrap();
        assert_eq!(chain.tokens(), ["_id", "$ref2"]);
    }

    #[test]
    fn single_chain_keeps_every_token() {
        assert_eq!(validate_single_chain("doc").unwrap().tokens(), ["doc"]);
        assert_eq!(validate_single_chain("doc.a.b").unwrap().tokens(), ["doc", "a", "b"]);
        assert!(matches!(validate_single_chain(""), Err(ClientError::MalformedChain(_))));
        assert!(matches!(validate_single_chain("9doc"), Err(ClientError::MalformedChain(_))));
    }

    #[test]
    fn absent_chain_is_missing_argument() {
        assert!(matches!(validate_multi_chain_opt(None), Err(ClientError::MissingArgument(_))));
        assert!(matches!(validate_single_chain_opt(None), Err(ClientError::MissingArgument(_))));
        assert_eq!(validate_multi_chain_opt(Some("d.x")).unwrap().tokens(), ["x"]);
    }

    #[test]
    fn serializes_as_string_array() {
        let chain = validate_multi_chain("doc.a.b").unwrap();
        assert_eq!(serde_json::to_value(&chain).unwrap(), serde_json::json!(["a", "b"]));
    }

    #[test]
    fn deserializing_enforces_the_grammar() {
        use serde_json::json;

        let chain: AttributeChain = serde_json::from_value(json!(["address", "city"])).unwrap();
        assert_eq!(chain.tokens(), ["address", "city"]);

        for input in [json!([]), json!(["1bad"]), json!(["a", "a-b"]), json!(["a.b"]), json!([""])] {
            assert!(
                serde_json::from_value::<AttributeChain>(input.clone()).is_err(),
                "accepted {input}"
            );
        }
    }

    #[test]
    fn try_from_tokens_rejects_empty_and_malformed() {
        assert!(matches!(AttributeChain::try_from(Vec::<String>::new()), Err(ClientError::MalformedChain(_))));
        assert!(matches!(
            AttributeChain::try_from(vec!["ok".to_string(), "1bad".to_string()]),
            Err(ClientError::MalformedChain(_))
        ));
        assert_eq!(AttributeChain::try_from(vec!["$id".to_string()]).unwrap().len(), 1);
    }

    proptest! {
        #[test]
        fn valid_multi_chains_return_suffix(
            head in IDENT,
            rest in proptest::collection::vec(IDENT, 1..5),
        ) {
            let input = format!("{}.{}", head, rest.join("."));
            let chain = validate_multi_chain(&input).unwrap();
            prop_assert_eq!(chain.into_tokens(), rest);
        }

        #[test]
        fn single_identifiers_are_never_multi_chains(ident in IDENT) {
            prop_assert!(validate_multi_chain(&ident).is_err());
            prop_assert!(validate_single_chain(&ident).is_ok());
        }

        #[test]
        fn strings_outside_the_alphabet_are_rejected(input in ".*[^A-Za-z0-9_$.].*") {
            prop_assert!(validate_multi_chain(&input).is_err());
            prop_assert!(validate_single_chain(&input).is_err());
        }
    }
}
