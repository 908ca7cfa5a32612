//! Token claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TokenError;

/// Subject claim: the principal identifier.
pub const SUBJECT: &str = "sub";
/// Expiration claim, epoch seconds.
pub const EXPIRES_AT: &str = "exp";
/// Issuance claim, epoch seconds.
pub const ISSUED_AT: &str = "iat";
/// Not-before claim, epoch seconds.
pub const NOT_BEFORE: &str = "nbf";
/// Audience claim.
pub const AUDIENCE: &str = "aud";

/// Claim names owned by the codec rather than by callers.
pub const RESERVED: [&str; 5] = [SUBJECT, EXPIRES_AT, ISSUED_AT, NOT_BEFORE, AUDIENCE];

/// The key/value assertions carried by a token.
///
/// An empty `Claims` is what an unauthenticated request resolves to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build claims from any value that serializes to a JSON object.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self, TokenError> {
        match serde_json::to_value(value) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(Value::Null) => Ok(Self::new()),
            Ok(_) => Err(TokenError::EncodingError(
                "extra claims must serialize to a JSON object".to_string(),
            )),
            Err(e) => Err(TokenError::EncodingError(e.to_string())),
        }
    }

    /// The `sub` claim, when it is a string.
    pub fn subject(&self) -> Option<&str> {
        self.0.get(SUBJECT).and_then(Value::as_str)
    }

    /// The `exp` claim, when it is an integer.
    pub fn expires_at(&self) -> Option<i64> {
        self.0.get(EXPIRES_AT).and_then(Value::as_i64)
    }

    /// The `iat` claim, when it is an integer.
    pub fn issued_at(&self) -> Option<i64> {
        self.0.get(ISSUED_AT).and_then(Value::as_i64)
    }

    /// The `nbf` claim, when it is an integer.
    pub fn not_before(&self) -> Option<i64> {
        self.0.get(NOT_BEFORE).and_then(Value::as_i64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Copy every entry of `other` into `self`, overwriting existing keys.
    pub fn merge(&mut self, other: &Claims) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// The claims minus the codec-owned names.
    pub fn without_reserved(&self) -> Claims {
        Claims(
            self.0
                .iter()
                .filter(|(key, _)| !RESERVED.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Claims {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
