#![forbid(unsafe_code)]

//! Evaluation context shared by rules
//!
//! A `Context` is an open bag of named values owned by the caller. Rules read
//! it in their conditions and mutate it in their actions; every mutation is
//! visible to the rules that run after it in the same pass.

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// String-keyed map of dynamically typed values
///
/// Keys are kept sorted so that serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    values: BTreeMap<String, Value>,
}

impl Context {
    /// Creates an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy when seeding a context
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a value, returning the previous one if the key was present
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Removes a key, returning its value if it was present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Returns the value under `key` or a `MissingKey` error
    pub fn require(&self, key: &str) -> Result<&Value, RuleError> {
        self.values
            .get(key)
            .ok_or_else(|| RuleError::MissingKey(key.to_string()))
    }

    /// Returns the value under `key` as an integer
    ///
    /// # Errors
    ///
    /// - `MissingKey` if the key is absent
    /// - `InvalidValue` if the value is not an integer
    pub fn require_i64(&self, key: &str) -> Result<i64, RuleError> {
        let value = self.require(key)?;
        value.as_i64().ok_or_else(|| RuleError::InvalidValue {
            key: key.to_string(),
            message: format!("expected an integer, found {}", value),
        })
    }

    /// Iterates over entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for Context {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
