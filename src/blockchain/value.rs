//! Self-describing values exchanged with the node's dynamic call layer.
//!
//! Runtime calls are built from named parameters and their results come back as a
//! tree of maps, variants and primitives. Nothing in a returned tree is trusted
//! until its shape has been checked through the accessors below.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Named fields.
    Map(BTreeMap<String, Value>),
    /// Enum variant with positional payload values.
    Variant { name: String, values: Vec<Value> },
    Bytes(Vec<u8>),
    UInt(u128),
    Text(String),
    Sequence(Vec<Value>),
    /// Unit placeholder, e.g. the payload of `Option::None`.
    None,
}

impl Value {
    /// Build a map from `(name, value)` pairs.
    pub fn map<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Map(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn variant(name: impl Into<String>, values: Vec<Value>) -> Self {
        Value::Variant {
            name: name.into(),
            values,
        }
    }

    /// `Option::None` as the dynamic layer expects it.
    pub fn none_variant() -> Self {
        Value::variant("None", Vec::new())
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Variant name and payload.
    pub fn as_variant(&self) -> Option<(&str, &[Value])> {
        match self {
            Value::Variant { name, values } => Some((name.as_str(), values.as_slice())),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u128> {
        match self {
            Value::UInt(n) => Some(*n),
            _ => None,
        }
    }

    /// Field lookup on a map value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_map().and_then(|fields| fields.get(name))
    }
}

impl From<u128> for Value {
    fn from(n: u128) -> Self {
        Value::UInt(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::UInt(n as u128)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}
