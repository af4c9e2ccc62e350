use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// The kickstart metadata mapping attached to a system (`ks_meta`).
///
/// The server stores this as a single space-joined `key=value` string but
/// reports it back as a struct. This type accepts both shapes and keeps the
/// entries in a `BTreeMap`, so serialization is always sorted lexically by
/// key: re-serializing unchanged metadata is byte-identical, regardless of
/// the order the server reported the entries in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KsMeta(BTreeMap<String, String>);

impl KsMeta {
    /// Creates an empty metadata mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, overwriting any previous value. Other keys
    /// are untouched.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Builds a mapping from whatever the server reported for `ks_meta`:
    /// a struct, a legacy space-joined string, or nothing at all.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(entries) => {
                let mut meta = Self::new();
                for (key, value) in entries {
                    let rendered = match value {
                        Value::String(s) => s.clone(),
                        Value::Bool(b) => b.to_string(),
                        Value::Number(n) => n.to_string(),
                        _ => continue,
                    };
                    meta.set(key.clone(), rendered);
                }
                meta
            }
            Value::String(s) => Self::from_metadata_string(s),
            _ => Self::new(),
        }
    }

    /// Parses a space-joined `key=value` string. Tokens without `=` are
    /// ignored; values may themselves contain `=` (split on the first one).
    #[must_use]
    pub fn from_metadata_string(s: &str) -> Self {
        let mut meta = Self::new();
        for token in s.split_whitespace() {
            if let Some((key, value)) = token.split_once('=') {
                meta.set(key, value);
            }
        }
        meta
    }

    /// Serializes the mapping as the space-joined `key=value` string the
    /// server expects for `modify_system ks_meta`, sorted by key.
    #[must_use]
    pub fn to_metadata_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'de> Deserialize<'de> for KsMeta {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}
