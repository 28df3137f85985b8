//! Out-of-band request metadata and key/value namespacing

use std::collections::HashMap;

/// Transport metadata: each key maps to one or more values
///
/// Iteration order is unspecified, like the transports it models.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: HashMap<String, Vec<String>>,
}

impl Metadata {
    /// Create empty metadata
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value under `key`, keeping earlier values
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// Replace every value under `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), vec![value.into()]);
    }

    /// First value under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key)?.first().map(String::as_str)
    }

    /// Every value under `key`
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of distinct keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All `(key, values)` entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Write key/values into `metadata` under `prefix`
pub fn encode_key_values<'a, I>(metadata: &mut Metadata, prefix: &str, pairs: I)
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    for (key, value) in pairs {
        metadata.append(format!("{prefix}{key}"), value.clone());
    }
}

/// Read back the key/values stored under `prefix`
///
/// Pairs come out sorted by `(key, value)` whatever order the transport
/// delivered them in. Keys without the prefix are ignored.
#[must_use]
pub fn decode_key_values(metadata: &Metadata, prefix: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = metadata
        .iter()
        .filter_map(|(key, values)| key.strip_prefix(prefix).map(|k| (k, values)))
        .flat_map(|(key, values)| values.iter().map(move |v| (key.to_string(), v.clone())))
        .collect();
    pairs.sort();
    pairs
}
