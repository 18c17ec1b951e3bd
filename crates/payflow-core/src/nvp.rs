//! # Name-Value-Pair Wire Codec
//!
//! The gateway speaks `KEY1=value1&KEY2=value2`: pairs joined by `&`, key and
//! value joined by `=`, with **no** percent-encoding in either direction.
//! A value containing `&` or `=` therefore cannot be represented faithfully;
//! the payload setters strip such characters before they reach this module.
//!
//! [`NvpMap`] is the ordered, unique-key mapping used for both request
//! payloads and decoded responses.

use serde::ser::{Serialize, SerializeMap, Serializer};
use zeroize::Zeroize;

/// An insertion-ordered map of NVP keys to values.
///
/// Inserting an existing key replaces its value in place, so a key appears
/// at most once and keeps the position of its first insertion. Payloads hold
/// a few dozen entries, so lookups are a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NvpMap {
    entries: Vec<(String, String)>,
}

impl NvpMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite every value's memory with zeros and clear the map.
    pub(crate) fn zeroize_values(&mut self) {
        for (_, value) in &mut self.entries {
            value.zeroize();
        }
        self.entries.clear();
    }

    /// Serialize to the wire form: `K=v` pairs joined by `&`, no trailing
    /// separator, no escaping.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out
    }

    /// Decode a wire string.
    ///
    /// Splits on `&`, then each token on its **first** `=`. Empty tokens are
    /// skipped, a token without `=` becomes a key with an empty value, and a
    /// repeated key keeps the last value seen.
    pub fn decode(wire: &str) -> Self {
        let mut map = Self::new();
        for token in wire.split('&').filter(|t| !t.is_empty()) {
            let (key, value) = token.split_once('=').unwrap_or((token, ""));
            map.insert(key, value);
        }
        map
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NvpMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for NvpMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
