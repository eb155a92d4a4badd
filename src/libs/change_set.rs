// Staging area for configuration changes accepted during one setup session.
//
// Entries are only ever added (a later value for the same key replaces the earlier
// one) and are dropped all at once after the store has written them to disk. There
// is intentionally no way to remove a single entry.

use crate::schemas::browser_config::ConfigDocument;
use crate::schemas::config_key::ConfigKey;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Pending, not yet persisted values keyed by their dotted configuration path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferedChangeSet {
    entries: BTreeMap<ConfigKey, String>,
}

impl BufferedChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` as the latest accepted value for `key`.
    pub fn stage(&mut self, key: ConfigKey, value: impl Into<String>) {
        self.entries.insert(key, value.into());
    }

    #[cfg(test)]
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    #[cfg(test)]
    pub fn contains(&self, key: ConfigKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes every staged value over `doc`, last write wins per key.
    pub fn apply_to(&self, doc: &mut ConfigDocument) {
        for (key, value) in &self.entries {
            key.write(doc, value.clone());
        }
    }

    /// Flat `{ "browsers.chrome.executable": "..." }` rendering for log lines.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        Value::Object(map)
    }

    /// Bulk clear; only the store calls this, after a successful persist.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
