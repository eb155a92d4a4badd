// Addressing for the configuration tree.
//
// `DottedPath` is the generic form (`"navigationURLs.default"`) used for lookups and
// existence checks anywhere in the document. `ConfigKey` is the closed set of paths
// the setup flow is allowed to write; each one renders to its `DottedPath` for reads
// and knows how to set its own field, so staging and committing never do
// stringly-typed deep mutation.

use crate::log_debug;
use crate::schemas::browser_config::{BrowserId, ConfigDocument};
use serde_json::{Map, Value};
use std::fmt;

/// Segment separator for dotted paths.
pub const SEPARATOR: char = '.';

/// A location in the configuration tree, e.g. `browsers.chrome.profilePath`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DottedPath(String);

impl DottedPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Walks `root` segment by segment. Only objects are descended into; a
    /// present `null` is found like any other value.
    pub fn lookup<'a>(&self, root: &'a Map<String, Value>) -> Option<&'a Value> {
        let mut segments = self.segments();
        let first = root.get(segments.next()?)?;
        segments.try_fold(first, |node, segment| node.as_object()?.get(segment))
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DottedPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Which half of a browser profile a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileField {
    Executable,
    ProfilePath,
}

impl ProfileField {
    pub fn json_name(self) -> &'static str {
        match self {
            ProfileField::Executable => "executable",
            ProfileField::ProfilePath => "profilePath",
        }
    }
}

/// A writable configuration location: `browsers.<id>.<field>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey {
    pub browser: BrowserId,
    pub field: ProfileField,
}

impl ConfigKey {
    pub fn executable(browser: BrowserId) -> Self {
        Self { browser, field: ProfileField::Executable }
    }

    pub fn profile_path(browser: BrowserId) -> Self {
        Self { browser, field: ProfileField::ProfilePath }
    }

    pub fn path(&self) -> DottedPath {
        DottedPath::new(self.to_string())
    }

    /// Overwrites this key in `doc` with a string value. Missing `browsers` and
    /// browser entries are created; an intermediate that is not an object is
    /// replaced by one. Sibling keys are left alone.
    pub fn write(&self, doc: &mut ConfigDocument, value: String) {
        let browsers = object_at(doc.root_mut(), "browsers");
        let entry = object_at(browsers, self.browser.as_str());
        entry.insert(self.field.json_name().to_string(), Value::String(value));
    }
}

fn object_at<'a>(parent: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = parent
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        log_debug!("[Config] Replacing non-object value at '{}': {}", key, slot);
        *slot = Value::Object(Map::new());
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "browsers{sep}{}{sep}{}",
            self.browser,
            self.field.json_name(),
            sep = SEPARATOR
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ConfigDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn keys_render_as_dotted_paths() {
        assert_eq!(
            ConfigKey::profile_path(BrowserId::Chrome).to_string(),
            "browsers.chrome.profilePath"
        );
        assert_eq!(
            ConfigKey::executable(BrowserId::Opera).path(),
            DottedPath::from("browsers.opera.executable")
        );
    }

    #[test]
    fn lookup_descends_only_through_objects() {
        let d = doc(json!({
            "navigationURLs": { "default": "https://a.b" },
            "list": [1, 2],
            "browsers": { "chrome": { "executable": null } }
        }));
        assert_eq!(
            DottedPath::from("navigationURLs.default").lookup(d.root()),
            Some(&json!("https://a.b"))
        );
        assert_eq!(DottedPath::from("list.0").lookup(d.root()), None);
        assert_eq!(DottedPath::from("missing.key").lookup(d.root()), None);
        assert_eq!(DottedPath::from("").lookup(d.root()), None);
        assert_eq!(
            ConfigKey::executable(BrowserId::Chrome).path().lookup(d.root()),
            Some(&Value::Null)
        );
    }

    #[test]
    fn write_creates_intermediate_entries_and_keeps_siblings() {
        let mut d = doc(json!({
            "browsers": { "chrome": { "executable": "/usr/bin/chrome", "args": [1] } },
            "keep": true
        }));

        ConfigKey::profile_path(BrowserId::Chrome).write(&mut d, "/home/u/.chrome".into());
        ConfigKey::executable(BrowserId::Opera).write(&mut d, "/usr/bin/opera".into());

        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!({
                "browsers": {
                    "chrome": {
                        "executable": "/usr/bin/chrome",
                        "args": [1],
                        "profilePath": "/home/u/.chrome"
                    },
                    "opera": { "executable": "/usr/bin/opera" }
                },
                "keep": true
            })
        );
    }

    #[test]
    fn write_replaces_non_object_intermediates() {
        let mut d = doc(json!({ "browsers": { "chrome": "legacy", "opera": 1 }, "keep": 1 }));

        ConfigKey::executable(BrowserId::Chrome).write(&mut d, "/c".into());

        assert_eq!(
            serde_json::to_value(&d).unwrap(),
            json!({ "browsers": { "chrome": { "executable": "/c" }, "opera": 1 }, "keep": 1 })
        );
    }
}
