//! # Configuration File Schema (`config.json`)
//!
//! This module defines the configuration file consumed by the browser automation
//! runs. The file is a single JSON object:
//!
//! ```json
//! {
//!   "navigationURLs": { "default": "https://example.com" },
//!   "browsers": {
//!     "chrome": {
//!       "executable": "/usr/bin/google-chrome",
//!       "profilePath": "/home/user/.config/google-chrome"
//!     }
//!   }
//! }
//! ```
//!
//! There is no version field. The document is held as the raw, ordered JSON object
//! it was read as, so every value survives a load/commit cycle verbatim: keys this
//! crate does not know about, `null`s, and entries whose type is not what the setup
//! flow would write. [`BrowserProfile`] is a read-only typed view over one
//! `browsers.<id>` entry.

use crate::schemas::config_key::ProfileField;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SUPPORTED BROWSERS
// ============================================================================

/// The fixed set of browsers the setup flow knows how to configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BrowserId {
    Chrome,
    Firefox,
    Opera,
}

impl BrowserId {
    /// Every supported browser, in the order the "all" fan-out visits them.
    pub const ALL: [BrowserId; 3] = [BrowserId::Chrome, BrowserId::Firefox, BrowserId::Opera];

    /// The identifier used as the key under `browsers` in the file.
    pub fn as_str(self) -> &'static str {
        match self {
            BrowserId::Chrome => "chrome",
            BrowserId::Firefox => "firefox",
            BrowserId::Opera => "opera",
        }
    }
}

impl fmt::Display for BrowserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chrome" => Ok(BrowserId::Chrome),
            "firefox" => Ok(BrowserId::Firefox),
            "opera" => Ok(BrowserId::Opera),
            other => Err(format!(
                "unsupported browser '{}', expected one of: chrome, firefox, opera",
                other
            )),
        }
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// The whole configuration tree. Only a top-level JSON object is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument {
    root: Map<String, Value>,
}

impl ConfigDocument {
    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.root
    }

    /// Typed view of `browsers.<id>`, when both levels are JSON objects.
    pub fn browser_profile(&self, id: BrowserId) -> Option<BrowserProfile<'_>> {
        let entry = self
            .root
            .get("browsers")?
            .as_object()?
            .get(id.as_str())?
            .as_object()?;
        Some(BrowserProfile { entry })
    }

    /// True when at least one supported browser has both paths filled in.
    pub fn is_any_browser_configured(&self) -> bool {
        BrowserId::ALL.iter().any(|id| {
            self.browser_profile(*id)
                .is_some_and(|profile| profile.is_configured())
        })
    }
}

/// Read-only view of one browser entry.
#[derive(Debug, Clone, Copy)]
pub struct BrowserProfile<'a> {
    entry: &'a Map<String, Value>,
}

impl<'a> BrowserProfile<'a> {
    /// The raw stored value of `field`, whatever its type.
    pub fn get(&self, field: ProfileField) -> Option<&'a Value> {
        self.entry.get(field.json_name())
    }

    /// The stored value of `field` when it is a string.
    pub fn path(&self, field: ProfileField) -> Option<&'a str> {
        self.get(field).and_then(Value::as_str)
    }

    /// A browser is usable once both paths are filled in.
    pub fn is_configured(&self) -> bool {
        is_filled(self.get(ProfileField::Executable)) && is_filled(self.get(ProfileField::ProfilePath))
    }
}

/// A value counts as filled in unless it is missing, `null`, `false`, zero or an
/// empty string.
pub fn is_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Renders a stored value for messages: strings as-is, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
