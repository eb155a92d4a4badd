// This module owns the configuration file (`config.json`) consumed by the browser
// automation runs. It loads the file into an ordered JSON document, merges staged
// changes into it and writes it back to disk.
//
// Key behaviours:
// - A missing file is the normal first-run state: empty tree plus a warning.
// - Content that is not a JSON object also yields an empty tree, but is reported as
//   an error, and `load()` returns `LoadOutcome::Malformed` so callers can tell the
//   two apart. Any well-formed object loads, whatever the shape of its values.
// - Commits write atomically. A failed write keeps the staged changes so the
//   commit can be retried without asking the operator again.

use crate::libs::change_set::BufferedChangeSet;
use crate::libs::utilities::file_operations::atomic_write;
use crate::log_debug;
use crate::logger::Logger;
use crate::schemas::browser_config::{BrowserId, BrowserProfile, ConfigDocument, is_filled};
use crate::schemas::config_key::{ConfigKey, DottedPath};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Failures surfaced by [`ConfigurationStore::commit`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write configuration file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What `load()` found on disk. The in-memory tree is empty for every variant
/// except `Loaded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Absent,
    Malformed(String),
    Loaded,
}

/// Authoritative in-memory configuration plus its on-disk location.
pub struct ConfigurationStore {
    path: PathBuf,
    document: ConfigDocument,
    logger: Arc<dyn Logger>,
}

impl ConfigurationStore {
    /// Creates a store for `path` with an empty tree. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>, logger: Arc<dyn Logger>) -> Self {
        Self {
            path: path.into(),
            document: ConfigDocument::default(),
            logger,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Reads the configuration file, replacing the in-memory tree.
    pub fn load(&mut self) -> LoadOutcome {
        self.logger.info(&format!(
            "Resolved config file path: {}",
            self.path.display()
        ));

        let (document, outcome) = match fs::read_to_string(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.logger.warning(&format!(
                    "Configuration file does not exist at: {}",
                    self.path.display()
                ));
                (ConfigDocument::default(), LoadOutcome::Absent)
            }
            Err(e) => self.malformed(e.to_string()),
            Ok(contents) => match serde_json::from_str::<ConfigDocument>(&contents) {
                Ok(document) => {
                    self.logger.success("Configuration loaded successfully.");
                    (document, LoadOutcome::Loaded)
                }
                Err(e) => self.malformed(e.to_string()),
            },
        };

        self.document = document;
        log_debug!("[Store] Loaded configuration:\n{}", self.to_display_string());
        outcome
    }

    fn malformed(&self, detail: String) -> (ConfigDocument, LoadOutcome) {
        self.logger.error(&format!(
            "Error reading configuration file at {}: {}",
            self.path.display(),
            detail
        ));
        (ConfigDocument::default(), LoadOutcome::Malformed(detail))
    }

    /// Merges `changes` into the tree and persists it.
    ///
    /// The merge is applied in memory before the write and is not undone if the
    /// write fails; `changes` is only cleared once the file is on disk.
    pub fn commit(&mut self, changes: &mut BufferedChangeSet) -> Result<(), StoreError> {
        changes.apply_to(&mut self.document);

        self.logger
            .success(&format!("Buffered changes: {}", changes.to_json()));
        self.logger.info(&format!(
            "Attempting to save configuration to: {}",
            self.path.display()
        ));

        match self.persist() {
            Ok(()) => {
                self.logger.success("Configuration file saved successfully.");
                changes.clear();
                Ok(())
            }
            Err(e) => {
                self.logger.error(&format!(
                    "Error saving configuration file at {}: {}",
                    self.path.display(),
                    e
                ));
                Err(e)
            }
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        let mut serialized = serde_json::to_string_pretty(&self.document)?;
        serialized.push('\n');
        atomic_write(&self.path, serialized.as_bytes()).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Indented JSON rendering of the current tree.
    pub fn to_display_string(&self) -> String {
        serde_json::to_string_pretty(&self.document).unwrap_or_else(|_| "{}".to_string())
    }

    /// Generic read of any location in the tree.
    pub fn lookup(&self, path: &DottedPath) -> Option<&Value> {
        path.lookup(self.document.root())
    }

    /// Committed value of a writable key, if the key exists. A stored `null`
    /// counts as present.
    pub fn current_value(&self, key: ConfigKey) -> Option<&Value> {
        self.lookup(&key.path())
    }

    pub fn browser_profile(&self, id: BrowserId) -> Option<BrowserProfile<'_>> {
        self.document.browser_profile(id)
    }

    pub fn is_any_browser_configured(&self) -> bool {
        self.document.is_any_browser_configured()
    }

    /// `navigationURLs.default`, when it is filled in.
    pub fn default_navigation_url(&self) -> Option<&Value> {
        self.lookup(&DottedPath::new("navigationURLs.default"))
            .filter(|url| is_filled(Some(*url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{LogLevel, MemoryLogger};
    use serde_json::json;
    use tempfile::tempdir;

    fn store_at(path: &Path) -> (ConfigurationStore, Arc<MemoryLogger>) {
        let logger = MemoryLogger::new();
        (ConfigurationStore::new(path, logger.clone()), logger)
    }

    #[test]
    fn missing_file_is_a_soft_warning() {
        let dir = tempdir().unwrap();
        let (mut store, logger) = store_at(&dir.path().join("config.json"));

        assert_eq!(store.load(), LoadOutcome::Absent);
        assert_eq!(store.document(), &ConfigDocument::default());
        assert!(logger.has(LogLevel::Warning, "does not exist"));
        assert_eq!(logger.count(LogLevel::Error), 0);
    }

    #[test]
    fn malformed_file_is_an_error_and_yields_empty_tree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let (mut store, logger) = store_at(&path);

        assert!(matches!(store.load(), LoadOutcome::Malformed(_)));
        assert_eq!(store.to_display_string(), "{}");
        assert!(logger.has(LogLevel::Error, "Error reading configuration file"));
    }

    #[test]
    fn load_replaces_previous_tree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"browsers":{"chrome":{"executable":"/a","profilePath":"/b"}}}"#)
            .unwrap();
        let (mut store, _) = store_at(&path);
        assert_eq!(store.load(), LoadOutcome::Loaded);
        assert!(store.is_any_browser_configured());

        fs::write(&path, "[]").unwrap();
        assert!(matches!(store.load(), LoadOutcome::Malformed(_)));
        assert!(!store.is_any_browser_configured());
    }

    #[test]
    fn persisted_tree_loads_back_identically() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let original = json!({
            "navigationURLs": { "default": "https://example.com" },
            "browsers": {
                "firefox": { "executable": "/usr/bin/firefox", "profilePath": "/p", "extra": [1, true, null] }
            },
            "retries": 3,
            "nested": { "deep": { "er": 1.5 } }
        });
        fs::write(&path, original.to_string()).unwrap();

        let (mut store, _) = store_at(&path);
        store.load();
        store.commit(&mut BufferedChangeSet::new()).unwrap();

        let (mut reloaded, _) = store_at(&path);
        assert_eq!(reloaded.load(), LoadOutcome::Loaded);
        assert_eq!(serde_json::to_value(reloaded.document()).unwrap(), original);
    }

    #[test]
    fn commit_merges_clears_and_writes_pretty_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("configs").join("config.json");
        let (mut store, logger) = store_at(&path);
        store.load();

        let mut changes = BufferedChangeSet::new();
        changes.stage(ConfigKey::executable(BrowserId::Chrome), "/usr/bin/chrome");
        store.commit(&mut changes).unwrap();

        assert!(changes.is_empty());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  \"browsers\": {"));
        assert_eq!(
            serde_json::from_str::<Value>(&written).unwrap(),
            json!({ "browsers": { "chrome": { "executable": "/usr/bin/chrome" } } })
        );
        assert!(logger.has(LogLevel::Success, "Configuration file saved successfully."));
    }

    #[test]
    fn failed_write_keeps_changes_and_in_memory_merge() {
        let dir = tempdir().unwrap();
        // The configuration path is occupied by a directory, so the rename fails.
        let path = dir.path().join("config.json");
        fs::create_dir(&path).unwrap();
        let (mut store, logger) = store_at(&path);

        let mut changes = BufferedChangeSet::new();
        changes.stage(ConfigKey::profile_path(BrowserId::Opera), "/home/u/.opera");
        let before = changes.clone();

        let result = store.commit(&mut changes);
        assert!(matches!(result, Err(StoreError::Write { .. })));
        assert_eq!(changes, before);
        assert_eq!(
            store.current_value(ConfigKey::profile_path(BrowserId::Opera)),
            Some(&json!("/home/u/.opera"))
        );
        assert!(logger.has(LogLevel::Error, "Error saving configuration file"));
    }

    #[test]
    fn lookup_reaches_any_key_and_sees_nulls() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"navigationURLs":{"default":"https://x.y"},"browsers":{"chrome":{"executable":null}}}"#,
        )
        .unwrap();
        let (mut store, _) = store_at(&path);
        store.load();

        assert_eq!(
            store.lookup(&DottedPath::from("navigationURLs.default")),
            Some(&json!("https://x.y"))
        );
        assert_eq!(
            store.current_value(ConfigKey::executable(BrowserId::Chrome)),
            Some(&Value::Null)
        );
        assert_eq!(store.current_value(ConfigKey::profile_path(BrowserId::Chrome)), None);
        assert_eq!(store.default_navigation_url(), Some(&json!("https://x.y")));
    }

    #[test]
    fn well_formed_objects_of_any_shape_survive_a_commit() {
        let trees = [
            json!({ "browsers": null, "keep": 1 }),
            json!({ "browsers": { "chrome": { "executable": 42 } }, "keep": { "a": 1 } }),
            json!({ "navigationURLs": "https://x", "timeouts": { "nav": 30 } }),
            json!({ "browsers": { "chrome": "oops", "firefox": { "executable": null } } }),
        ];

        for tree in trees {
            let dir = tempdir().unwrap();
            let path = dir.path().join("config.json");
            fs::write(&path, tree.to_string()).unwrap();

            let (mut store, logger) = store_at(&path);
            assert_eq!(store.load(), LoadOutcome::Loaded, "{}", tree);
            assert_eq!(logger.count(LogLevel::Error), 0);

            store.commit(&mut BufferedChangeSet::new()).unwrap();
            let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(written, tree);
        }
    }

    #[test]
    fn staging_over_a_string_section_keeps_unrelated_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"browsers":"legacy","navigationURLs":"https://x","keep":[1]}"#).unwrap();
        let (mut store, _) = store_at(&path);
        assert_eq!(store.load(), LoadOutcome::Loaded);
        assert_eq!(store.default_navigation_url(), None);

        let mut changes = BufferedChangeSet::new();
        changes.stage(ConfigKey::executable(BrowserId::Firefox), "/usr/bin/firefox");
        store.commit(&mut changes).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            json!({
                "browsers": { "firefox": { "executable": "/usr/bin/firefox" } },
                "navigationURLs": "https://x",
                "keep": [1]
            })
        );
    }
}
