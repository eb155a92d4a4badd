// `browser-config-sync show`: prints the configuration as the store sees it, or one
// value of it addressed by a dotted path.

use crate::libs::{configuration_store::ConfigurationStore, paths};
use crate::logger::{LogLevel, VisualLogger};
use crate::schemas::{browser_config::display_value, config_key::DottedPath};
use anyhow::{Context, Result, bail};
use std::sync::Arc;

pub fn run(config_path: Option<String>, key: Option<String>) -> Result<()> {
    let paths = paths::resolve_paths(config_path, None)
        .context("could not resolve the configuration file location")?;

    let mut store = ConfigurationStore::new(
        &paths.config,
        Arc::new(VisualLogger::new(LogLevel::Warning)),
    );
    store.load();

    let key = key.map(DottedPath::new);
    match render(&store, key.as_ref()) {
        Some(text) => println!("{}", text),
        None => bail!(
            "{} is not set in {}",
            key.map(|k| k.to_string()).unwrap_or_default(),
            paths.config.display()
        ),
    }
    Ok(())
}

/// The whole tree when `key` is `None`, otherwise the value at `key` if present.
fn render(store: &ConfigurationStore, key: Option<&DottedPath>) -> Option<String> {
    match key {
        None => Some(store.to_display_string()),
        Some(path) => store.lookup(path).map(display_value),
    }
}
