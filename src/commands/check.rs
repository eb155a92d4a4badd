// `browser-config-sync check`: the gate an automation run goes through before it
// launches a browser. The configuration must load cleanly, carry a default
// navigation URL, and have at least one browser whose stored paths still pass
// validation.

use crate::libs::{
    configuration_store::{ConfigurationStore, LoadOutcome},
    path_validator::PathValidator,
    paths,
};
use crate::logger::{LogLevel, Logger, VisualLogger};
use crate::schemas::browser_config::{BrowserId, display_value};
use crate::schemas::config_key::ProfileField;
use anyhow::{Context, Result, bail};
use std::sync::Arc;

/// Findings of a configuration check.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub loaded: bool,
    pub default_url: Option<String>,
    /// Browsers whose executable and profile path both exist on disk.
    pub usable: Vec<BrowserId>,
}

impl CheckReport {
    pub fn is_ready(&self) -> bool {
        self.loaded && self.default_url.is_some() && !self.usable.is_empty()
    }
}

pub fn run(config_path: Option<String>) -> Result<()> {
    let paths = paths::resolve_paths(config_path, None)
        .context("could not resolve the configuration file location")?;

    let logger: Arc<dyn Logger> = Arc::new(VisualLogger::new(LogLevel::Info));
    let mut store = ConfigurationStore::new(&paths.config, logger.clone());
    let outcome = store.load();

    let report = inspect(&store, &outcome, logger.as_ref());
    if !report.is_ready() {
        bail!("{} is not ready for an automation run", paths.config.display());
    }
    logger.success("Configuration is ready for an automation run.");
    Ok(())
}

/// Checks a loaded store and reports every problem on `logger`.
pub fn inspect(store: &ConfigurationStore, outcome: &LoadOutcome, logger: &dyn Logger) -> CheckReport {
    let mut report = CheckReport {
        loaded: *outcome == LoadOutcome::Loaded,
        ..Default::default()
    };

    if let LoadOutcome::Malformed(detail) = outcome {
        logger.error(&format!("Configuration file could not be used: {}", detail));
    }

    match store.default_navigation_url() {
        Some(url) => {
            let url = display_value(url);
            logger.info(&format!("Default navigation URL: {}", url));
            report.default_url = Some(url);
        }
        None => logger.error("Default navigation URL is missing in the configuration file."),
    }

    for browser in BrowserId::ALL {
        let Some(profile) = store.browser_profile(browser).filter(|p| p.is_configured()) else {
            logger.info(&format!("{} is not configured.", browser));
            continue;
        };

        let (Some(executable), Some(profile_path)) = (
            profile.path(ProfileField::Executable),
            profile.path(ProfileField::ProfilePath),
        ) else {
            logger.warning(&format!(
                "{} is configured but its stored paths are not strings.",
                browser
            ));
            continue;
        };

        let executable_ok = PathValidator::validate(executable, true, logger);
        let profile_ok = PathValidator::validate(profile_path, false, logger);

        if executable_ok && profile_ok {
            logger.success(&format!("{} is configured and usable.", browser));
            report.usable.push(browser);
        } else {
            logger.warning(&format!(
                "{} is configured but its stored paths no longer validate.",
                browser
            ));
        }
    }

    if report.usable.is_empty() {
        logger.error("No configured browser is usable. Run `browser-config-sync setup` first.");
    }
    report
}
