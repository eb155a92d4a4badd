// This file contains the logic for the `browser-config-sync setup` command.
// It wires the logger, the configuration store and the operator input together
// and runs one interactive setup session.

use crate::libs::{
    configuration_store::ConfigurationStore,
    paths,
    prompt_gateway::{LineSource, PromptGateway, ScriptedLineSource, TerminalLineSource},
    synchronizer::{ConfigurationSynchronizer, SessionOutcome},
    utilities::path_helpers::expand_tilde,
};
use crate::log_debug;
use crate::logger::{DEFAULT_FLUSH_INTERVAL, LogLevel, Logger, VisualLogger};
use anyhow::{Context, Result, anyhow};
use std::sync::Arc;

/// Main entry point for the `setup` command.
///
/// 1. Resolves the configuration and log file paths.
/// 2. Loads the configuration (missing or broken files start out empty).
/// 3. Runs the setup session against the terminal or an answers file.
/// 4. Offers one retry when the changes could not be written.
/// 5. Reports whether the changes reached the disk.
///
/// # Arguments
/// * `config_path`: Optional custom path to `config.json`.
/// * `log_path`: Optional custom path to the log file.
/// * `answers_path`: Optional file with one scripted answer per line.
pub fn run(
    config_path: Option<String>,
    log_path: Option<String>,
    answers_path: Option<String>,
) -> Result<()> {
    log_debug!("Entered setup::run() function.");

    let paths = paths::resolve_paths(config_path, log_path)
        .context("could not resolve the configuration file location")?;

    let logger = Arc::new(VisualLogger::with_log_file(
        LogLevel::Info,
        paths.log_file.clone(),
        DEFAULT_FLUSH_INTERVAL,
    ));

    let source: Box<dyn LineSource> = match answers_path {
        Some(path) => {
            let path = expand_tilde(&path);
            Box::new(
                ScriptedLineSource::from_file(&path)
                    .with_context(|| format!("failed to read answers file {}", path.display()))?,
            )
        }
        None => Box::new(TerminalLineSource::new()),
    };

    let mut store = ConfigurationStore::new(&paths.config, logger.clone());
    store.load();

    let gateway = PromptGateway::new(source, logger.clone());
    let mut synchronizer = ConfigurationSynchronizer::new(store, gateway, logger.clone());

    let mut outcome = synchronizer.initialize_configuration();
    if matches!(outcome, SessionOutcome::RetryPending(_)) && synchronizer.confirm_retry() {
        outcome = synchronizer.retry_commit();
    }
    log_debug!("Setup session ended in state {:?}", synchronizer.state());

    let result = match outcome {
        SessionOutcome::Skipped => Ok(()),
        SessionOutcome::Committed => {
            logger.success(&format!(
                "Browser configuration written to {}",
                synchronizer.store().path().display()
            ));
            log_debug!("Committed configuration:\n{}", synchronizer.store().to_display_string());
            Ok(())
        }
        SessionOutcome::RetryPending(e) => {
            logger.critical(&format!(
                "{} staged change(s) could not be saved and were not written: {}",
                synchronizer.changes().len(),
                e
            ));
            Err(anyhow!(e).context("configuration was not saved"))
        }
    };

    log_debug!("Exited setup::run() function.");
    result
}
