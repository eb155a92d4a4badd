// Imports the `Colorize` trait for adding color to console output.
use colored::Colorize;
// Provides `PathBuf` for working with file paths.
use std::path::PathBuf;
// Custom logging macros for various log levels.
use crate::{log_debug, log_error, log_info};
// Imports a utility function to expand the `~` character in paths.
use crate::libs::utilities::path_helpers::expand_tilde;

/// Environment variable that relocates the whole application directory.
pub const CONFIG_DIR_ENV: &str = "BROWSER_CONFIG_SYNC_DIR";

/// Default application directory, holding `configs/config.json` and `logs.txt`.
const DEFAULT_APP_DIR: &str = "~/.browser-config-sync";

/// Fully resolved locations of the files this tool touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub config: PathBuf,
    pub log_file: PathBuf,
}

/// Determines the absolute paths of the configuration file and the log file.
///
/// Resolution order for each file: explicit flag, then `$BROWSER_CONFIG_SYNC_DIR`,
/// then `~/.browser-config-sync`.
///
/// # Arguments
/// * `config_path`: User-provided path to `config.json`.
/// * `log_path`: User-provided path to the log file.
///
/// # Returns
/// `None` if a path resolves to an empty string, indicating a critical error.
pub fn resolve_paths(config_path: Option<String>, log_path: Option<String>) -> Option<ResolvedPaths> {
    let env_dir = std::env::var(CONFIG_DIR_ENV).ok().filter(|d| !d.is_empty());
    resolve_paths_with(config_path, log_path, env_dir)
}

/// Same as [`resolve_paths`] with the environment directory passed in.
pub fn resolve_paths_with(
    config_path: Option<String>,
    log_path: Option<String>,
    env_dir: Option<String>,
) -> Option<ResolvedPaths> {
    log_debug!("Entering resolve_paths() function.");
    log_debug!("Initial config_path parameter: {:?}", config_path);
    log_debug!("Initial log_path parameter: {:?}", log_path);

    let app_dir = match &env_dir {
        Some(dir) => {
            log_debug!("Using {} environment variable: {}", CONFIG_DIR_ENV, dir);
            expand_tilde(dir)
        }
        None => expand_tilde(DEFAULT_APP_DIR),
    };

    let config = match config_path.as_deref() {
        Some(path) => expand_tilde(path),
        None => app_dir.join("configs").join("config.json"),
    };
    let log_file = match log_path.as_deref() {
        Some(path) => expand_tilde(path),
        None => app_dir.join("logs.txt"),
    };

    log_info!("Using configuration file: {}", config.display().to_string().cyan());
    log_debug!("Writing logs to: {}", log_file.display().to_string().yellow());

    if config.as_os_str().is_empty() || log_file.as_os_str().is_empty() {
        log_error!("Resolved config or log path is empty. This is an internal error.");
        return None;
    }

    log_debug!("Exiting resolve_paths() function.");
    Some(ResolvedPaths { config, log_file })
}
