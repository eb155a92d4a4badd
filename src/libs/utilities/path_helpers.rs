// Our custom logging macros for debug tracing of path resolution.
use crate::log_debug;
// For working with file paths in an OS-agnostic way.
use std::path::PathBuf;

/// Resolves paths that start with a tilde `~`.
/// On Unix-like systems, `~` is a shortcut for the user's home directory.
/// This function expands that `~` into the full, absolute path, like `/home/yourusername/`.
/// Only a bare `~` or a leading `~/` is expanded; `~otheruser/...` is left alone.
///
/// # Arguments
/// * `path`: A string slice (`&str`) representing the path, which might start with `~`.
///
/// # Returns
/// * `PathBuf`: The fully resolved path if `~` was present and the home directory
///   could be determined. Otherwise, it returns the original path unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path != "~" && !path.starts_with("~/") {
        return PathBuf::from(path);
    }
    match dirs::home_dir() {
        Some(home) => match path.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => home,
        },
        None => PathBuf::from(path),
    }
}

/// Expands `~` and `$VARIABLE` references in a user supplied path.
///
/// Operators often paste paths like `$HOME/.mozilla/firefox/abc.default`; those are
/// resolved with `shellexpand`. When a referenced variable is not set the path is
/// returned with only the tilde expanded, and validation will then report it as missing.
pub fn expand_path(path: &str) -> PathBuf {
    let tilde_expanded = expand_tilde(path);
    if !path.contains('$') {
        return tilde_expanded;
    }

    let path_string = tilde_expanded.to_string_lossy().to_string();
    match shellexpand::full(&path_string) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            log_debug!("[Paths] Could not expand variables in {}: {}", path, e);
            tilde_expanded
        }
    }
}
