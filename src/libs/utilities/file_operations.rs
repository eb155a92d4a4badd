use crate::log_debug;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Writes `data` to `target` atomically.
///
/// The bytes go to a temporary file created next to `target` and the temp file is
/// then renamed over it, so readers only ever see the old or the new contents.
/// Missing parent directories are created first, and an existing target keeps its
/// permissions.
///
/// # Arguments
/// * `target` - Final location of the file.
/// * `data` - The complete new file contents.
///
/// # Returns
/// * `io::Result<()>` - The first I/O error hit while creating, writing or renaming.
pub fn atomic_write(target: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if !parent.exists() {
        log_debug!("[Files] Creating parent directory {}", parent.display());
        fs::create_dir_all(parent)?;
    }

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    if let Ok(existing) = fs::metadata(target) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;

    log_debug!("[Files] Wrote {} bytes to {}", data.len(), target.display());
    Ok(())
}
