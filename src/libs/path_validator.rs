// Existence and file-kind checks for paths typed in by the operator.
//
// Executables must be regular files. Profile paths only have to exist: a profile
// can be a directory, a symlink to one, or whatever the browser accepts, so no
// kind is enforced for them.

use crate::libs::utilities::path_helpers::expand_path;
use crate::logger::Logger;
use std::fs;
use std::path::Path;

/// What a path has to be for it to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRequirement {
    /// The path only has to exist.
    Exists,
    /// The path must exist and be a regular file.
    RegularFile,
}

impl PathRequirement {
    pub fn from_require_regular_file(require_regular_file: bool) -> Self {
        if require_regular_file {
            PathRequirement::RegularFile
        } else {
            PathRequirement::Exists
        }
    }
}

/// Outcome of a path check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    Valid,
    /// Nothing at that location (or it could not be stat'ed).
    Missing,
    /// Something exists but it is not the required kind, e.g. a directory given
    /// as an executable.
    WrongKind,
}

impl PathStatus {
    pub fn is_valid(self) -> bool {
        self == PathStatus::Valid
    }
}

/// Classifies `path` against `requirement` without logging.
pub fn classify(path: &Path, requirement: PathRequirement) -> PathStatus {
    if path.as_os_str().is_empty() {
        return PathStatus::Missing;
    }
    match fs::metadata(path) {
        Err(_) => PathStatus::Missing,
        Ok(meta) if requirement == PathRequirement::RegularFile && !meta.is_file() => {
            PathStatus::WrongKind
        }
        Ok(_) => PathStatus::Valid,
    }
}

/// Stateless path gate used before a value is staged.
pub struct PathValidator;

impl PathValidator {
    /// Checks the operator supplied `raw_path` (after `~`/`$VAR` expansion) and
    /// reports the result on `logger`: missing paths as warnings, wrong kinds as
    /// errors, accepted paths as info.
    pub fn validate(raw_path: &str, require_regular_file: bool, logger: &dyn Logger) -> bool {
        let requirement = PathRequirement::from_require_regular_file(require_regular_file);
        let path = expand_path(raw_path);

        let status = classify(&path, requirement);
        match status {
            PathStatus::Missing => logger.warning(&format!(
                "Validation failed - Path does not exist: {}",
                path.display()
            )),
            PathStatus::WrongKind => logger.error(&format!(
                "Expected an executable file, but found: {}",
                path.display()
            )),
            PathStatus::Valid => {
                logger.info(&format!("Path validation successful: {}", path.display()))
            }
        }
        status.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{LogLevel, MemoryLogger};
    use tempfile::tempdir;

    #[test]
    fn missing_path_is_a_warning() {
        let logger = MemoryLogger::new();
        assert!(!PathValidator::validate("/definitely/not/here", true, logger.as_ref()));
        assert!(logger.has(LogLevel::Warning, "does not exist"));
        assert_eq!(logger.count(LogLevel::Error), 0);
    }

    #[test]
    fn empty_path_is_missing() {
        assert_eq!(classify(Path::new(""), PathRequirement::Exists), PathStatus::Missing);
    }

    #[test]
    fn directory_is_the_wrong_kind_for_an_executable() {
        let dir = tempdir().unwrap();
        let logger = MemoryLogger::new();
        let raw = dir.path().to_string_lossy().to_string();

        assert!(!PathValidator::validate(&raw, true, logger.as_ref()));
        assert!(logger.has(LogLevel::Error, "Expected an executable file"));
    }

    #[test]
    fn directory_is_fine_when_only_existence_is_required() {
        let dir = tempdir().unwrap();
        let logger = MemoryLogger::new();
        let raw = dir.path().to_string_lossy().to_string();

        assert!(PathValidator::validate(&raw, false, logger.as_ref()));
        assert!(logger.has(LogLevel::Info, "Path validation successful"));
    }

    #[test]
    fn regular_file_satisfies_both_requirements() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("chrome");
        std::fs::write(&file, "#!/bin/sh\n").unwrap();

        assert_eq!(classify(&file, PathRequirement::RegularFile), PathStatus::Valid);
        assert_eq!(classify(&file, PathRequirement::Exists), PathStatus::Valid);
    }
}
