// This is the main module file for the `utilities` directory.
// It declares the small helper modules shared by the rest of `libs`.

// Tilde and environment variable expansion for user supplied paths.
pub mod path_helpers;
// Atomic file writes used when persisting the configuration.
pub mod file_operations;
