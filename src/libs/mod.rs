// Core building blocks of the configuration engine, leaves first.

// Staged, not yet committed configuration changes.
pub mod change_set;
// Loads, merges and persists `config.json`.
pub mod configuration_store;
// Existence / file-kind checks for operator supplied paths.
pub mod path_validator;
// Resolves where the config and log files live.
pub mod paths;
// Serialized access to operator input.
pub mod prompt_gateway;
// The interactive setup session.
pub mod synchronizer;
pub mod utilities;
