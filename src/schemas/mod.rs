// Data structures (schemas) for the configuration file and its addressing.

// Typed view of `config.json` and the supported browsers.
pub mod browser_config;
// Dotted paths and the writable configuration keys.
pub mod config_key;
