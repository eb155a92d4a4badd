// Register application subcommands.
// Each module corresponds to a specific `browser-config-sync` command-line action.

// Verifies the configuration before an automation run.
pub mod check;
// Interactive browser setup session.
pub mod setup;
// Prints the current configuration.
pub mod show;
