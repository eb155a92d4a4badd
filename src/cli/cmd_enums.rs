use clap::{Parser, Subcommand};

/// Defines the command-line interface (CLI) for 'browser-config-sync'.
/// `#[derive(Parser)]` automatically generates argument parsing code via `clap`.
#[derive(Parser)]
#[command(name = "browser-config-sync")]
#[command(about = "Configure the browsers used by the automation runs", long_about = None)]
pub struct Cli {
    /// Enables detailed debug output for troubleshooting and development.
    #[arg(short, long, global = true)]
    pub(crate) debug: bool,

    /// Defines available subcommands for 'browser-config-sync'.
    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Enumerates all supported subcommands with their specific arguments and options.
#[derive(Subcommand)]
pub enum Commands {
    /// Interactively set up browser executable and profile paths.
    /// Does nothing if at least one browser is already configured.
    Setup {
        /// Optional path to the configuration file.
        #[arg(long)]
        config: Option<String>,
        /// Optional path to the log file the session is recorded in.
        #[arg(long)]
        log_file: Option<String>,
        /// Read the answers from a file (one per line) instead of the terminal.
        #[arg(long)]
        answers: Option<String>,
    },
    /// Print the current configuration, or a single value of it.
    Show {
        /// Optional path to the configuration file.
        #[arg(long)]
        config: Option<String>,
        /// Dotted path of one value to print, e.g. `browsers.chrome.executable`.
        #[arg(long)]
        key: Option<String>,
    },
    /// Verify the configuration is ready for an automation run.
    Check {
        /// Optional path to the configuration file.
        #[arg(long)]
        config: Option<String>,
    },
}
