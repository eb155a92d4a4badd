mod cli;
mod commands;
mod libs;
mod logger;
mod schemas;

use clap::Parser;
use cli::cmd_enums::{Cli, Commands};
use commands::{check, setup, show};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.debug);

    let result = match cli.command {
        Commands::Setup { config, log_file, answers } => setup::run(config, log_file, answers),
        Commands::Show { config, key } => show::run(config, key),
        Commands::Check { config } => check::run(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            crate::log_error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
