//! costfloor CLI - password hashing that keeps a minimum hash duration
//!
//! A thin command-line caller of `costfloor-core`. It owns the config file,
//! logging, password input, and output formatting; the core does none of
//! those.

use clap::Parser;

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod logging;
mod output;
mod password;

use cli::{Cli, Commands, ConfigCommand};
use commands::{
    handle_calibrate, handle_completions, handle_config_init, handle_config_show, handle_hash,
    handle_verify,
};
use errors::CliError;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(&cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            // Mismatch output has already been printed.
            if matches!(cli_err, CliError::Mismatch) {
                std::process::exit(cli_err.exit_code());
            }
            cli_err.exit();
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Calibrate { policy } => handle_calibrate(cli, policy),
        Commands::Hash { policy } => handle_hash(cli, policy),
        Commands::Verify { hash, policy } => handle_verify(cli, hash, policy),
        Commands::Config { command } => match command {
            ConfigCommand::Show => handle_config_show(cli),
            ConfigCommand::Init { force } => handle_config_init(cli, *force),
        },
        Commands::Completions { shell } => handle_completions(*shell),
    }
}
