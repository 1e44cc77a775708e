//! profilekit CLI - Edit your personal account from the command line
//!
//! Drives the same account screen controller the app uses: fetch the profile,
//! apply edits, upload images and save.

mod cli;
mod commands;
mod error;


use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::config::run_config;
use crate::commands::edit::run_edit;
use crate::commands::show::run_show;
use crate::commands::upload::run_upload;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("profilekit=info".parse().map_err(|error| {
                    CliError::Config(format!("invalid log directive: {error}"))
                })?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Show { json } => run_show(config_path, json).await,
        Commands::Edit(args) => run_edit(config_path, args).await,
        Commands::Upload { slot, image, from } => {
            run_upload(config_path, slot, &image, from.as_deref()).await
        }
        Commands::Config { command } => run_config(config_path, command),
    }
}
