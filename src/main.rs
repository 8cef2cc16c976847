use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use colored::Colorize;

mod cli;
mod commands;
mod config;
mod error;
mod git;
mod gitlab;
mod identity;
mod settings;
mod version;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::AppError;
use crate::gitlab::GitLabClient;
use crate::settings::Settings;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // A bare invocation prints usage and exits cleanly.
    if cli.command.is_none() {
        Cli::command().print_help().ok();
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    // Configuration loading is a distinct stage: any failure here is fatal,
    // nothing can run without a valid config file.
    let config = Config::load(Path::new(config::CONFIG_FILE_NAME))?;

    let mut settings = Settings::resolve(cli, &config)?;

    let client = GitLabClient::from_config(&config)?;
    settings.git_users = identity::resolve_git_users(
        &config,
        client.as_ref(),
        Path::new(identity::CACHE_FILE_NAME),
    )?;

    commands::run(&settings, &config, client.as_ref())
}
