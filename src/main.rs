mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    if let Some(command) = &cli.command {
        return match command {
            Commands::Config { command } => cli::config::run_config(command),
            Commands::Rule { code, list } => cli::rule::run_rule(code.as_deref(), *list),
        };
    }
    cli::check::run_check(cli)
}
