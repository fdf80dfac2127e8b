//! `dotfiles` command-line entry point.
use anyhow::Result;
use clap::Parser as _;

use dotfiles_sync::cli::{Cli, Command};
use dotfiles_sync::commands::{self, Environment};
use dotfiles_sync::logging::{self, Logger};
use dotfiles_sync::prompt::StdinPrompt;

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    match &args.command {
        Command::Version => {
            commands::version::run();
            return Ok(());
        }
        Command::Completions(opts) => {
            commands::completions::run(opts);
            return Ok(());
        }
        _ => {}
    }

    let name = args.command.log_name();
    logging::init_subscriber(args.verbose, name);
    let log = Logger::new(name);
    let env = Environment::detect(&args.global, args.verbose)?;

    match &args.command {
        Command::Update(opts) => commands::update::run(&env, opts, &StdinPrompt, &log),
        Command::Diff => commands::diff::run(&env, &log),
        Command::Status => commands::status::run(&env, &log),
        Command::Backup(command) => commands::backup::run(&env, command, &log),
        Command::Rollback(opts) => commands::rollback::run(&env, opts, &StdinPrompt, &log),
        Command::Profile(command) => commands::profile::run(&env, command, &log),
        Command::Completions(_) | Command::Version => Ok(()),
    }
}
