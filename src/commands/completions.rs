//! Command: generate shell completion scripts.
use clap::CommandFactory as _;
use clap_complete::Shell;
use std::io::{self, Write};

use crate::cli::{Cli, CompletionsOpts};

/// Write the completion script for `shell` to `out`.
pub fn generate(shell: Shell, out: &mut dyn Write) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, out);
}

/// Print the completion script for the requested shell to stdout.
pub fn run(opts: &CompletionsOpts) {
    generate(opts.shell, &mut io::stdout());
}
