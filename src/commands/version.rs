//! Command: print version information.

/// Version string, preferring the one stamped in at build time.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DOTFILES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the dotfiles-sync version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("dotfiles-sync {}", version());
}
