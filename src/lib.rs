//! Dotfiles synchronization engine.
//!
//! Copies configuration files from a dotfiles repository into the home
//! directory, the XDG config directory and `~/.local/bin`, taking a
//! timestamped snapshot of everything it is about to overwrite so any run
//! can be rolled back.
//!
//! The public API is organised into layers:
//!
//! - **[`sync`]**: path resolution, merge-copy and diff classification
//! - **[`backup`]**: snapshot creation, listing, pruning and restore
//! - **[`config`]**: `config.toml` settings, mappings and profiles
//! - **[`commands`]**: subcommand orchestration (`update`, `diff`, `rollback`, ...)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod backup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod sync;
