//! Command-line interface definitions.
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Top-level CLI entry point for the dotfiles synchronizer.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "Copy dotfiles into place with snapshot backups and rollback",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override dotfiles root directory
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,

    /// Override configuration file (default: <root>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Back up existing destinations and copy dotfiles into place
    #[command(visible_alias = "install")]
    Update(UpdateOpts),
    /// Show what an update would change
    Diff,
    /// Show the sync status of every mapping
    Status,
    /// Manage backup snapshots
    #[command(subcommand)]
    Backup(BackupCommand),
    /// Restore a backup snapshot
    Rollback(RollbackOpts),
    /// Manage profiles
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Generate shell completions
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Update(_) => "update",
            Self::Diff => "diff",
            Self::Status => "status",
            Self::Backup(_) => "backup",
            Self::Rollback(_) => "rollback",
            Self::Profile(_) => "profile",
            Self::Completions(_) => "completions",
            Self::Version => "version",
        }
    }
}

/// Options for the `update` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct UpdateOpts {
    /// Preview changes and ask for confirmation before applying
    #[arg(short, long)]
    pub interactive: bool,

    /// Do not back up existing destinations
    #[arg(long)]
    pub no_backup: bool,
}

/// `backup` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum BackupCommand {
    /// List snapshots, newest first
    List,
    /// Remove snapshots older than the given number of days
    Clean {
        /// Age threshold in days
        #[arg(default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
        days: u32,
    },
    /// Keep only the given number of newest snapshots
    Rotate {
        /// Number of snapshots to keep
        #[arg(default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },
}

/// Options for the `rollback` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RollbackOpts {
    /// Which snapshot to restore (1 = newest)
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub number: u32,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// `profile` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ProfileCommand {
    /// Install a profile's files and remember it as current
    Switch {
        /// Profile name as declared in config.toml
        name: String,
    },
    /// List declared profiles
    List,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
