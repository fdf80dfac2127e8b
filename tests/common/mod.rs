// Shared helpers for integration tests.
//
// Provides a temporary home directory and dotfiles root plus a fluent
// builder so each integration test can lay out sources, live files and
// `config.toml` without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use dotfiles_sync::commands::{Environment, RunOptions};
use dotfiles_sync::logging::Logger;
use dotfiles_sync::prompt::Prompt;

/// An isolated home directory and dotfiles root backed by a
/// [`tempfile::TempDir`].
pub struct TestEnv {
    tmp: tempfile::TempDir,
}

impl TestEnv {
    /// Create empty `home/` and `dotfiles/` directories.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(tmp.path().join("home")).expect("create home");
        fs::create_dir_all(tmp.path().join("dotfiles")).expect("create root");
        Self { tmp }
    }

    /// Home directory destinations resolve against.
    pub fn home(&self) -> PathBuf {
        self.tmp.path().join("home")
    }

    /// Dotfiles root.
    pub fn root(&self) -> PathBuf {
        self.tmp.path().join("dotfiles")
    }

    /// Write `config.toml` under the root.
    #[must_use]
    pub fn with_config(self, toml: &str) -> Self {
        fs::write(self.root().join("config.toml"), toml).expect("write config.toml");
        self
    }

    /// Write a source file at `<root>/<rel>`.
    #[must_use]
    pub fn with_source(self, rel: &str, content: &str) -> Self {
        write_file(&self.root().join(rel), content);
        self
    }

    /// Write a live file at `<home>/<rel>`.
    #[must_use]
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.home().join(rel), content);
        self
    }

    /// Read a file under the home directory.
    pub fn read_home(&self, rel: &str) -> String {
        fs::read_to_string(self.home().join(rel)).expect("read home file")
    }

    /// Environment with default run options.
    pub fn env(&self) -> Environment {
        self.env_with(RunOptions::default())
    }

    /// Environment with explicit run options.
    pub fn env_with(&self, options: RunOptions) -> Environment {
        Environment::new(self.root(), self.home(), options)
    }
}

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
    fs::write(path, content).expect("write file");
}

/// Logger that records steps but writes no log file.
pub fn logger() -> Logger {
    Logger::with_log_file(None)
}

/// Dry-run options.
pub fn dry_run() -> RunOptions {
    RunOptions {
        dry_run: true,
        ..RunOptions::default()
    }
}

/// [`Prompt`] that always gives the same answer.
pub struct Answer(pub bool);

impl Prompt for Answer {
    fn confirm(&self, _question: &str) -> anyhow::Result<bool> {
        Ok(self.0)
    }
}
