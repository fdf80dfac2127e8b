#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for the `backup` command and the on-disk snapshot
//! layout it manages.

mod common;

use std::fs;

use common::{TestEnv, dry_run, logger};
use dotfiles_sync::backup::{BACKUP_DIR_NAME, Manifest, manifest};
use dotfiles_sync::cli::BackupCommand;
use dotfiles_sync::commands::backup;

fn with_snapshots(names: &[&str]) -> TestEnv {
    let t = TestEnv::new();
    for name in names {
        fs::create_dir_all(t.home().join(BACKUP_DIR_NAME).join(name)).unwrap();
    }
    t
}

// ---------------------------------------------------------------------------
// Snapshot layout
// ---------------------------------------------------------------------------

#[test]
fn snapshot_layout_mirrors_home() {
    let t = TestEnv::new()
        .with_home_file(".zshrc", "z\n")
        .with_home_file(".config/nvim/init.lua", "lua\n");
    let store = t.env().backup_store();

    let set = store
        .create(&[t.home().join(".zshrc"), t.home().join(".config/nvim")])
        .unwrap()
        .unwrap();

    assert!(
        set.dir
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("backup_")
    );
    assert_eq!(fs::read_to_string(set.dir.join(".zshrc")).unwrap(), "z\n");
    assert_eq!(
        fs::read_to_string(set.dir.join(".config/nvim/init.lua")).unwrap(),
        "lua\n"
    );
    let text = fs::read_to_string(set.dir.join(manifest::TEXT_FILE)).unwrap();
    assert!(text.contains(&format!("- {}", t.home().join(".zshrc").display())));
    assert_eq!(Manifest::read(&set.dir).unwrap().files.len(), 2);
}

#[test]
fn empty_input_creates_nothing() {
    let t = TestEnv::new();
    let store = t.env().backup_store();

    assert!(store.create(&[]).unwrap().is_none());
    assert!(!store.root().exists());
}

// ---------------------------------------------------------------------------
// backup list | clean | rotate
// ---------------------------------------------------------------------------

#[test]
fn list_ignores_foreign_entries() {
    let t = with_snapshots(&["backup_2024-05-01_10-00-00", "not-a-backup"]);
    fs::write(t.home().join(BACKUP_DIR_NAME).join("stray.txt"), "").unwrap();

    backup::run(&t.env(), &BackupCommand::List, &logger()).unwrap();

    assert_eq!(t.env().backup_store().list().unwrap().len(), 1);
}

#[test]
fn clean_removes_only_expired() {
    let recent = chrono::Local::now().format("backup_%Y-%m-%d_%H-%M-%S").to_string();
    let t = with_snapshots(&["backup_2000-01-01_00-00-00", &recent]);

    backup::run(&t.env(), &BackupCommand::Clean { days: 30 }, &logger()).unwrap();

    let sets = t.env().backup_store().list().unwrap();
    assert_eq!(sets.len(), 1);
    assert!(sets[0].dir.ends_with(&recent));
}

#[test]
fn rotate_dry_run_removes_nothing() {
    let t = with_snapshots(&[
        "backup_2024-01-01_00-00-00",
        "backup_2024-01-02_00-00-00",
        "backup_2024-01-03_00-00-00",
    ]);

    backup::run(&t.env_with(dry_run()), &BackupCommand::Rotate { count: 1 }, &logger()).unwrap();
    assert_eq!(t.env().backup_store().list().unwrap().len(), 3);

    backup::run(&t.env(), &BackupCommand::Rotate { count: 1 }, &logger()).unwrap();
    let sets = t.env().backup_store().list().unwrap();
    assert_eq!(sets.len(), 1);
    assert!(sets[0].dir.ends_with("backup_2024-01-03_00-00-00"));
}
