//! Timestamped snapshots of destinations taken before they are overwritten.
//!
//! Each snapshot is a directory `backup_<YYYY-MM-DD_HH-MM-SS>` under the
//! backup root (default `~/.dotfiles-backups`). Snapshots are listed newest
//! first; directories that do not match the naming scheme are ignored by
//! every operation.
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, SubsecRound as _, TimeDelta};

pub mod manifest;
mod snapshot;

pub use manifest::Manifest;
pub use snapshot::LINK_SUFFIX;

use crate::error::{IoContext as _, Result, SyncError};

/// Name of the backup root directory under the home directory.
pub const BACKUP_DIR_NAME: &str = ".dotfiles-backups";

/// Prefix of every snapshot directory name.
pub const SNAPSHOT_PREFIX: &str = "backup_";

/// `chrono` format of the timestamp part of a snapshot directory name.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Source of the current local time.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Current local time.
    fn now(&self) -> DateTime<Local>;
}

/// [`Clock`] backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// One snapshot on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSet {
    /// Local time encoded in the directory name.
    pub timestamp: NaiveDateTime,
    /// Snapshot directory.
    pub dir: PathBuf,
    /// Original paths captured, from the manifest; empty when the manifest
    /// is missing or malformed.
    pub files: Vec<PathBuf>,
}

impl BackupSet {
    /// Timestamp formatted for display.
    #[must_use]
    pub fn display_time(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Snapshot directory name for `timestamp`.
#[must_use]
pub fn snapshot_name(timestamp: &NaiveDateTime) -> String {
    format!("{SNAPSHOT_PREFIX}{}", timestamp.format(TIMESTAMP_FORMAT))
}

/// Parse a snapshot directory name back into its timestamp.
///
/// # Errors
///
/// Returns [`SyncError::Parse`] if `name` lacks the prefix or the timestamp
/// does not match [`TIMESTAMP_FORMAT`].
pub fn parse_snapshot_name(name: &str) -> Result<NaiveDateTime> {
    let stamp = name
        .strip_prefix(SNAPSHOT_PREFIX)
        .ok_or_else(|| SyncError::parse(format!("backup name '{name}'"), "missing prefix"))?;
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
        .map_err(|e| SyncError::parse(format!("backup name '{name}'"), e))
}

/// Creates, lists, prunes, and restores snapshots under one backup root.
#[derive(Debug)]
pub struct BackupStore {
    root: PathBuf,
    home: PathBuf,
    clock: Box<dyn Clock>,
}

impl BackupStore {
    /// Store rooted at `<home>/.dotfiles-backups`.
    #[must_use]
    pub fn new(home: &Path) -> Self {
        Self::with_root(home.join(BACKUP_DIR_NAME), home)
    }

    /// Store rooted at an explicit directory.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>, home: &Path) -> Self {
        Self {
            root: root.into(),
            home: home.to_path_buf(),
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used for naming and age-based cleanup.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Backup root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot every path in `paths` that currently exists.
    ///
    /// Returns `None` without touching the disk when `paths` is empty.
    /// Paths that vanish between the caller's existence check and the copy
    /// are skipped. If the snapshot cannot be completed, the partial
    /// directory is removed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the snapshot directory, a captured entry,
    /// or the manifest cannot be written.
    pub fn create(&self, paths: &[PathBuf]) -> Result<Option<BackupSet>> {
        if paths.is_empty() {
            return Ok(None);
        }
        fs::create_dir_all(&self.root).io_context("create backup root", &self.root)?;
        let (created, dir) = self.allocate()?;

        match self.fill(&dir, paths, created) {
            Ok(files) => {
                tracing::debug!("created backup {} ({} paths)", dir.display(), files.len());
                Ok(Some(BackupSet {
                    timestamp: created.naive_local(),
                    dir,
                    files,
                }))
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_dir_all(&dir) {
                    tracing::warn!("could not remove partial backup {}: {cleanup}", dir.display());
                }
                Err(e)
            }
        }
    }

    fn fill(&self, dir: &Path, paths: &[PathBuf], created: DateTime<Local>) -> Result<Vec<PathBuf>> {
        let mut captured = Vec::with_capacity(paths.len());
        for path in paths {
            if snapshot::capture(path, dir, &self.home)? {
                captured.push(path.clone());
            }
        }
        Manifest::new(created.fixed_offset(), captured.clone()).write(dir)?;
        Ok(captured)
    }

    /// Create a fresh snapshot directory, advancing the timestamp one second
    /// at a time until the name is free.
    fn allocate(&self) -> Result<(DateTime<Local>, PathBuf)> {
        let mut stamp = self.clock.now().trunc_subsecs(0);
        loop {
            let dir = self.root.join(snapshot_name(&stamp.naive_local()));
            match fs::create_dir(&dir) {
                Ok(()) => return Ok((stamp, dir)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    stamp += TimeDelta::seconds(1);
                }
                Err(e) => {
                    return Err(SyncError::Io {
                        action: "create backup directory",
                        path: dir,
                        source: e,
                    });
                }
            }
        }
    }

    /// All snapshots, newest first.
    ///
    /// A missing backup root yields an empty list. Entries whose name does
    /// not parse are skipped; a missing or malformed manifest yields an
    /// empty file list rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the backup root exists but cannot be read.
    pub fn list(&self) -> Result<Vec<BackupSet>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SyncError::Io {
                    action: "read backup root",
                    path: self.root.clone(),
                    source: e,
                });
            }
        };

        let mut sets = Vec::new();
        for entry in entries {
            let entry = entry.io_context("read entry in", &self.root)?;
            if !entry.file_type().is_ok_and(|t| t.is_dir()) {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let timestamp = match parse_snapshot_name(name) {
                Ok(ts) => ts,
                Err(e) => {
                    tracing::debug!("ignoring {name}: {e}");
                    continue;
                }
            };
            let dir = entry.path();
            let files = match Manifest::read(&dir) {
                Ok(manifest) => manifest.files,
                Err(e) => {
                    tracing::debug!("no usable manifest in {name}: {e}");
                    Vec::new()
                }
            };
            sets.push(BackupSet {
                timestamp,
                dir,
                files,
            });
        }
        sets.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(sets)
    }

    /// Snapshots strictly older than `days` days, newest first.
    ///
    /// A cutoff before the earliest representable date expires nothing.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the backup root cannot be read.
    pub fn expired(&self, days: u32) -> Result<Vec<BackupSet>> {
        let now = self.clock.now().naive_local();
        let cutoff = TimeDelta::try_days(i64::from(days))
            .and_then(|age| now.checked_sub_signed(age))
            .unwrap_or(NaiveDateTime::MIN);
        let mut sets = self.list()?;
        sets.retain(|set| set.timestamp < cutoff);
        Ok(sets)
    }

    /// Snapshots beyond the `max` newest, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if the backup root cannot be read.
    pub fn surplus(&self, max: usize) -> Result<Vec<BackupSet>> {
        Ok(self.list()?.into_iter().skip(max).collect())
    }

    /// Delete snapshots strictly older than `days` days, returning how many
    /// were removed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if a snapshot cannot be removed.
    pub fn clean(&self, days: u32) -> Result<usize> {
        let expired = self.expired(days)?;
        for set in &expired {
            remove_set(set)?;
        }
        Ok(expired.len())
    }

    /// Keep only the `max` newest snapshots, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Io`] if a snapshot cannot be removed.
    pub fn rotate(&self, max: usize) -> Result<usize> {
        let surplus = self.surplus(max)?;
        for set in &surplus {
            remove_set(set)?;
        }
        Ok(surplus.len())
    }

    /// Restore the snapshot in `dir` into the home directory, returning the
    /// number of entries written.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] if `dir` does not exist, or
    /// [`SyncError::Io`] if an entry cannot be restored.
    pub fn restore(&self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Err(SyncError::NotFound(dir.to_path_buf()));
        }
        snapshot::restore(dir, &self.home)
    }
}

fn remove_set(set: &BackupSet) -> Result<()> {
    fs::remove_dir_all(&set.dir).io_context("remove backup", &set.dir)?;
    tracing::debug!("removed backup {}", set.dir.display());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use std::sync::{Arc, Mutex};

    /// Clock returning a settable instant.
    #[derive(Debug, Clone)]
    struct TestClock(Arc<Mutex<DateTime<Local>>>);

    impl TestClock {
        fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Self {
            let now = Local.with_ymd_and_hms(y, mo, d, h, mi, s).single().unwrap();
            Self(Arc::new(Mutex::new(now)))
        }

        fn advance(&self, delta: TimeDelta) {
            *self.0.lock().unwrap() += delta;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Local> {
            *self.0.lock().unwrap()
        }
    }

    struct Fixture {
        _tmp: tempfile::TempDir,
        home: PathBuf,
        clock: TestClock,
        store: BackupStore,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("home");
        fs::create_dir(&home).unwrap();
        let clock = TestClock::at(2024, 3, 1, 12, 0, 0);
        let store = BackupStore::new(&home).with_clock(clock.clone());
        Fixture {
            _tmp: tmp,
            home,
            clock,
            store,
        }
    }

    fn make_snapshot_dir(store: &BackupStore, name: &str) -> PathBuf {
        let dir = store.root().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    // -----------------------------------------------------------------------
    // naming
    // -----------------------------------------------------------------------

    #[test]
    fn snapshot_name_round_trips() {
        let ts = NaiveDateTime::parse_from_str("2024-01-02 03:04:05", "%Y-%m-%d %H:%M:%S").unwrap();
        let name = snapshot_name(&ts);
        assert_eq!(name, "backup_2024-01-02_03-04-05");
        assert_eq!(parse_snapshot_name(&name).unwrap(), ts);
    }

    #[test]
    fn non_conforming_names_are_parse_errors() {
        for name in ["notes", "backup_", "backup_2024-13-01_00-00-00", "backup_2024-01-01"] {
            assert!(
                matches!(parse_snapshot_name(name), Err(SyncError::Parse { .. })),
                "{name}"
            );
        }
    }

    // -----------------------------------------------------------------------
    // create
    // -----------------------------------------------------------------------

    #[test]
    fn create_with_no_paths_does_nothing() {
        let f = fixture();
        assert!(f.store.create(&[]).unwrap().is_none());
        assert!(!f.store.root().exists());
    }

    #[test]
    fn create_captures_file_and_writes_manifests() {
        let f = fixture();
        let vimrc = f.home.join(".vimrc");
        fs::write(&vimrc, "old").unwrap();

        let set = f.store.create(&[vimrc.clone()]).unwrap().unwrap();

        assert_eq!(
            set.dir,
            f.store.root().join("backup_2024-03-01_12-00-00")
        );
        assert_eq!(set.files, vec![vimrc.clone()]);
        assert_eq!(fs::read_to_string(set.dir.join(".vimrc")).unwrap(), "old");
        let text = fs::read_to_string(set.dir.join(manifest::TEXT_FILE)).unwrap();
        assert!(text.contains("Files backed up: 1"), "{text}");
        assert!(text.contains(&format!("- {}", vimrc.display())), "{text}");
        assert_eq!(Manifest::read(&set.dir).unwrap().files, vec![vimrc]);
    }

    #[test]
    fn create_skips_vanished_paths() {
        let f = fixture();
        let present = f.home.join(".zshrc");
        fs::write(&present, "z").unwrap();
        let gone = f.home.join(".gone");

        let set = f.store.create(&[gone, present.clone()]).unwrap().unwrap();

        assert_eq!(set.files, vec![present]);
    }

    #[test]
    fn same_second_backups_get_distinct_names() {
        let f = fixture();
        let file = f.home.join(".bashrc");
        fs::write(&file, "b").unwrap();

        let first = f.store.create(&[file.clone()]).unwrap().unwrap();
        let second = f.store.create(&[file]).unwrap().unwrap();

        assert_ne!(first.dir, second.dir);
        assert_eq!(
            second.dir,
            f.store.root().join("backup_2024-03-01_12-00-01")
        );
        assert_eq!(f.store.list().unwrap().len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn create_stores_symlink_as_stub() {
        let f = fixture();
        let link = f.home.join(".vimrc");
        std::os::unix::fs::symlink("/opt/shared/vimrc", &link).unwrap();

        let set = f.store.create(&[link]).unwrap().unwrap();

        assert_eq!(
            fs::read_to_string(set.dir.join(".vimrc.link")).unwrap(),
            "/opt/shared/vimrc"
        );
    }

    // -----------------------------------------------------------------------
    // list
    // -----------------------------------------------------------------------

    #[test]
    fn list_missing_root_is_empty() {
        let f = fixture();
        assert!(f.store.list().unwrap().is_empty());
    }

    #[test]
    fn list_is_newest_first_and_ignores_foreign_entries() {
        let f = fixture();
        make_snapshot_dir(&f.store, "backup_2024-01-01_00-00-00");
        make_snapshot_dir(&f.store, "backup_2024-02-01_00-00-00");
        make_snapshot_dir(&f.store, "backup_2023-12-31_23-59-59");
        make_snapshot_dir(&f.store, "notes");
        make_snapshot_dir(&f.store, "backup_garbage");
        fs::write(f.store.root().join("backup_2024-05-01_00-00-00"), "a file").unwrap();

        let names: Vec<String> = f
            .store
            .list()
            .unwrap()
            .iter()
            .map(|s| s.dir.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            names,
            vec![
                "backup_2024-02-01_00-00-00",
                "backup_2024-01-01_00-00-00",
                "backup_2023-12-31_23-59-59",
            ]
        );
    }

    #[test]
    fn list_tolerates_malformed_manifest() {
        let f = fixture();
        let dir = make_snapshot_dir(&f.store, "backup_2024-01-01_00-00-00");
        fs::write(dir.join(manifest::JSON_FILE), "{broken").unwrap();

        let sets = f.store.list().unwrap();

        assert_eq!(sets.len(), 1);
        assert!(sets[0].files.is_empty());
    }

    // -----------------------------------------------------------------------
    // clean / rotate
    // -----------------------------------------------------------------------

    #[test]
    fn clean_removes_only_snapshots_older_than_cutoff() {
        let f = fixture();
        make_snapshot_dir(&f.store, "backup_2024-01-01_00-00-00");
        make_snapshot_dir(&f.store, "backup_2024-02-25_00-00-00");
        make_snapshot_dir(&f.store, "keep-me");

        let removed = f.store.clean(30).unwrap();

        assert_eq!(removed, 1);
        let remaining = f.store.list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].display_time(), "2024-02-25 00:00:00");
        assert!(f.store.root().join("keep-me").exists());
    }

    #[test]
    fn clean_uses_injected_clock() {
        let f = fixture();
        make_snapshot_dir(&f.store, "backup_2024-02-25_00-00-00");
        assert_eq!(f.store.clean(30).unwrap(), 0);
        f.clock.advance(TimeDelta::days(60));
        assert_eq!(f.store.clean(30).unwrap(), 1);
    }

    #[test]
    fn clean_keeps_snapshot_exactly_at_cutoff() {
        let f = fixture();
        // fixture clock is 2024-03-01 12:00:00, 30 days back is 2024-01-31 12:00:00
        make_snapshot_dir(&f.store, "backup_2024-01-31_12-00-00");
        make_snapshot_dir(&f.store, "backup_2024-01-31_11-59-59");

        assert_eq!(f.store.clean(30).unwrap(), 1);

        let remaining = f.store.list().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].display_time(), "2024-01-31 12:00:00");
    }

    #[test]
    fn clean_with_huge_retention_removes_nothing() {
        let f = fixture();
        make_snapshot_dir(&f.store, "backup_2001-01-01_00-00-00");
        make_snapshot_dir(&f.store, "backup_2024-02-29_00-00-00");

        assert!(f.store.expired(u32::MAX).unwrap().is_empty());
        assert_eq!(f.store.clean(u32::MAX).unwrap(), 0);
        assert_eq!(f.store.list().unwrap().len(), 2);
    }

    #[test]
    fn expired_and_surplus_do_not_delete() {
        let f = fixture();
        make_snapshot_dir(&f.store, "backup_2024-01-01_00-00-00");
        make_snapshot_dir(&f.store, "backup_2024-02-29_00-00-00");

        assert_eq!(f.store.expired(30).unwrap().len(), 1);
        assert_eq!(f.store.surplus(1).unwrap().len(), 1);
        assert_eq!(f.store.surplus(5).unwrap().len(), 0);
        assert_eq!(f.store.list().unwrap().len(), 2);
    }

    #[test]
    fn rotate_keeps_newest() {
        let f = fixture();
        for day in 1..=7 {
            make_snapshot_dir(&f.store, &format!("backup_2024-01-0{day}_00-00-00"));
        }

        let removed = f.store.rotate(5).unwrap();

        assert_eq!(removed, 2);
        let remaining = f.store.list().unwrap();
        assert_eq!(remaining.len(), 5);
        assert_eq!(remaining[0].display_time(), "2024-01-07 00:00:00");
        assert_eq!(remaining[4].display_time(), "2024-01-03 00:00:00");
    }

    #[test]
    fn rotate_zero_removes_all_snapshots() {
        let f = fixture();
        for day in 1..=3 {
            make_snapshot_dir(&f.store, &format!("backup_2024-01-0{day}_00-00-00"));
        }
        make_snapshot_dir(&f.store, "unrelated");

        assert_eq!(f.store.rotate(0).unwrap(), 3);
        assert!(f.store.list().unwrap().is_empty());
        assert!(f.store.root().join("unrelated").exists());
    }

    // -----------------------------------------------------------------------
    // restore
    // -----------------------------------------------------------------------

    #[test]
    fn restore_missing_dir_is_not_found() {
        let f = fixture();
        let err = f.store.restore(&f.store.root().join("backup_x")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn backup_then_restore_recovers_prior_state() {
        let f = fixture();
        let vimrc = f.home.join(".vimrc");
        let nvim = f.home.join(".config/nvim");
        fs::write(&vimrc, "original vimrc").unwrap();
        fs::create_dir_all(nvim.join("lua")).unwrap();
        fs::write(nvim.join("init.lua"), "original init").unwrap();
        fs::write(nvim.join("lua/opts.lua"), "opts").unwrap();

        let set = f
            .store
            .create(&[vimrc.clone(), nvim.clone()])
            .unwrap()
            .unwrap();

        fs::write(&vimrc, "clobbered").unwrap();
        fs::write(nvim.join("init.lua"), "clobbered").unwrap();
        fs::remove_file(nvim.join("lua/opts.lua")).unwrap();

        let restored = f.store.restore(&set.dir).unwrap();

        assert_eq!(fs::read_to_string(&vimrc).unwrap(), "original vimrc");
        assert_eq!(
            fs::read_to_string(nvim.join("init.lua")).unwrap(),
            "original init"
        );
        assert_eq!(fs::read_to_string(nvim.join("lua/opts.lua")).unwrap(), "opts");
        assert!(!f.home.join(manifest::TEXT_FILE).exists());
        assert!(!f.home.join(manifest::JSON_FILE).exists());
        // .vimrc, .config, .config/nvim, init.lua, lua, lua/opts.lua
        assert_eq!(restored, 6);
    }

    #[test]
    fn path_climbing_out_of_home_stays_inside_snapshot() {
        let f = fixture();
        let outside = f.home.join("../outside");
        fs::write(&outside, "original").unwrap();

        let set = f.store.create(&[outside.clone()]).unwrap().unwrap();

        assert!(!f.store.root().join("outside").exists());
        let stored = set.dir.join(snapshot::relative_to_home(&outside, &f.home));
        assert!(stored.starts_with(&set.dir));
        assert_eq!(fs::read_to_string(stored).unwrap(), "original");
        assert_eq!(Manifest::read(&set.dir).unwrap().files, vec![outside.clone()]);

        fs::write(&outside, "clobbered").unwrap();
        f.store.restore(&set.dir).unwrap();

        assert_eq!(fs::read_to_string(&outside).unwrap(), "original");
        assert!(!f.home.join("outside").exists());
    }

    #[cfg(unix)]
    #[test]
    fn restore_keeps_stored_permissions() {
        use std::os::unix::fs::PermissionsExt as _;

        let f = fixture();
        let netrc = f.home.join(".netrc");
        let ssh = f.home.join(".ssh");
        fs::write(&netrc, "secret").unwrap();
        fs::set_permissions(&netrc, fs::Permissions::from_mode(0o600)).unwrap();
        fs::create_dir(&ssh).unwrap();
        fs::write(ssh.join("config"), "Host *").unwrap();
        fs::set_permissions(&ssh, fs::Permissions::from_mode(0o700)).unwrap();

        let set = f.store.create(&[netrc.clone(), ssh.clone()]).unwrap().unwrap();

        fs::set_permissions(&netrc, fs::Permissions::from_mode(0o644)).unwrap();
        fs::remove_dir_all(&ssh).unwrap();

        f.store.restore(&set.dir).unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&netrc), 0o600);
        assert_eq!(mode(&ssh), 0o700);
        assert_eq!(fs::read_to_string(ssh.join("config")).unwrap(), "Host *");
    }

    #[cfg(unix)]
    #[test]
    fn restore_recreates_symlink_over_regular_file() {
        let f = fixture();
        let link = f.home.join(".gitconfig");
        std::os::unix::fs::symlink("/opt/shared/gitconfig", &link).unwrap();
        let set = f.store.create(&[link.clone()]).unwrap().unwrap();

        fs::remove_file(&link).unwrap();
        fs::write(&link, "copied over").unwrap();

        f.store.restore(&set.dir).unwrap();

        assert_eq!(
            fs::read_link(&link).unwrap(),
            PathBuf::from("/opt/shared/gitconfig")
        );
    }
}
