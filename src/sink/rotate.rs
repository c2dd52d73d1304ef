//! Size-rotated log file with count/age retention and gzip compression.
//!
//! # Rotation
//! ```text
//! write(len):
//!     len > max_bytes            → WriteTooLarge (nothing written)
//!     size + len > max_bytes     → rename app.log → app-<UTC timestamp>.log
//!                                  create fresh app.log
//!                                  signal the cleanup worker
//!     append, size += len
//! ```
//!
//! # Retention
//! - Backups are `<stem>-YYYY-MM-DDTHH-MM-SS.mmm<.ext>` (optionally `.gz`),
//!   ordered by the timestamp in their name, newest first
//! - `max_backups` > 0 keeps that many; 0 keeps all
//! - `max_age` drops backups older than now - age
//! - `compress` gzips surviving plain backups and removes the originals
//!
//! # Design Decisions
//! - The active file is opened when the sink is built so a bad path fails at startup
//! - Parent directories are never created
//! - Retention runs on one worker thread per file, one pass at a time, outside
//!   the write lock; signals that arrive while a pass is queued collapse into it
//! - Retention failures go to the error output, never to the writer
//! - `flush` waits for queued retention passes to finish

use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex, MutexGuard, RwLock};
use std::thread::{self, JoinHandle};

use arc_swap::ArcSwap;
use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::config::RotateConfig;
use crate::error::LogError;
use crate::sink::{report_error, Console, Sink};

pub const MEGABYTE: u64 = 1024 * 1024;
/// Applied when the configured size is zero or negative.
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";

/// Thresholds governing rotation and retention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatePolicy {
    pub max_bytes: u64,
    /// 0 retains every backup.
    pub max_backups: usize,
    pub max_age: Option<chrono::Duration>,
    pub compress: bool,
}

impl RotatePolicy {
    /// Interpret configured values: sizes in megabytes, age in days,
    /// non-positive values meaning "default" (size) or "unbounded" (count, age).
    pub fn from_config(config: &RotateConfig) -> Self {
        let max_bytes = if config.max_size <= 0 {
            DEFAULT_MAX_SIZE_MB * MEGABYTE
        } else {
            (config.max_size as u64).saturating_mul(MEGABYTE)
        };

        Self {
            max_bytes,
            max_backups: usize::try_from(config.max_backups).unwrap_or(0),
            max_age: (config.max_age > 0)
                .then(|| chrono::Duration::try_days(config.max_age))
                .flatten(),
            compress: config.compress,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_max_backups(mut self, max_backups: usize) -> Self {
        self.max_backups = max_backups;
        self
    }

    pub fn with_max_age(mut self, max_age: chrono::Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

impl Default for RotatePolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_SIZE_MB * MEGABYTE,
            max_backups: 0,
            max_age: None,
            compress: false,
        }
    }
}

#[derive(Debug)]
struct ActiveFile {
    file: Option<File>,
    size: u64,
    last_backup: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct Backup {
    time: DateTime<Utc>,
    path: PathBuf,
    compressed: bool,
}

/// Naming and retention of the backups that belong to one active path.
#[derive(Debug, Clone)]
struct BackupSet {
    path: PathBuf,
}

enum CleanupMsg {
    Run,
    Wait(mpsc::Sender<()>),
}

type ErrorOutput = Arc<RwLock<Arc<dyn Sink>>>;

/// Exclusive owner of one rotating log file.
pub struct RotatingFile {
    backups: BackupSet,
    policy: Arc<ArcSwap<RotatePolicy>>,
    active: Mutex<ActiveFile>,
    errors: ErrorOutput,
    pending: Arc<AtomicBool>,
    cleanup: Mutex<Option<mpsc::Sender<CleanupMsg>>>,
    worker: Option<JoinHandle<()>>,
}

impl RotatingFile {
    /// Open (or create) the active file in append mode and start its cleanup worker.
    pub fn open(path: impl Into<PathBuf>, policy: RotatePolicy) -> Result<Self, LogError> {
        let path = path.into();
        let (file, size) = open_append(&path).map_err(|source| LogError::Open {
            path: path.clone(),
            source,
        })?;

        let backups = BackupSet { path };
        let policy = Arc::new(ArcSwap::from_pointee(policy));
        let errors: ErrorOutput = Arc::new(RwLock::new(Arc::new(Console::Stderr)));
        let pending = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let cleaner = Cleaner {
            backups: backups.clone(),
            policy: policy.clone(),
            errors: errors.clone(),
            pending: pending.clone(),
            receiver: rx,
        };
        let worker = thread::Builder::new()
            .name("logkit-cleanup".into())
            .spawn(move || cleaner.run())?;

        Ok(Self {
            backups,
            policy,
            active: Mutex::new(ActiveFile {
                file: Some(file),
                size,
                last_backup: None,
            }),
            errors,
            pending,
            cleanup: Mutex::new(Some(tx)),
            worker: Some(worker),
        })
    }

    pub fn path(&self) -> &Path {
        &self.backups.path
    }

    pub fn policy(&self) -> Arc<RotatePolicy> {
        self.policy.load_full()
    }

    /// Swap thresholds; applies from the next write.
    pub fn set_policy(&self, policy: RotatePolicy) {
        self.policy.store(Arc::new(policy));
    }

    /// Where retention failures are reported (stderr by default).
    pub fn set_error_output(&self, sink: Arc<dyn Sink>) {
        *self.errors.write().unwrap_or_else(|e| e.into_inner()) = sink;
    }

    /// Bytes in the active file.
    pub fn size(&self) -> u64 {
        self.lock().size
    }

    /// Append `buf`, rotating first if it would push the file past its limit.
    pub fn append(&self, buf: &[u8]) -> Result<usize, LogError> {
        let policy = self.policy.load_full();
        let len = buf.len() as u64;
        if len > policy.max_bytes {
            return Err(LogError::WriteTooLarge {
                len,
                max: policy.max_bytes,
            });
        }

        let mut active = self.lock();
        if active.file.is_none() {
            let (file, size) = open_append(self.path()).map_err(|source| LogError::Open {
                path: self.path().to_path_buf(),
                source,
            })?;
            active.file = Some(file);
            active.size = size;
        }

        let rotated = active.size + len > policy.max_bytes;
        if rotated {
            self.rotate_locked(&mut active)?;
        }

        let file = active.file.as_mut().ok_or_else(|| LogError::Open {
            path: self.path().to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "active log file is closed"),
        })?;
        file.write_all(buf)?;
        active.size += len;
        drop(active);

        if rotated {
            self.schedule_cleanup();
        }
        Ok(buf.len())
    }

    /// Force a rotation regardless of size; retention follows in the background.
    pub fn rotate(&self) -> Result<(), LogError> {
        let mut active = self.lock();
        self.rotate_locked(&mut active)?;
        drop(active);
        self.schedule_cleanup();
        Ok(())
    }

    /// Close the active handle; the next write reopens it.
    pub fn close(&self) -> io::Result<()> {
        let mut active = self.lock();
        if let Some(mut file) = active.file.take() {
            file.flush()?;
        }
        Ok(())
    }

    /// Backups currently on disk, newest first.
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        Ok(self.backups.list()?.into_iter().map(|b| b.path).collect())
    }

    /// Block until every retention pass queued so far has finished.
    pub fn wait_for_cleanup(&self) {
        let Some(tx) = self.sender() else {
            return;
        };
        let (done_tx, done_rx) = mpsc::channel();
        if tx.send(CleanupMsg::Wait(done_tx)).is_ok() {
            let _ = done_rx.recv();
        }
    }

    fn lock(&self) -> MutexGuard<'_, ActiveFile> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sender(&self) -> Option<mpsc::Sender<CleanupMsg>> {
        self.cleanup
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn schedule_cleanup(&self) {
        if self.pending.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(tx) = self.sender() {
            let _ = tx.send(CleanupMsg::Run);
        }
    }

    fn rotate_locked(&self, active: &mut ActiveFile) -> Result<(), LogError> {
        let rotate_err = |source| LogError::Rotate {
            path: self.path().to_path_buf(),
            source,
        };

        if let Some(mut file) = active.file.take() {
            file.flush().map_err(rotate_err)?;
        }

        if self.path().exists() {
            let mut time = Utc::now().trunc_subsecs(3);
            if let Some(last) = active.last_backup.filter(|last| time <= *last) {
                time = last + chrono::Duration::milliseconds(1);
            }
            let (backup, time) = self.backups.next_path(time);
            fs::rename(self.path(), &backup).map_err(rotate_err)?;
            active.last_backup = Some(time);
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.path())
            .map_err(rotate_err)?;
        active.file = Some(file);
        active.size = 0;
        Ok(())
    }
}

impl Drop for RotatingFile {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain queued passes and exit.
        self.cleanup
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.backups.path)
            .field("policy", &self.policy.load_full())
            .finish_non_exhaustive()
    }
}

impl Sink for RotatingFile {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        self.append(record).map(|_| ()).map_err(io::Error::from)
    }

    fn flush(&self) -> io::Result<()> {
        if let Some(file) = self.lock().file.as_mut() {
            file.flush()?;
        }
        self.wait_for_cleanup();
        Ok(())
    }
}

/// Runs retention passes for one file, in the order they were requested.
struct Cleaner {
    backups: BackupSet,
    policy: Arc<ArcSwap<RotatePolicy>>,
    errors: ErrorOutput,
    pending: Arc<AtomicBool>,
    receiver: mpsc::Receiver<CleanupMsg>,
}

impl Cleaner {
    fn run(self) {
        for msg in self.receiver.iter() {
            match msg {
                CleanupMsg::Run => {
                    self.pending.store(false, Ordering::Release);
                    let policy = self.policy.load_full();
                    if let Err(e) = self.backups.remove_old(&policy) {
                        let out = self
                            .errors
                            .read()
                            .unwrap_or_else(|poisoned| poisoned.into_inner())
                            .clone();
                        let what = format!("backup cleanup error for {}", self.backups.path.display());
                        report_error(out.as_ref(), &what, &e);
                    }
                }
                CleanupMsg::Wait(done) => {
                    let _ = done.send(());
                }
            }
        }
    }
}

impl BackupSet {
    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    /// `("app-", ".log")` for `app.log`.
    fn prefix_and_ext(&self) -> (String, String) {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = self
            .path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let stem = &name[..name.len() - ext.len()];
        (format!("{}-", stem), ext)
    }

    /// First free backup name at or after `time`; backup names sort by creation.
    fn next_path(&self, mut time: DateTime<Utc>) -> (PathBuf, DateTime<Utc>) {
        let (prefix, ext) = self.prefix_and_ext();
        loop {
            let name = format!("{}{}{}", prefix, time.format(BACKUP_TIME_FORMAT), ext);
            let candidate = self.dir().join(&name);
            let compressed = self.dir().join(format!("{}{}", name, COMPRESS_SUFFIX));
            if !candidate.exists() && !compressed.exists() {
                return (candidate, time);
            }
            time += chrono::Duration::milliseconds(1);
        }
    }

    fn list(&self) -> io::Result<Vec<Backup>> {
        let (prefix, ext) = self.prefix_and_ext();
        let compressed_ext = format!("{}{}", ext, COMPRESS_SUFFIX);

        let mut backups = Vec::new();
        for entry in fs::read_dir(self.dir())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();

            if let Some(time) = backup_time(&name, &prefix, &ext) {
                backups.push(Backup {
                    time,
                    path: entry.path(),
                    compressed: false,
                });
            } else if let Some(time) = backup_time(&name, &prefix, &compressed_ext) {
                backups.push(Backup {
                    time,
                    path: entry.path(),
                    compressed: true,
                });
            }
        }

        backups.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(backups)
    }

    fn remove_old(&self, policy: &RotatePolicy) -> io::Result<()> {
        if policy.max_backups == 0 && policy.max_age.is_none() && !policy.compress {
            return Ok(());
        }

        let mut backups = self.list()?;
        let mut remove = Vec::new();

        if policy.max_backups > 0 && policy.max_backups < backups.len() {
            let mut preserved = HashSet::new();
            let mut remaining = Vec::new();
            for backup in backups {
                let key = {
                    let name = backup.path.to_string_lossy();
                    name.strip_suffix(COMPRESS_SUFFIX).unwrap_or(&name).to_string()
                };
                preserved.insert(key);
                if preserved.len() > policy.max_backups {
                    remove.push(backup);
                } else {
                    remaining.push(backup);
                }
            }
            backups = remaining;
        }

        if let Some(max_age) = policy.max_age {
            if let Some(cutoff) = Utc::now().checked_sub_signed(max_age) {
                let (expired, remaining): (Vec<_>, Vec<_>) =
                    backups.into_iter().partition(|b| b.time < cutoff);
                remove.extend(expired);
                backups = remaining;
            }
        }

        let mut failures = Vec::new();
        for backup in &remove {
            if let Err(e) = fs::remove_file(&backup.path) {
                if e.kind() != io::ErrorKind::NotFound {
                    failures.push(format!("{}: {}", backup.path.display(), e));
                }
            }
        }

        if policy.compress {
            for backup in backups.iter().filter(|b| !b.compressed) {
                if let Err(e) = compress_file(&backup.path) {
                    failures.push(format!("{}: {}", backup.path.display(), e));
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(io::Error::other(failures.join("; ")))
        }
    }
}

fn open_append(path: &Path) -> io::Result<(File, u64)> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let size = file.metadata()?.len();
    Ok((file, size))
}

fn backup_time(name: &str, prefix: &str, ext: &str) -> Option<DateTime<Utc>> {
    let stamp = name.strip_prefix(prefix)?.strip_suffix(ext)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT)
        .ok()
        .map(|t| t.and_utc())
}

/// Gzip `src` into `src.gz` and remove `src`.
fn compress_file(src: &Path) -> io::Result<()> {
    let mut dst_name = src.as_os_str().to_owned();
    dst_name.push(COMPRESS_SUFFIX);
    let dst = PathBuf::from(dst_name);

    let result = (|| {
        let mut input = File::open(src)?;
        let output = File::create(&dst)?;
        let mut encoder = GzEncoder::new(output, Compression::default());
        io::copy(&mut input, &mut encoder)?;
        encoder.finish()?.sync_all()
    })();

    match result {
        Ok(()) => fs::remove_file(src),
        Err(e) => {
            let _ = fs::remove_file(&dst);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn small(max_bytes: u64) -> RotatePolicy {
        RotatePolicy::default().with_max_bytes(max_bytes)
    }

    fn gunzip(path: &Path) -> String {
        let mut text = String::new();
        GzDecoder::new(File::open(path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RotatePolicy::from_config(&RotateConfig {
            compress: true,
            max_size: 2,
            max_age: 3,
            max_backups: 4,
        });
        assert_eq!(policy.max_bytes, 2 * MEGABYTE);
        assert_eq!(policy.max_backups, 4);
        assert_eq!(policy.max_age, Some(chrono::Duration::days(3)));
        assert!(policy.compress);
    }

    #[test]
    fn test_non_positive_values_are_defaults() {
        let policy = RotatePolicy::from_config(&RotateConfig {
            compress: false,
            max_size: -5,
            max_age: 0,
            max_backups: -1,
        });
        assert_eq!(policy, RotatePolicy::default());
    }

    #[test]
    fn test_missing_parent_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let err = RotatingFile::open(dir.path().join("nope/app.log"), RotatePolicy::default())
            .unwrap_err();
        assert!(matches!(err, LogError::Open { .. }));
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "old\n").unwrap();

        let file = RotatingFile::open(&path, RotatePolicy::default()).unwrap();
        assert_eq!(file.size(), 4);
        file.append(b"new\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }

    #[test]
    fn test_rotates_when_limit_exceeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let file = RotatingFile::open(&path, small(20)).unwrap();

        file.append(b"first line 0123\n").unwrap();
        file.append(b"second line 012\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second line 012\n");
        let backups = file.backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "first line 0123\n");
        let name = backups[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("app-") && name.ends_with(".log"));
    }

    #[test]
    fn test_oversized_write_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = RotatingFile::open(dir.path().join("app.log"), small(4)).unwrap();
        let err = file.append(b"too long").unwrap_err();
        assert!(matches!(err, LogError::WriteTooLarge { len: 8, max: 4 }));
        assert_eq!(file.size(), 0);
    }

    #[test]
    fn test_keeps_at_most_max_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let file = RotatingFile::open(&path, small(10).with_max_backups(2)).unwrap();

        for i in 0..6 {
            file.append(format!("record {}\n", i).as_bytes()).unwrap();
        }
        file.wait_for_cleanup();

        let backups = file.backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "record 4\n");
        assert_eq!(fs::read_to_string(&backups[1]).unwrap(), "record 3\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "record 5\n");
    }

    #[test]
    fn test_removes_backups_past_max_age() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("app-2000-01-01T00-00-00.000.log");
        let unrelated = dir.path().join("other.log");
        fs::write(&stale, "ancient\n").unwrap();
        fs::write(&unrelated, "keep\n").unwrap();

        let file = RotatingFile::open(
            dir.path().join("app.log"),
            RotatePolicy::default().with_max_age(chrono::Duration::days(1)),
        )
        .unwrap();
        file.append(b"fresh\n").unwrap();
        file.rotate().unwrap();
        file.wait_for_cleanup();

        assert!(!stale.exists());
        assert!(unrelated.exists());
        assert_eq!(file.backups().unwrap().len(), 1);
    }

    #[test]
    fn test_compresses_rotated_backups() {
        let dir = tempfile::tempdir().unwrap();
        let file = RotatingFile::open(
            dir.path().join("app.log"),
            RotatePolicy::default().with_compress(true),
        )
        .unwrap();
        file.append(b"to be compressed\n").unwrap();
        file.rotate().unwrap();
        Sink::flush(&file).unwrap();

        let backups = file.backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert!(backups[0].to_string_lossy().ends_with(".log.gz"));
        assert_eq!(gunzip(&backups[0]), "to be compressed\n");
    }

    #[test]
    fn test_concurrent_rotations_compress_each_backup_once() {
        const THREADS: usize = 4;
        const ROUNDS: usize = 5;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let file = Arc::new(
            RotatingFile::open(&path, RotatePolicy::default().with_compress(true)).unwrap(),
        );

        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let file = file.clone();
                thread::spawn(move || {
                    for r in 0..ROUNDS {
                        file.append(format!("{}-{}\n", t, r).as_bytes()).unwrap();
                        file.rotate().unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        file.wait_for_cleanup();

        let backups = file.backups().unwrap();
        assert_eq!(backups.len(), THREADS * ROUNDS);
        let mut lines = fs::read_to_string(&path).unwrap().lines().count();
        for backup in &backups {
            assert!(backup.to_string_lossy().ends_with(".log.gz"));
            lines += gunzip(backup).lines().count();
        }
        assert_eq!(lines, THREADS * ROUNDS);
    }

    #[test]
    fn test_cleanup_failure_goes_to_error_output() {
        let dir = tempfile::tempdir().unwrap();
        let pending = dir.path().join("app-2999-01-01T00-00-00.000.log");
        fs::write(&pending, "waiting\n").unwrap();
        // A directory where the archive should go makes gzip fail.
        fs::create_dir(dir.path().join("app-2999-01-01T00-00-00.000.log.gz")).unwrap();

        let errors = MemorySink::new();
        let file = RotatingFile::open(
            dir.path().join("app.log"),
            RotatePolicy::default().with_compress(true),
        )
        .unwrap();
        file.set_error_output(Arc::new(errors.clone()));

        file.append(b"line\n").unwrap();
        file.rotate().unwrap();
        file.wait_for_cleanup();

        let reported = errors.contents();
        assert!(reported.contains("backup cleanup error for"));
        assert!(reported.contains("app-2999-01-01T00-00-00.000.log"));
        assert!(pending.exists());
    }

    #[test]
    fn test_close_then_write_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let file = RotatingFile::open(&path, RotatePolicy::default()).unwrap();
        file.append(b"a\n").unwrap();
        file.close().unwrap();
        file.append(b"b\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_backup_names_stay_unique() {
        let dir = tempfile::tempdir().unwrap();
        let file = RotatingFile::open(dir.path().join("app.log"), small(4)).unwrap();
        for _ in 0..5 {
            file.append(b"abc\n").unwrap();
        }
        assert_eq!(file.backups().unwrap().len(), 4);
    }
}
