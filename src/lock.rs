//! File locking and atomic record writes.
//!
//! Two `tf` processes pointed at the same data directory serialize their
//! record writes through an advisory lock (fs2/flock). Each record is
//! replaced by writing a temp file next to it and renaming it into place,
//! so a reader never observes a half-written record.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Default lock timeout in milliseconds
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

const LOCK_RETRY_INTERVAL_MS: u64 = 25;

fn is_lock_contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }

    // Windows reports sharing/lock violations as raw OS errors 32 and 33.
    #[cfg(windows)]
    {
        matches!(err.raw_os_error(), Some(32) | Some(33))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?)
}

/// Exclusive lock guard; the lock is released on drop.
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Acquire an exclusive lock, retrying until `timeout_ms` elapses.
    pub fn acquire(path: impl AsRef<Path>, timeout_ms: u64) -> Result<Self> {
        let path = path.as_ref();
        let file = open_lock_file(path)?;

        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    return Ok(FileLock {
                        file,
                        path: path.to_path_buf(),
                    })
                }
                Err(e) if is_lock_contended(&e) => {
                    if Instant::now() >= deadline {
                        return Err(Error::LockFailed(path.to_path_buf()));
                    }
                    std::thread::sleep(Duration::from_millis(LOCK_RETRY_INTERVAL_MS));
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }

    /// Try once; `Ok(None)` means someone else holds the lock.
    pub fn try_acquire(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        let file = open_lock_file(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(FileLock {
                file,
                path: path.to_path_buf(),
            })),
            Err(e) if is_lock_contended(&e) => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Replace `path` with `data` via temp file + rename.
///
/// Does not lock; callers coordinating with other processes hold a
/// [`FileLock`] around it (see [`write_atomic_locked`]).
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension(format!("tmp.{}", std::process::id()));
    let mut temp_file = File::create(&temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()?;
    drop(temp_file);

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }
    Ok(())
}

/// Write atomically while holding the lock at `lock_path`.
pub fn write_atomic_locked(
    lock_path: impl AsRef<Path>,
    path: impl AsRef<Path>,
    data: &[u8],
    timeout_ms: u64,
) -> Result<()> {
    let _lock = FileLock::acquire(lock_path, timeout_ms)?;
    write_atomic(path, data)
}
