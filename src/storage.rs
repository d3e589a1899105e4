//! Durable records for taskflow
//!
//! Everything the app persists is a named record holding a JSON document:
//!
//! ```text
//! <data dir>/
//!   .lock                    # write lock shared by all records
//!   config.toml              # optional settings (see `config`)
//!   tf_auth.json             # current session (AuthState)
//!   tf_users.json            # registered users, in registration order
//!   tf_tasks_<user id>.json  # one ordered task list per user (id escaped)
//! ```
//!
//! The `tf` prefix comes from `[storage] key_prefix`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};
use crate::model::UserId;

/// Name of the lock file inside the data directory
pub const LOCK_FILE: &str = ".lock";

/// Key/value access to durable records.
pub trait RecordStore {
    /// Raw record contents, or `None` when no record exists under `key`.
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a record; removing a missing record is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Names of the durable records, derived from the configured prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn session(&self) -> String {
        format!("{}_auth", self.prefix)
    }

    pub fn users(&self) -> String {
        format!("{}_users", self.prefix)
    }

    /// The user id is escaped so that any id maps to a plain file name.
    pub fn tasks(&self, user: &UserId) -> String {
        format!("{}_tasks_{}", self.prefix, escape_key_part(user.as_str()))
    }
}

/// Keep `[A-Za-z0-9_-]` and percent-encode every other byte.
fn escape_key_part(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            escaped.push(char::from(byte));
        } else {
            escaped.push_str(&format!("%{byte:02X}"));
        }
    }
    escaped
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new("tf")
    }
}

/// Read and decode a record, treating unreadable or malformed records as absent.
pub fn read_json<S, T>(store: &S, key: &str) -> Option<T>
where
    S: RecordStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(key, error = %err, "record unreadable, treating as absent");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "record corrupt, treating as absent");
            None
        }
    }
}

/// Encode and write a record.
pub fn write_json<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: RecordStore + ?Sized,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string_pretty(value)?;
    store.write(key, &json)
}

/// Records as files in a directory, one `<key>.json` per record.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn lock_path(&self) -> PathBuf {
        self.dir.join(LOCK_FILE)
    }
}

impl RecordStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.record_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        lock::write_atomic_locked(
            self.lock_path(),
            self.record_path(key),
            value.as_bytes(),
            DEFAULT_LOCK_TIMEOUT_MS,
        )
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _lock = lock::FileLock::acquire(self.lock_path(), DEFAULT_LOCK_TIMEOUT_MS)?;
        match fs::remove_file(self.record_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory records. Clones share the same map, so a fresh store built
/// from a clone sees everything written before, like a process restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.records.borrow().keys().cloned().collect()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.records.borrow_mut().remove(key);
        Ok(())
    }
}
