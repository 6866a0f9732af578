//! Named durable records.
//!
//! A record is a single serialized value stored under a short name such as
//! `favorites-fonts`. [`FileRecordStore`] keeps each record in
//! `{dir}/{name}.json`; [`MemoryRecordStore`] backs tests and `--offline`
//! sessions that must not touch disk.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Storage for named records.
///
/// Reads return `Ok(None)` for a record that was never written. Writes
/// replace the whole record.
pub trait RecordStore: Send + Sync {
    /// Read the raw contents of a record.
    fn read(&self, name: &str) -> io::Result<Option<String>>;

    /// Replace the contents of a record.
    fn write(&self, name: &str, contents: &str) -> io::Result<()>;
}

/// Record names become file names, so only a conservative alphabet is allowed.
fn validate_record_name(name: &str) -> io::Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Invalid record name '{}'", name),
        ))
    }
}

/// File-backed record store with atomic writes.
#[derive(Debug, Clone)]
pub struct FileRecordStore {
    dir: PathBuf,
}

impl FileRecordStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing a record.
    pub fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl RecordStore for FileRecordStore {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        validate_record_name(name)?;
        match fs::read_to_string(self.record_path(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        validate_record_name(name)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.record_path(name);
        let temp_path = self.dir.join(format!("{name}.json.tmp"));

        // Write to temp file first, then rename so a crash never leaves a torn record
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &path)?;

        log::debug!("Wrote record '{}' ({} bytes) to {:?}", name, contents.len(), path);
        Ok(())
    }
}

/// In-memory record store.
///
/// `set_fail_writes(true)` makes every subsequent write fail, which is how
/// callers exercise their persistence-failure paths.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, String>>,
    fail_writes: Mutex<bool>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record without going through `write`.
    pub fn with_record(self, name: &str, contents: &str) -> Self {
        self.records
            .lock()
            .insert(name.to_string(), contents.to_string());
        self
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }

    /// Current contents of a record, if any.
    pub fn get(&self, name: &str) -> Option<String> {
        self.records.lock().get(name).cloned()
    }
}

impl RecordStore for MemoryRecordStore {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        validate_record_name(name)?;
        Ok(self.records.lock().get(name).cloned())
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        validate_record_name(name)?;
        if *self.fail_writes.lock() {
            return Err(io::Error::other(format!(
                "Write to record '{}' rejected",
                name
            )));
        }
        self.records
            .lock()
            .insert(name.to_string(), contents.to_string());
        Ok(())
    }
}
