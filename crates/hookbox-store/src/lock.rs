// ABOUTME: Writer serialization for a storage location, both in-process and across processes.
// ABOUTME: Shares one Mutex per canonical data path and holds an fs2 exclusive lock on a sidecar file.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};

use fs2::FileExt;

/// One write guard per data file, shared by every RecordStore opened on it.
static WRITE_LOCKS: LazyLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Return the process-wide write guard for `path`. `path` should already be
/// canonical so that different spellings of one file share a guard.
pub(crate) fn write_lock_for(path: &Path) -> Arc<Mutex<()>> {
    let mut locks = WRITE_LOCKS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(
        locks
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(()))),
    )
}

/// Sidecar path holding the cross-process advisory lock for `path`.
pub(crate) fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("data"));
    name.push(".lock");
    path.with_file_name(name)
}

/// Exclusive advisory lock on a sidecar file, released on drop.
pub(crate) struct FileLock {
    file: File,
}

impl FileLock {
    /// Block until the exclusive lock on `lock_path` is acquired.
    pub(crate) fn acquire(lock_path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(lock_path)?;
        FileExt::lock_exclusive(&file)?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
