// ABOUTME: RecordStore owns the single persisted collection and its read-modify-write discipline.
// ABOUTME: Mutations run under the location's write lock; reads rely on atomic replace for consistency.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use hookbox_core::{Collection, DeleteOutcome, EnvelopeError, Record, decode_collection, encode_collection};
use thiserror::Error;

use crate::atomic::write_atomic;
use crate::lock::{FileLock, lock_path_for, write_lock_for};

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Nothing has ever been persisted at this location.
    #[error("no data available")]
    NoData,

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("corrupt data file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: EnvelopeError,
    },

    #[error("failed to encode collection: {0}")]
    Encode(#[source] EnvelopeError),

    #[error("write lock poisoned")]
    LockPoisoned,
}

/// The persisted, ordered collection of records at one file location.
///
/// Every `RecordStore` opened on the same path within a process shares a
/// single write guard, and writers additionally hold an exclusive lock on a
/// `<file>.lock` sidecar, so two appends can never both start from the same
/// pre-mutation state.
pub struct RecordStore {
    path: PathBuf,
    lock_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl RecordStore {
    /// Open the store backed by the file at `path`. Parent directories are
    /// created; the data file itself is only created by the first mutation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("data path has no file name: {}", path.display()),
            )
        })?;

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;
        let path = fs::canonicalize(&parent)?.join(file_name);

        Ok(Self {
            lock_path: lock_path_for(&path),
            write_lock: write_lock_for(&path),
            path,
        })
    }

    /// Absolute path of the data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted collection. Returns None when nothing has ever been
    /// written, which is distinct from an empty collection.
    pub fn load(&self) -> Result<Option<Collection>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let decoded = decode_collection(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        if decoded.legacy {
            tracing::info!(
                "normalized legacy data file {} ({} records)",
                self.path.display(),
                decoded.collection.len()
            );
        }

        Ok(Some(decoded.collection))
    }

    /// Append one record at the end of the collection, creating the
    /// collection if nothing was persisted. Returns the new record count.
    pub fn append(&self, record: impl Into<Record>) -> Result<usize, StoreError> {
        let record = record.into();
        self.mutate(|current| {
            let mut collection = current.unwrap_or_default();
            collection.push(record);
            let len = collection.len();
            Ok((Some(collection), len))
        })
    }

    /// Render every record's text joined by newlines, in insertion order.
    pub fn list(&self) -> Result<String, StoreError> {
        let collection = self.load()?.ok_or(StoreError::NoData)?;
        Ok(collection.render())
    }

    /// Remove every record whose text equals `target`, or clear everything
    /// when `target` is blank. Nothing is written when no record matched.
    pub fn delete(&self, target: &str) -> Result<DeleteOutcome, StoreError> {
        self.mutate(|current| {
            let mut collection = current.ok_or(StoreError::NoData)?;
            let outcome = collection.delete(target);
            if outcome.is_mutation() {
                Ok((Some(collection), outcome))
            } else {
                Ok((None, outcome))
            }
        })
    }

    /// Run load -> modify -> persist as one critical section. `op` returns
    /// the collection to persist (None to leave the file untouched) and the
    /// value handed back to the caller.
    fn mutate<T>(
        &self,
        op: impl FnOnce(Option<Collection>) -> Result<(Option<Collection>, T), StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;
        let _file_lock = FileLock::acquire(&self.lock_path)?;

        let current = self.load()?;
        let (next, value) = op(current)?;

        if let Some(collection) = next {
            self.persist(&collection)?;
            tracing::debug!(
                "persisted {} records to {}",
                collection.len(),
                self.path.display()
            );
        }

        Ok(value)
    }

    fn persist(&self, collection: &Collection) -> Result<(), StoreError> {
        let bytes = encode_collection(collection).map_err(StoreError::Encode)?;
        write_atomic(&self.path, &bytes)?;
        Ok(())
    }
}
