//! Key-value blob storage holding whole serialized collections.

use super::files::{atomic_write, ensure_dir, read_file};
use anyhow::{bail, Context, Result};
use std::fs::{File, OpenOptions};
use std::path::PathBuf;

/// Durable key-value storage for serialized blobs.
///
/// Implementations must make `put` all-or-nothing: after a failed `put` a
/// subsequent `get` still returns the previous value.
pub trait BlobStore: Send + Sync {
    /// Held for the duration of a read-modify-write cycle
    type Guard;

    /// Block until no other writer, in this or any other process, holds `key`.
    fn lock(&self, key: &str) -> Result<Self::Guard>;

    /// Read the blob stored under `key`, `None` if nothing was ever written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`.
    fn put(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str, extension: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            bail!("Invalid storage key: {key:?}");
        }
        Ok(self.dir.join(format!("{key}.{extension}")))
    }
}

/// Exclusive advisory lock on `<dir>/<key>.lock`, released when dropped.
#[derive(Debug)]
pub struct FileLockGuard {
    file: File,
    path: PathBuf,
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        if let Err(err) = fs2::FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to release storage lock");
        }
    }
}

impl BlobStore for FileBlobStore {
    type Guard = FileLockGuard;

    fn lock(&self, key: &str) -> Result<FileLockGuard> {
        let path = self.path_for(key, "lock")?;
        ensure_dir(&self.dir)?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open lock file: {}", path.display()))?;
        fs2::FileExt::lock_exclusive(&file)
            .with_context(|| format!("Failed to lock: {}", path.display()))?;
        Ok(FileLockGuard { file, path })
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        read_file(self.path_for(key, "json")?)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key, "json")?;
        ensure_dir(&self.dir)?;
        atomic_write(path, value)
    }
}

#[cfg(test)]
pub mod memory {
    use super::BlobStore;
    use anyhow::{anyhow, Result};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory blob store with switchable read and write failures
    #[derive(Debug, Default)]
    pub struct MemoryBlobStore {
        blobs: Mutex<HashMap<String, String>>,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
        pub writes: AtomicUsize,
    }

    impl MemoryBlobStore {
        pub fn with_blob(key: &str, value: &str) -> Self {
            let store = Self::default();
            store
                .blobs
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            store
        }

        pub fn fail_reads(&self, fail: bool) {
            self.fail_reads.store(fail, Ordering::SeqCst);
        }

        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn raw(&self, key: &str) -> Option<String> {
            self.blobs.lock().unwrap().get(key).cloned()
        }
    }

    impl BlobStore for MemoryBlobStore {
        // Callers already serialize on the store mutex within one process
        type Guard = ();

        fn lock(&self, _key: &str) -> Result<()> {
            Ok(())
        }

        fn get(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(anyhow!("simulated read failure"));
            }
            Ok(self.raw(key))
        }

        fn put(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(anyhow!("simulated write failure"));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.blobs
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_blob_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("data");
        let store = FileBlobStore::new(&dir);

        assert!(store.get("tasks").unwrap().is_none());

        store.put("tasks", "[1,2]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.join("tasks.json").exists());
    }

    #[test]
    fn test_file_lock_is_exclusive_until_dropped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(temp_dir.path());

        let guard = store.lock("tasks").unwrap();
        let path = temp_dir.path().join("tasks.lock");
        let other = File::open(&path).unwrap();
        assert!(fs2::FileExt::try_lock_exclusive(&other).is_err());

        drop(guard);
        fs2::FileExt::try_lock_exclusive(&other).unwrap();
        fs2::FileExt::unlock(&other).unwrap();
    }

    #[test]
    fn test_file_blob_rejects_path_like_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileBlobStore::new(temp_dir.path());

        assert!(store.put("../escape", "x").is_err());
        assert!(store.lock("a/b").is_err());
        assert!(store.get("").is_err());
    }
}
