//! Append-only JSON Lines benchmark store

use crate::error::StorageError;
use crate::{BenchmarkStore, TimeRange};
use async_trait::async_trait;
use fs2::FileExt;
use searchbench_core::benchmark::BenchmarkEntry;
use searchbench_core::config::Environment;
use searchbench_core::Error;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// RAII guard for file locking
///
/// Releases the advisory lock when dropped, even when the critical section errors.
struct LockGuard {
    file: File,
}

impl LockGuard {
    /// Block until an exclusive lock is held
    fn exclusive(file: File) -> std::io::Result<Self> {
        FileExt::lock_exclusive(&file)?;
        Ok(Self { file })
    }

    /// Block until a shared lock is held
    fn shared(file: File) -> std::io::Result<Self> {
        FileExt::lock_shared(&file)?;
        Ok(Self { file })
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to unlock benchmark store during drop: {e}");
        }
    }
}

/// Benchmark history stored as one JSON object per line
///
/// Each append writes a complete line with a single `write_all` while holding an
/// exclusive lock, then fsyncs before the lock is released, so concurrent writers
/// never interleave partial lines.
#[derive(Debug, Clone)]
pub struct JsonlBenchmarkStore {
    path: PathBuf,
}

impl JsonlBenchmarkStore {
    /// Open (creating if needed) the store and verify it is writable
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let open_failed = |reason: String| StorageError::OpenFailed {
            path: path.display().to_string(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| open_failed(e.to_string()))?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| open_failed(e.to_string()))?;

        debug!("Opened benchmark store at {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Force buffered data for the history file to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        file.sync_all()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))
    }

    fn append_line(path: &Path, line: &[u8]) -> Result<(), StorageError> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| StorageError::WriteFailed(format!("{}: {e}", path.display())))?;
        let mut guard = LockGuard::exclusive(file)
            .map_err(|e| StorageError::WriteFailed(format!("failed to lock store: {e}")))?;

        let len_before = guard
            .file
            .metadata()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?
            .len();
        let torn_tail = len_before > 0
            && Self::last_byte(&mut guard.file, len_before)
                .map_err(|e| StorageError::WriteFailed(e.to_string()))?
                != b'\n';
        if torn_tail {
            warn!(
                "Benchmark store {} ends without a newline; terminating the partial line",
                path.display()
            );
        }

        let written = (if torn_tail {
            guard.file.write_all(b"\n")
        } else {
            Ok(())
        })
        .and_then(|()| guard.file.write_all(line))
        .and_then(|()| guard.file.flush())
        .and_then(|()| guard.file.sync_all());

        if let Err(e) = written {
            // Drop whatever part of this append reached the file
            if let Err(truncate_err) = guard.file.set_len(len_before) {
                warn!(
                    "Failed to roll back partial append to {}: {truncate_err}",
                    path.display()
                );
            }
            return Err(StorageError::WriteFailed(e.to_string()));
        }
        Ok(())
    }

    fn last_byte(file: &mut File, len: u64) -> std::io::Result<u8> {
        let mut byte = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1))?;
        file.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    fn read_entries(
        path: &Path,
        environment: Environment,
        range: TimeRange,
    ) -> Result<Vec<BenchmarkEntry>, StorageError> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(path)
            .map_err(|e| StorageError::ReadFailed(format!("{}: {e}", path.display())))?;
        let mut guard = LockGuard::shared(file)
            .map_err(|e| StorageError::ReadFailed(format!("failed to lock store: {e}")))?;
        let mut content = String::new();
        guard
            .file
            .read_to_string(&mut content)
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;
        drop(guard);

        let mut entries = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<BenchmarkEntry>(line) {
                Ok(entry) => {
                    if entry.environment == environment && range.contains(entry.timestamp) {
                        entries.push(entry);
                    }
                }
                Err(e) => {
                    warn!(
                        "Skipping unparseable line {} in {}: {e}",
                        line_no + 1,
                        path.display()
                    );
                }
            }
        }

        entries.sort_by_key(|entry| entry.timestamp);
        Ok(entries)
    }
}

#[async_trait]
impl BenchmarkStore for JsonlBenchmarkStore {
    async fn append(&self, entry: &BenchmarkEntry) -> Result<(), Error> {
        // Serialize the whole entry before touching the file
        let mut line = serde_json::to_vec(entry)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        line.push(b'\n');

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || Self::append_line(&path, &line))
            .await
            .map_err(|e| StorageError::WriteFailed(format!("append task failed: {e}")))??;

        debug!("Appended benchmark entry {}", entry.id);
        Ok(())
    }

    async fn entries(
        &self,
        environment: Environment,
        range: TimeRange,
    ) -> Result<Vec<BenchmarkEntry>, Error> {
        let path = self.path.clone();
        let entries =
            tokio::task::spawn_blocking(move || Self::read_entries(&path, environment, range))
                .await
                .map_err(|e| StorageError::ReadFailed(format!("read task failed: {e}")))??;
        Ok(entries)
    }
}
