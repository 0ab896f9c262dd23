//! File-based log store for persistent storage.
//!
//! File system layout:
//!
//! ```text
//! <root>/
//! ├─ LOCK                  # Advisory lock for single-process access
//! ├─ 0000000000000000.log  # Framed entries, one file per log
//! └─ 0000000000000000.seal # Marker, present once the log is sealed
//! ```
//!
//! Each entry is framed as a little-endian `u32` length followed by the
//! entry bytes. A torn trailing frame (from a crash mid-append) is
//! truncated away when the store is reopened.

use crate::error::{StorageError, StorageResult};
use crate::store::LogStore;
use crate::types::{EntryId, LogId};
use async_trait::async_trait;
use fs2::FileExt;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const LOCK_FILE: &str = "LOCK";
const LOG_EXT: &str = "log";
const SEAL_EXT: &str = "seal";

/// Size of the per-entry length prefix.
const FRAME_PREFIX: u64 = 4;

#[derive(Debug)]
struct FileLog {
    file: File,
    /// Byte offset of each entry's frame within the file.
    offsets: Vec<u64>,
    /// Current file length in bytes.
    len: u64,
    sealed: bool,
}

/// A file-based log store.
///
/// Data survives process restarts: entry offsets, the id allocator, and
/// sealed state are all recovered by scanning the root directory on open.
///
/// # Durability
///
/// - Appends are written straight through to the OS
/// - `seal` calls `File::sync_all` before writing the seal marker
///
/// # Locking
///
/// The store holds an exclusive advisory lock on `<root>/LOCK` for its
/// lifetime. Opening a second store over the same root fails with
/// [`StorageError::StoreLocked`].
#[derive(Debug)]
pub struct FileLogStore {
    root: PathBuf,
    logs: RwLock<HashMap<u64, FileLog>>,
    next_log_id: AtomicU64,
    /// Lock file handle (held for exclusive access).
    _lock_file: File,
}

impl FileLogStore {
    /// Opens or creates a file store rooted at the given directory.
    ///
    /// Existing logs are recovered: entry offsets are rebuilt from the
    /// frame stream, a torn trailing frame is truncated, and the log id
    /// allocator resumes above the highest recovered id.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be created or scanned
    /// - Another process holds the store lock (`StoreLocked`)
    /// - A log file is unreadable
    pub fn open(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root)?;

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(root.join(LOCK_FILE))?;
        if lock_file.try_lock_exclusive().is_err() {
            return Err(StorageError::StoreLocked);
        }

        let mut logs = HashMap::new();
        let mut max_id: Option<u64> = None;

        for entry in fs::read_dir(root)? {
            let path = entry?.path();
            if path.extension().map_or(true, |ext| ext != LOG_EXT) {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| u64::from_str_radix(s, 16).ok())
            else {
                continue;
            };

            let sealed = path.with_extension(SEAL_EXT).exists();
            let log = Self::recover_log(&path, sealed)?;
            max_id = Some(max_id.map_or(id, |m| m.max(id)));
            logs.insert(id, log);
        }

        Ok(Self {
            root: root.to_path_buf(),
            logs: RwLock::new(logs),
            next_log_id: AtomicU64::new(max_id.map_or(0, |m| m + 1)),
            _lock_file: lock_file,
        })
    }

    /// Returns the store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of logs currently held by the store.
    #[must_use]
    pub fn log_count(&self) -> usize {
        self.logs.read().len()
    }

    fn log_path(&self, id: u64) -> PathBuf {
        self.root.join(format!("{id:016x}.{LOG_EXT}"))
    }

    fn seal_path(&self, id: u64) -> PathBuf {
        self.root.join(format!("{id:016x}.{SEAL_EXT}"))
    }

    /// Rebuilds entry offsets by walking the frame stream, truncating a
    /// torn trailing frame if the file ends mid-entry.
    fn recover_log(path: &Path, sealed: bool) -> StorageResult<FileLog> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        let file_len = file.metadata()?.len();

        let mut offsets = Vec::new();
        let mut pos = 0u64;
        let mut prefix = [0u8; 4];

        while pos + FRAME_PREFIX <= file_len {
            file.seek(SeekFrom::Start(pos))?;
            file.read_exact(&mut prefix)?;
            let entry_len = u64::from(u32::from_le_bytes(prefix));

            if pos + FRAME_PREFIX + entry_len > file_len {
                break;
            }
            offsets.push(pos);
            pos += FRAME_PREFIX + entry_len;
        }

        if pos < file_len {
            // Torn trailing frame from an interrupted append.
            file.set_len(pos)?;
            file.sync_all()?;
        }

        Ok(FileLog {
            file,
            offsets,
            len: pos,
            sealed,
        })
    }

    fn read_frame(log: &mut FileLog, offset: u64) -> StorageResult<Vec<u8>> {
        let mut prefix = [0u8; 4];
        log.file.seek(SeekFrom::Start(offset))?;
        log.file.read_exact(&mut prefix)?;
        let entry_len = u32::from_le_bytes(prefix) as usize;

        let mut buf = vec![0u8; entry_len];
        log.file.read_exact(&mut buf)?;
        Ok(buf)
    }
}

#[async_trait]
impl LogStore for FileLogStore {
    async fn create_log(&self) -> StorageResult<LogId> {
        let id = self.next_log_id.fetch_add(1, Ordering::SeqCst);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(self.log_path(id))?;

        self.logs.write().insert(
            id,
            FileLog {
                file,
                offsets: Vec::new(),
                len: 0,
                sealed: false,
            },
        );
        Ok(LogId::new(id))
    }

    async fn append(&self, log_id: LogId, entry: &[u8]) -> StorageResult<EntryId> {
        let mut logs = self.logs.write();
        let log = logs
            .get_mut(&log_id.as_u64())
            .ok_or(StorageError::LogNotFound { log_id })?;

        if log.sealed {
            return Err(StorageError::LogSealed { log_id });
        }

        let entry_len = u32::try_from(entry.len()).map_err(|_| {
            StorageError::Corrupted(format!("entry of {} bytes exceeds frame limit", entry.len()))
        })?;

        let offset = log.len;
        log.file.seek(SeekFrom::Start(offset))?;
        log.file.write_all(&entry_len.to_le_bytes())?;
        log.file.write_all(entry)?;

        log.offsets.push(offset);
        log.len = offset + FRAME_PREFIX + u64::from(entry_len);
        Ok(EntryId::new(log.offsets.len() as u64 - 1))
    }

    async fn seal(&self, log_id: LogId) -> StorageResult<()> {
        let mut logs = self.logs.write();
        let log = logs
            .get_mut(&log_id.as_u64())
            .ok_or(StorageError::LogNotFound { log_id })?;

        if log.sealed {
            return Err(StorageError::LogSealed { log_id });
        }

        log.file.sync_all()?;
        let marker = File::create(self.seal_path(log_id.as_u64()))?;
        marker.sync_all()?;
        log.sealed = true;
        Ok(())
    }

    async fn last_confirmed(&self, log_id: LogId) -> StorageResult<Option<EntryId>> {
        let logs = self.logs.read();
        let log = logs
            .get(&log_id.as_u64())
            .ok_or(StorageError::LogNotFound { log_id })?;

        Ok(match log.offsets.len() {
            0 => None,
            n => Some(EntryId::new(n as u64 - 1)),
        })
    }

    async fn read(
        &self,
        log_id: LogId,
        from: EntryId,
        to: EntryId,
    ) -> StorageResult<Vec<(EntryId, Vec<u8>)>> {
        let mut logs = self.logs.write();
        let log = logs
            .get_mut(&log_id.as_u64())
            .ok_or(StorageError::LogNotFound { log_id })?;

        let len = log.offsets.len() as u64;
        if len == 0 || from > to || from.as_u64() >= len {
            return Ok(Vec::new());
        }

        let end = to.as_u64().min(len - 1);
        let mut out = Vec::with_capacity((end - from.as_u64() + 1) as usize);
        for id in from.as_u64()..=end {
            let offset = log.offsets[id as usize];
            let bytes = Self::read_frame(log, offset)?;
            out.push((EntryId::new(id), bytes));
        }
        Ok(out)
    }

    async fn remove_log(&self, log_id: LogId) -> StorageResult<()> {
        let mut logs = self.logs.write();
        logs.remove(&log_id.as_u64())
            .ok_or(StorageError::LogNotFound { log_id })?;

        fs::remove_file(self.log_path(log_id.as_u64()))?;
        match fs::remove_file(self.seal_path(log_id.as_u64())) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
