//! Memory-mapped position index
//!
//! O(1) translation from a dense logical record number to the byte position
//! of that record's frame in the paired store file.
//!
//! ## File Format
//! ```text
//! ┌───────────────────────────────────────┐
//! │ Entry 0                               │
//! │ ┌────────────────┬──────────────────┐ │
//! │ │ Record: u32 (4)│ Position: u64 (8)│ │
//! │ └────────────────┴──────────────────┘ │
//! ├───────────────────────────────────────┤
//! │ Entry 1                               │
//! │   ... packed contiguously ...         │
//! └───────────────────────────────────────┘
//! ```
//! Fields are big-endian. Entries are packed from byte 0 and entry *k*
//! always describes record *k*; record numbers are stored redundantly but
//! read back for symmetry.
//!
//! While open, the physical file is pre-extended to the configured capacity
//! so the mapping never has to move; `close` truncates it back down to the
//! written size, which is how a reopen recovers `size` from the file length.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use memmap2::MmapMut;
use tracing::debug;

use crate::codec::{self, ENTRY_WIDTH, REC_WIDTH};
use crate::config::Config;
use crate::error::{LogError, Result};

/// Which index entry to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRef {
    /// The most recently written entry
    Last,

    /// The entry for record number `n`
    Record(u32),
}

impl From<u32> for EntryRef {
    fn from(n: u32) -> Self {
        EntryRef::Record(n)
    }
}

/// Fixed-capacity array of (record number, byte position) entries
///
/// ## Concurrency
/// Not internally locked. The owning segment serializes writers (one writer
/// per store file, matching the store's append order); reads of entries at
/// or below an observed `size` are safe to run concurrently.
#[derive(Debug)]
pub struct Index {
    /// Backing file; kept open for the sync/truncate sequence at close
    file: File,

    /// Backing file path, for bookkeeping by the owning segment
    path: PathBuf,

    /// Mapping over the full pre-allocated capacity
    mmap: MmapMut,

    /// Bytes of the mapped region holding live entries; always a multiple
    /// of the entry width and never more than the mapped capacity
    size: u64,
}

impl Index {
    /// Open or create an index file with the configured capacity
    ///
    /// Stats the file for its existing size (reopening an index that
    /// already has entries), extends it to `max_index_bytes`, and maps the
    /// full capacity read/write.
    pub fn open(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        if config.max_index_bytes < ENTRY_WIDTH {
            return Err(LogError::Config(format!(
                "max_index_bytes {} cannot hold a single {}-byte entry",
                config.max_index_bytes, ENTRY_WIDTH
            )));
        }

        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)?;

        let size = file.metadata()?.len();
        if size > config.max_index_bytes {
            return Err(LogError::Config(format!(
                "index {} holds {} bytes, more than the configured capacity {}",
                path.display(),
                size,
                config.max_index_bytes
            )));
        }

        // Grow to full capacity up front; the mapping is fixed for the
        // lifetime of this instance and growth must never remap.
        file.set_len(config.max_index_bytes)?;

        // SAFETY: the owning segment is the sole writer to this file while
        // the index is open, and the mapping never outlives `file`.
        let mmap = unsafe { MmapMut::map_mut(&file)? };

        debug!(
            path = %path.display(),
            size,
            capacity = config.max_index_bytes,
            "opened index"
        );

        Ok(Self {
            file,
            path,
            mmap,
            size,
        })
    }

    /// Read the entry for `target`, returning `(record_number, position)`
    ///
    /// Fails with [`LogError::Eof`] if the index is empty or the requested
    /// entry was never written.
    pub fn read(&self, target: EntryRef) -> Result<(u32, u64)> {
        if self.size == 0 {
            return Err(LogError::Eof);
        }

        let slot = match target {
            EntryRef::Last => ((self.size / ENTRY_WIDTH) - 1) as u32,
            EntryRef::Record(n) => n,
        };

        let offset = slot as u64 * ENTRY_WIDTH;
        if self.size < offset + ENTRY_WIDTH {
            return Err(LogError::Eof);
        }

        let entry = &self.mmap[offset as usize..(offset + ENTRY_WIDTH) as usize];
        let record = codec::get_u32(&entry[..REC_WIDTH as usize]);
        let position = codec::get_u64(&entry[REC_WIDTH as usize..]);

        Ok((record, position))
    }

    /// Append the entry for `record` at `position`
    ///
    /// The sole growth path: `size` advances by one entry width on success.
    /// Fails with [`LogError::Eof`] once one more entry would exceed the
    /// mapped capacity, leaving `size` untouched; a full index is the
    /// caller's signal to rotate this file pair.
    pub fn write(&mut self, record: u32, position: u64) -> Result<()> {
        if (self.mmap.len() as u64) < self.size + ENTRY_WIDTH {
            return Err(LogError::Eof);
        }

        let start = self.size as usize;
        let entry = &mut self.mmap[start..start + ENTRY_WIDTH as usize];
        codec::put_u32(&mut entry[..REC_WIDTH as usize], record);
        codec::put_u64(&mut entry[REC_WIDTH as usize..], position);

        self.size += ENTRY_WIDTH;
        Ok(())
    }

    /// Bytes of live entries; always `entry_count * 12`
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns `true` if no entry has been written yet
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Path of the backing file
    ///
    /// Orchestration code matches index files to their store files by
    /// shared base name.
    pub fn name(&self) -> &Path {
        &self.path
    }

    /// Sync the mapping and file, truncate to the written size, and close
    ///
    /// The ordering is mandatory: truncating before syncing the mapping
    /// would discard unflushed entries, and truncating is what makes the
    /// pre-allocated tail invisible to a future reopen's size calculation.
    pub fn close(self) -> Result<()> {
        self.mmap.flush()?;
        self.file.sync_all()?;
        self.file.set_len(self.size)?;

        debug!(path = %self.path.display(), size = self.size, "closed index");
        Ok(())
    }
}
