//! Append-only record store
//!
//! Durable, framed, append-only byte storage with random-access reads.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Frame 1                                 │
//! │ ┌─────────────┬───────────────────────┐ │
//! │ │ Len: u64 (8)│ Payload (Len bytes)   │ │
//! │ └─────────────┴───────────────────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Frame 2                                 │
//! │   ... repeated for each record ...      │
//! └─────────────────────────────────────────┘
//! ```
//! Lengths are big-endian. No header, footer, or checksum; the file size is
//! always an exact sum of frame sizes.
//!
//! Appends are buffered and become durable at `close` (or an explicit
//! `flush`), not per record. Both read paths drain the buffer first, so
//! reads always observe prior appends.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;

use crate::codec::{self, LEN_WIDTH};
use crate::error::{LogError, Result};

/// Append-only framed record file
///
/// ## Concurrency
/// Internally thread-safe: a single mutex serializes `append`, `read`, and
/// `read_at`. Each critical section is one buffer flush plus one positional
/// I/O call, so the lock is never held across anything slow.
pub struct Store {
    /// Backing file path, for bookkeeping by the owning segment
    path: PathBuf,

    /// File handle, buffered writer, and running size under one lock
    inner: Mutex<Inner>,
}

struct Inner {
    /// Handle used for positional reads and the final sync
    file: File,

    /// Buffered writer over a cloned handle; appends land here first
    writer: BufWriter<File>,

    /// Bytes appended so far, buffered or durable. Updated at buffer-write
    /// time, not at flush time.
    size: u64,
}

impl Store {
    /// Open or create a store file
    ///
    /// Stats the file for its current size, so appending to a pre-existing
    /// store resumes where the last writer stopped.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        let size = file.metadata()?.len();
        let writer = BufWriter::new(file.try_clone()?);

        debug!(path = %path.display(), size, "opened store");

        Ok(Self {
            path,
            inner: Mutex::new(Inner { file, writer, size }),
        })
    }

    /// Append a payload as one length-prefixed frame
    ///
    /// Returns `(frame_len, pos)`: the number of bytes this frame occupies
    /// (prefix + payload) and the byte position the frame starts at. The
    /// position is what the paired index stores for this record.
    ///
    /// The write is buffered; durability is deferred to [`flush`](Self::flush)
    /// or [`close`](Self::close). The size counter advances only after the
    /// full frame is in the buffer, so a failed append never double-counts
    /// a partial write.
    pub fn append(&self, payload: &[u8]) -> Result<(u64, u64)> {
        let mut inner = self.inner.lock();
        let pos = inner.size;

        let mut len_buf = [0u8; LEN_WIDTH as usize];
        codec::put_u64(&mut len_buf, payload.len() as u64);
        inner.writer.write_all(&len_buf)?;
        inner.writer.write_all(payload)?;

        let frame_len = LEN_WIDTH + payload.len() as u64;
        inner.size += frame_len;

        Ok((frame_len, pos))
    }

    /// Read the frame starting at `pos` and return its payload
    ///
    /// Flushes the buffer first so the read observes every prior append,
    /// flushed or not. A position outside the written extent fails with
    /// [`LogError::Eof`].
    pub fn read(&self, pos: u64) -> Result<Bytes> {
        let mut inner = self.inner.lock();
        inner.writer.flush()?;

        let mut len_buf = [0u8; LEN_WIDTH as usize];
        read_frame_exact(&inner.file, &mut len_buf, pos)?;
        let len = codec::get_u64(&len_buf);

        let mut payload = vec![0u8; len as usize];
        read_frame_exact(&inner.file, &mut payload, pos + LEN_WIDTH)?;

        Ok(Bytes::from(payload))
    }

    /// Raw positional read into a caller-supplied buffer
    ///
    /// Flushes the buffer, then reads at `offset`, returning the count
    /// actually read. A short read happens only at end-of-file and is a
    /// count, not an error; callers expecting a full buffer must check.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let mut inner = self.inner.lock();
        inner.writer.flush()?;
        Ok(inner.file.read_at(buf, offset)?)
    }

    /// Drain the write buffer to the OS
    ///
    /// Makes all buffered appends visible to other handles on the file.
    /// Does not fsync; see [`close`](Self::close) for the durability point.
    pub fn flush(&self) -> Result<()> {
        self.inner.lock().writer.flush()?;
        Ok(())
    }

    /// Bytes appended so far, whether flushed or still buffered
    pub fn size(&self) -> u64 {
        self.inner.lock().size
    }

    /// Path of the backing file
    pub fn name(&self) -> &Path {
        &self.path
    }

    /// Flush the buffer, sync to stable storage, and close the file
    ///
    /// On failure the file may be left unflushed; that is fatal for the
    /// caller and nothing is retried here.
    pub fn close(self) -> Result<()> {
        let mut inner = self.inner.into_inner();
        inner.writer.flush()?;
        inner.file.sync_all()?;

        debug!(path = %self.path.display(), size = inner.size, "closed store");
        Ok(())
    }
}

/// Exact positional read, surfacing a read past the written extent as the
/// crate's end-of-file condition rather than a generic I/O error.
fn read_frame_exact(file: &File, buf: &mut [u8], offset: u64) -> Result<()> {
    match file.read_exact_at(buf, offset) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(LogError::Eof),
        Err(e) => Err(LogError::Io(e)),
    }
}
