//! Append-only writer state machine (§4.3).
//!
//! `Fresh → (WriteHeader) → Pending → (Write*) → Pending → (Flush) →
//! Flushed → (WriteHeader) → Pending ... → (Close) → Closed`. `Close`
//! implicitly flushes a pending entry and, if any entries were written,
//! emits the block's index and 24-byte footer.

use std::io::Write;

use crate::entry::{Header, IndexEntry};
use crate::error::WriterError;
use crate::hashed::HashedWriter;
use crate::index;

pub struct Writer<W> {
    w: HashedWriter<W>,
    index: Vec<IndexEntry>,
    /// Index into `index` of the entry currently open (Pending/Flushed),
    /// or `None` in the Fresh state.
    current: Option<usize>,
    /// Whether the current entry has already been flushed.
    flushed_current: bool,
    /// Bytes written since this writer's own starting offset. Unlike the
    /// hashed writer's position, this never resets across flushes.
    position: u64,
    closed: bool,
}

impl<W: Write> Writer<W> {
    pub fn new(w: W) -> Self {
        Self {
            w: HashedWriter::new(w),
            index: Vec::new(),
            current: None,
            flushed_current: false,
            position: 0,
            closed: false,
        }
    }

    /// Bytes written to this block so far, relative to this writer's own
    /// starting offset.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Entries recorded in this writer so far (pending, not yet committed
    /// to disk until `close`).
    pub fn pending_index(&self) -> &[IndexEntry] {
        &self.index
    }

    pub fn write_header(&mut self, header: Header) -> Result<(), WriterError> {
        self.flush_if_pending()?;

        self.index.push(IndexEntry {
            header,
            start: self.position,
            size: 0,
            crc32: 0,
            flags: 0,
            abs_start: 0,
        });
        self.current = Some(self.index.len() - 1);
        self.flushed_current = false;
        Ok(())
    }

    /// Marks the current entry as a tombstone (`FlagDeleted`). Must be
    /// called before `flush`/`close`; a tombstoned entry may have zero
    /// size.
    pub fn mark_deleted(&mut self) -> Result<(), WriterError> {
        if self.closed {
            return Err(WriterError::ClosedWriter);
        }
        let idx = self.current.ok_or(WriterError::MissingHeader)?;
        self.index[idx].flags |= crate::entry::FLAG_DELETED;
        Ok(())
    }

    pub fn write(&mut self, buf: &[u8]) -> Result<usize, WriterError> {
        if self.closed {
            return Err(WriterError::ClosedWriter);
        }
        let n = self.w.write(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    pub fn flush(&mut self) -> Result<(), WriterError> {
        if self.closed {
            return Err(WriterError::ClosedWriter);
        }
        let idx = self.current.ok_or(WriterError::MissingHeader)?;
        self.flush_entry(idx);
        Ok(())
    }

    fn flush_entry(&mut self, idx: usize) {
        let start = self.index[idx].start;
        self.index[idx].size = self.position - start;
        self.index[idx].crc32 = self.w.checksum();
        self.w.reset();
        self.flushed_current = true;
    }

    fn flush_if_pending(&mut self) -> Result<(), WriterError> {
        if self.closed {
            return Err(WriterError::ClosedWriter);
        }
        if let Some(idx) = self.current {
            if !self.flushed_current {
                self.flush_entry(idx);
            }
        }
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), WriterError> {
        if self.closed {
            return Err(WriterError::ClosedWriter);
        }
        self.flush_if_pending()?;
        self.closed = true;

        if self.index.is_empty() {
            return Ok(());
        }

        let footer = index::write_block(&mut self.w, &self.index, self.position)
            .map_err(|_| WriterError::InvalidIndexEntry)?;
        tracing::debug!(
            entry_count = footer.entry_count,
            block_size = footer.block_size,
            "emitted block"
        );
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn into_inner(self) -> W {
        self.w.into_inner()
    }
}
