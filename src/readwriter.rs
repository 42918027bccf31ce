//! Combines a [`Reader`] over the current file contents with a [`Writer`]
//! positioned at end-of-file, so newly-flushed entries are visible to
//! `index()` before any on-disk round-trip (§4.6).

use std::io::{Read, Seek, SeekFrom, Write};

use crate::entry::{Header, IndexEntry};
use crate::error::{IndexReadError, ReaderError, WriterError};
use crate::index::{self, Index};
use crate::reader::{Reader, SectionReader};
use crate::reader_at::ReaderAt;
use crate::shared_stream::SharedStream;
use crate::writer::Writer;

/// Not thread-safe: reads and writes share one underlying cursor.
pub struct ReadWriter<RW> {
    committed: Index,
    end_of_committed: u64,
    reader: Reader<SharedStream<RW>>,
    writer: Writer<SharedStream<RW>>,
}

impl<RW: Read + Write + Seek + ReaderAt> ReadWriter<RW> {
    pub fn new(rw: RW) -> Result<Self, ReaderError> {
        let shared = SharedStream::new(rw);

        let mut probe = shared.clone();
        let end = probe.seek(SeekFrom::End(0))?;

        let committed = if end == 0 {
            Index::new()
        } else {
            match index::read_chain(&mut probe, end) {
                Ok(idx) => idx,
                Err(IndexReadError::EmptyIndex) => Index::new(),
                Err(e) => return Err(ReaderError::from(e)),
            }
        };

        // read_chain may have left the shared cursor anywhere inside the
        // file; reposition it at EOF before the writer starts appending.
        let mut reposition = shared.clone();
        reposition.seek(SeekFrom::Start(end))?;

        let writer = Writer::new(shared.clone());
        let reader = Reader::with_offset(shared, end);

        Ok(ReadWriter {
            committed,
            end_of_committed: end,
            reader,
            writer,
        })
    }

    /// The union of the on-disk committed index and the writer's
    /// not-yet-flushed-to-disk pending entries, with `abs_start` computed
    /// for the pending half relative to end-of-committed-data.
    pub fn index(&self) -> Index {
        let mut entries = self.committed.0.clone();
        for e in self.writer.pending_index() {
            let mut pending = e.clone();
            pending.abs_start = self.end_of_committed + e.start;
            entries.push(pending);
        }
        Index(entries)
    }

    pub fn write_header(&mut self, header: Header) -> Result<(), WriterError> {
        self.writer.write_header(header)
    }

    pub fn mark_deleted(&mut self) -> Result<(), WriterError> {
        self.writer.mark_deleted()
    }

    pub fn write(&mut self, buf: &[u8]) -> Result<usize, WriterError> {
        self.writer.write(buf)
    }

    pub fn flush(&mut self) -> Result<(), WriterError> {
        self.writer.flush()
    }

    /// Finalizes the writer: flushes any pending entry and, if any entries
    /// were written this session, emits a new block comprising them.
    pub fn close(&mut self) -> Result<(), WriterError> {
        self.writer.close()
    }

    pub fn seek(&mut self, entry: &IndexEntry) -> std::io::Result<u64> {
        self.reader.seek(entry)
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReaderError> {
        self.reader.read(buf)
    }

    pub fn get<'a>(
        &'a self,
        entry: &IndexEntry,
    ) -> Result<SectionReader<'a, SharedStream<RW>>, ReaderError> {
        self.reader.get(entry)
    }
}
