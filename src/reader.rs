//! End-of-file bootstrap, chain walk, sequential seek/read, and
//! positioned-read handout (§4.4).

use std::io::{self, Read, Seek, SeekFrom};

use crate::entry::IndexEntry;
use crate::error::ReaderError;
use crate::index::{self, Index};
use crate::reader_at::ReaderAt;

/// Where the reverse chain-walk begins.
enum Bootstrap {
    EndOfStream,
    Offset(u64),
}

/// Reads a container: reconstructs the merged logical [`Index`] by walking
/// the block chain backward, and serves sequential or random-access reads
/// of individual entries.
pub struct Reader<R> {
    r: R,
    bootstrap: Bootstrap,
    current: Option<IndexEntry>,
    pending: u64,
}

impl<R: Read + Seek> Reader<R> {
    pub fn new(r: R) -> Self {
        Self {
            r,
            bootstrap: Bootstrap::EndOfStream,
            current: None,
            pending: 0,
        }
    }

    /// Bootstraps the chain walk at `index_offset` instead of
    /// end-of-stream, for containers embedded in a larger file (S6).
    pub fn with_offset(r: R, index_offset: u64) -> Self {
        Self {
            r,
            bootstrap: Bootstrap::Offset(index_offset),
            current: None,
            pending: 0,
        }
    }

    /// Reconstructs the full merged index: walks the block chain backward
    /// from the bootstrap offset, concatenates every block's entries, and
    /// stable-sorts by `abs_start` ascending.
    pub fn index(&mut self) -> Result<Index, ReaderError> {
        let end = match self.bootstrap {
            Bootstrap::EndOfStream => self.r.seek(SeekFrom::End(0))?,
            Bootstrap::Offset(o) => o,
        };
        index::read_chain(&mut self.r, end).map_err(ReaderError::from)
    }

    /// Arms a sequential read cursor at `entry.abs_start`, bounded to
    /// `entry.size` bytes.
    pub fn seek(&mut self, entry: &IndexEntry) -> io::Result<u64> {
        let pos = self.r.seek(SeekFrom::Start(entry.abs_start))?;
        self.current = Some(entry.clone());
        self.pending = entry.size;
        Ok(pos)
    }

    /// Reads up to `pending` bytes armed by the last `seek`. Returns `Ok(0)`
    /// at the end of the entry; surfaces `UnexpectedEof` if the underlying
    /// stream runs out before `pending` bytes have been delivered.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReaderError> {
        if self.pending == 0 {
            return Ok(0);
        }

        let cap = (buf.len() as u64).min(self.pending) as usize;
        let n = self.r.read(&mut buf[..cap])?;
        self.pending -= n as u64;

        if n == 0 && self.pending > 0 {
            return Err(ReaderError::UnexpectedEof);
        }
        Ok(n)
    }
}

impl<R: Read + Seek + ReaderAt> Reader<R> {
    /// Hands out a concurrent-safe, positioned-read view over `entry`'s
    /// payload bytes.
    pub fn get<'a>(&'a self, entry: &IndexEntry) -> Result<SectionReader<'a, R>, ReaderError> {
        Ok(SectionReader {
            r: &self.r,
            base: entry.abs_start,
            size: entry.size,
            pos: 0,
        })
    }
}

/// A read-only, independently-positioned view over `[base, base+size)` of
/// the underlying stream. Multiple `SectionReader`s may be read
/// concurrently since each call goes through [`ReaderAt::read_at`] rather
/// than a shared cursor.
pub struct SectionReader<'a, R> {
    r: &'a R,
    base: u64,
    size: u64,
    pos: u64,
}

impl<R: ReaderAt> Read for SectionReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.size - self.pos;
        if remaining == 0 {
            return Ok(0);
        }
        let cap = (buf.len() as u64).min(remaining) as usize;
        let n = self.r.read_at(&mut buf[..cap], self.base + self.pos)?;
        self.pos += n as u64;
        Ok(n)
    }
}
