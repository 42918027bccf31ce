//! CRC-32 (IEEE) accumulating wrappers around a byte stream.
//!
//! Every byte that passes through updates a running checksum and a byte
//! counter. Used both to compute a per-entry payload CRC while writing, and
//! to verify/compute a block's index CRC on both the read and write paths.

use std::io::{self, Read, Write};

use crc32fast::Hasher;

/// Wraps a [`Write`] and accumulates CRC-32 + byte count over everything
/// written through it.
pub struct HashedWriter<W> {
    inner: W,
    hasher: Hasher,
    position: u64,
}

impl<W: Write> HashedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Hasher::new(),
            position: 0,
        }
    }

    /// Current IEEE CRC-32 of all bytes written since the last [`reset`](Self::reset).
    pub fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Bytes successfully written since the last [`reset`](Self::reset).
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Zeroes the checksum and byte counter. Does not touch the underlying
    /// stream's position.
    pub fn reset(&mut self) {
        self.hasher = Hasher::new();
        self.position = 0;
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }
}

impl<W: Write> Write for HashedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.position += n as u64;
        Ok(n)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)?;
        self.hasher.update(buf);
        self.position += buf.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Wraps a [`Read`] and accumulates CRC-32 + byte count over everything
/// read through it.
pub struct HashedReader<R> {
    inner: R,
    hasher: Hasher,
    position: u64,
}

impl<R: Read> HashedReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: Hasher::new(),
            position: 0,
        }
    }

    pub fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn reset(&mut self) {
        self.hasher = Hasher::new();
        self.position = 0;
    }
}

impl<R: Read> Read for HashedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        self.position += n as u64;
        Ok(n)
    }
}
