//! A cheaply-cloneable handle sharing one underlying stream and cursor.
//!
//! [`crate::readwriter::ReadWriter`] composes a [`crate::reader::Reader`]
//! and a [`crate::writer::Writer`] over the *same* underlying stream (the
//! way the original embeds one `io.ReadWriteSeeker` in both halves). Rust's
//! ownership rules don't allow two structs to each independently own that
//! stream, so it is kept behind `Rc<RefCell<_>>` and handed out as clones
//! of this wrapper, consistent with §5's single-threaded, not-thread-safe
//! contract: a second concurrent borrow panics rather than racing.

use std::cell::RefCell;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::rc::Rc;

use crate::reader_at::ReaderAt;

pub struct SharedStream<RW>(Rc<RefCell<RW>>);

impl<RW> SharedStream<RW> {
    pub fn new(inner: RW) -> Self {
        Self(Rc::new(RefCell::new(inner)))
    }
}

impl<RW> Clone for SharedStream<RW> {
    fn clone(&self) -> Self {
        SharedStream(Rc::clone(&self.0))
    }
}

impl<RW: Read> Read for SharedStream<RW> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.borrow_mut().read(buf)
    }
}

impl<RW: Write> Write for SharedStream<RW> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

impl<RW: Seek> Seek for SharedStream<RW> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.0.borrow_mut().seek(pos)
    }
}

impl<RW: ReaderAt> ReaderAt for SharedStream<RW> {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        self.0.borrow().read_at(buf, offset)
    }
}
