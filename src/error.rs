//! Typed error kinds for the container format.
//!
//! Mirrors the taxonomy in the teacher's storage crates: one `thiserror`
//! enum per concern, with `#[from]` bridging the underlying `std::io::Error`.

use std::io;

/// Failures decoding a single `IndexEntry` or `IndexFooter` from bytes.
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("invalid index entry")]
    InvalidIndexEntry,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("unsupported index version")]
    UnsupportedIndexVersion,
    #[error("i/o error")]
    Io(#[from] io::Error),
}

/// Failures reconstructing the chained, merged `Index` from a stream.
#[derive(thiserror::Error, Debug)]
pub enum IndexReadError {
    #[error("crc32 mismatch")]
    CRC32Mismatch,
    #[error("index is empty")]
    EmptyIndex,
    #[error("{cause} at offset {offset}")]
    AtOffset {
        #[source]
        cause: CodecError,
        offset: u64,
    },
    #[error("i/o error")]
    Io(#[from] io::Error),
}

impl IndexReadError {
    pub(crate) fn at(cause: CodecError, offset: u64) -> Self {
        IndexReadError::AtOffset { cause, offset }
    }
}

/// Writer API misuse and pass-through I/O failures.
#[derive(thiserror::Error, Debug)]
pub enum WriterError {
    #[error("WriteHeader was not called, or already flushed")]
    MissingHeader,
    #[error("writer is closed")]
    ClosedWriter,
    #[error("invalid index entry")]
    InvalidIndexEntry,
    #[error("i/o error")]
    Io(#[from] io::Error),
}

/// Reader-side failures: format errors surfaced via [`IndexReadError`], plus
/// sequential-read and capability errors.
#[derive(thiserror::Error, Debug)]
pub enum ReaderError {
    #[error(transparent)]
    IndexRead(#[from] IndexReadError),
    #[error("unexpected end of file")]
    UnexpectedEof,
    #[error("underlying stream does not support positioned reads")]
    InvalidReaderAt,
    #[error("i/o error")]
    Io(#[from] io::Error),
}

/// Malformed glob patterns.
#[derive(thiserror::Error, Debug)]
pub enum PatternError {
    #[error("unterminated character class in pattern")]
    UnterminatedClass,
    #[error("dangling escape at end of pattern")]
    DanglingEscape,
}
