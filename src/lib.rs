//! A seekable, append-only archive container: pack any number of files
//! into one stream with random read access, bit-exact binary
//! reproducibility, per-entry CRC-32 integrity, and growth by appending new
//! blocks, including logical overwrite and deletion of entries already
//! written, without ever rewriting existing bytes.
//!
//! ```text
//! File  := Block+
//! Block := Payload Index
//!
//!   +------------------+
//!   | payload bytes     | --+
//!   +------------------+    |
//!   |        ...         |    |
//!   +------------------+    | block
//!   | "IBA" u8(version) |    |
//!   | IndexEntry × n     |    |
//!   | IndexFooter (24B)  | --+
//!   +------------------+
//! ```
//!
//! A [`Reader`] bootstraps from end-of-file (or an explicit offset, for a
//! container embedded in a larger file), reads the last block's footer,
//! walks `BlockSize`-derived backward pointers across every block, and
//! merges their entries into one [`Index`] sorted by absolute file offset.
//! A [`Writer`] is a one-shot append-only state machine: `WriteHeader` →
//! `Write`* → `Flush`/`Close`. A [`ReadWriter`] composes both over the same
//! stream so newly-written entries are visible to reads immediately.
//!
//! Out of scope (left to callers): packing/unpacking CLIs, filesystem
//! traversal, permission restoration, compression, encryption, and
//! concurrent writers.

mod entry;
mod error;
mod hashed;
mod index;
mod path;
mod reader;
mod reader_at;
mod readwriter;
mod shared_stream;
mod writer;

pub use entry::{Header, IndexEntry, IndexFooter, FLAG_DELETED};
pub use error::{CodecError, IndexReadError, PatternError, ReaderError, WriterError};
pub use index::Index;
pub use path::{glob_prefix, normalize_name};
pub use reader::{Reader, SectionReader};
pub use reader_at::ReaderAt;
pub use readwriter::ReadWriter;
pub use writer::Writer;

mod ordered;
pub use ordered::OrderedIndex;
