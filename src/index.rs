//! The logical index: chain-of-blocks bootstrap, filtering, lookup, and
//! glob. (§4.4 step 1-6 bootstrap logic lives here since it is shared by
//! [`crate::reader::Reader`] and [`crate::readwriter::ReadWriter`]; §4.5
//! view operations live here entirely.)

use std::io::{Read, Seek, SeekFrom, Write};

use crate::entry::{self, IndexEntry, IndexFooter};
use crate::error::{CodecError, IndexReadError, PatternError};
use crate::hashed::{HashedReader, HashedWriter};
use crate::path;

/// A flat, non-owning sequence of [`IndexEntry`] records: the merged
/// logical view over some or all of a container's blocks.
#[derive(Debug, Clone, Default)]
pub struct Index(pub Vec<IndexEntry>);

impl Index {
    pub fn new() -> Self {
        Index(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IndexEntry> {
        self.0.iter()
    }

    /// Stable-sorts entries by `abs_start` ascending, as required before
    /// `Filter` and as the reader's `Index()` contract.
    pub fn sort_by_abs_start(&mut self) {
        self.0.sort_by_key(|e| e.abs_start);
    }

    /// Last-writer-wins collapse: for each unique `Name`, keeps only the
    /// entry with the greatest `abs_start`, and drops it entirely if that
    /// entry is a tombstone. Requires `self` sorted by `abs_start`
    /// ascending. O(n).
    pub fn filter(&self) -> Index {
        use std::collections::HashMap;

        let mut first_seen_order: Vec<String> = Vec::new();
        let mut latest_index: HashMap<String, usize> = HashMap::new();

        for (i, e) in self.0.iter().enumerate() {
            let key = e.name().to_string();
            if !latest_index.contains_key(&key) {
                first_seen_order.push(key.clone());
            }
            latest_index.insert(key, i);
        }

        let mut out = Vec::with_capacity(first_seen_order.len());
        for name in first_seen_order {
            let e = &self.0[latest_index[&name]];
            if !e.is_deleted() {
                out.push(e.clone());
            }
        }
        Index(out)
    }

    /// The entry in `Filter()` whose normalized name equals the normalized
    /// `name`, or `None`. Comparison is case-sensitive.
    pub fn find(&self, name: &str) -> Option<IndexEntry> {
        let target = path::normalize_name(name);
        self.filter()
            .0
            .into_iter()
            .find(|e| path::normalize_name(e.name()) == target)
    }

    /// A copy where every `Name` is rewritten through [`path::normalize_name`].
    pub fn to_safe_paths(&self) -> Index {
        Index(
            self.0
                .iter()
                .cloned()
                .map(|mut e| {
                    e.header.name = path::normalize_name(&e.header.name);
                    e
                })
                .collect(),
        )
    }

    /// All entries of `Filter()` whose normalized name matches `pattern`,
    /// in their existing order.
    pub fn glob(&self, pattern: &str) -> Result<Index, PatternError> {
        let filtered = self.filter();
        let mut out = Vec::new();
        for e in filtered.0.into_iter() {
            let normalized = path::normalize_name(e.name());
            if path::glob_match(&normalized, pattern)? {
                out.push(e);
            }
        }
        Ok(Index(out))
    }
}

impl IntoIterator for Index {
    type Item = IndexEntry;
    type IntoIter = std::vec::IntoIter<IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Walks the backward chain of blocks starting at `end`, the offset one
/// past the last byte of the last block (§4.4 steps 2-6). Returns the
/// concatenated, `abs_start`-sorted entries of every block visited.
pub fn read_chain<R: Read + Seek>(r: &mut R, end: u64) -> Result<Index, IndexReadError> {
    if end == 0 {
        return Err(IndexReadError::EmptyIndex);
    }

    let mut entries = Vec::new();
    let mut cursor = end;

    loop {
        let footer_offset = cursor
            .checked_sub(entry::FOOTER_SIZE)
            .ok_or_else(|| IndexReadError::at(CodecError::InvalidIndexEntry, cursor))?;

        r.seek(SeekFrom::Start(footer_offset))
            .map_err(IndexReadError::Io)?;
        let footer = IndexFooter::read_from(r).map_err(|e| IndexReadError::at(e, footer_offset))?;

        let index_offset = footer_offset
            .checked_sub(footer.index_size)
            .ok_or_else(|| IndexReadError::at(CodecError::InvalidIndexEntry, footer_offset))?;
        r.seek(SeekFrom::Start(index_offset))
            .map_err(IndexReadError::Io)?;

        let mut hr = HashedReader::new(&mut *r);
        let mut sig = [0u8; 3];
        hr.read_exact(&mut sig)
            .map_err(|_| IndexReadError::at(CodecError::InvalidSignature, index_offset))?;
        if sig != entry::SIGNATURE {
            return Err(IndexReadError::at(CodecError::InvalidSignature, index_offset));
        }
        let mut version = [0u8; 1];
        hr.read_exact(&mut version)
            .map_err(|_| IndexReadError::at(CodecError::UnsupportedIndexVersion, index_offset))?;
        if version[0] != entry::VERSION {
            return Err(IndexReadError::at(
                CodecError::UnsupportedIndexVersion,
                index_offset,
            ));
        }

        let mut block_entries = Vec::with_capacity(footer.entry_count as usize);
        for _ in 0..footer.entry_count {
            let e = IndexEntry::read_from(&mut hr)
                .map_err(|e| IndexReadError::at(e, index_offset))?;
            block_entries.push(e);
        }

        if hr.checksum() != footer.crc32 {
            return Err(IndexReadError::CRC32Mismatch);
        }

        // end-of-block (one past the footer) minus the whole block size
        // gives the absolute offset of this block's payload start.
        let block_end = footer_offset + entry::FOOTER_SIZE;
        let block_start = block_end
            .checked_sub(footer.block_size)
            .ok_or_else(|| IndexReadError::at(CodecError::InvalidIndexEntry, footer_offset))?;

        for mut e in block_entries {
            e.abs_start = block_start + e.start;
            entries.push(e);
        }

        if block_start == 0 {
            break;
        }
        cursor = block_start;
    }

    let mut index = Index(entries);
    index.sort_by_abs_start();
    tracing::debug!(entry_count = index.len(), "reconstructed logical index");
    Ok(index)
}

/// Writes one block's index (signature, version, entries, footer) to `w`
/// and returns the emitted footer. `payload_len` is the number of payload
/// bytes already written before this index, relative to the block start
/// (§4.3.1).
pub fn write_block<W: Write>(
    w: &mut HashedWriter<W>,
    entries: &[IndexEntry],
    payload_len: u64,
) -> Result<IndexFooter, CodecError> {
    w.reset();
    w.write_all(&entry::SIGNATURE)?;
    w.write_all(&[entry::VERSION])?;
    for e in entries {
        e.write_to(w)?;
    }

    let index_size = w.position();
    let crc32 = w.checksum();
    let block_size = payload_len + index_size + entry::FOOTER_SIZE;

    let footer = IndexFooter {
        entry_count: entries.len() as u32,
        index_size,
        block_size,
        crc32,
    };
    footer.write_to(w)?;
    Ok(footer)
}
