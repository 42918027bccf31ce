//! Sorted-by-name fast path for `Glob` (§4.5.1).
//!
//! Built from a filtered, safe-path [`Index`], sorted lexicographically by
//! `Name`. `Glob` narrows the scan to the contiguous range bounded by the
//! pattern's literal prefix before running the full glob match, instead of
//! scanning every entry.

use crate::entry::IndexEntry;
use crate::error::PatternError;
use crate::index::Index;
use crate::path;

/// The filtered, safe-path view of an [`Index`], sorted by `Name`.
#[derive(Debug, Clone, Default)]
pub struct OrderedIndex(Vec<IndexEntry>);

impl OrderedIndex {
    /// Builds the ordered view: `index.filter().to_safe_paths()`, sorted by
    /// name.
    pub fn from_index(index: &Index) -> Self {
        let mut entries = index.filter().to_safe_paths().0;
        entries.sort_by(|a, b| a.name().cmp(b.name()));
        OrderedIndex(entries)
    }

    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| a.name().cmp(b.name()));
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

    /// Binary-searches the sorted slice for the range bounded by
    /// `glob_prefix(pattern)`, then matches only within that range, the
    /// same result `Index::glob` would give, in less than linear time over
    /// entries outside the prefix.
    pub fn glob(&self, pattern: &str) -> Result<Vec<IndexEntry>, PatternError> {
        let prefix = path::glob_prefix(pattern);

        let lo = self.0.partition_point(|e| e.name() < prefix.as_str());
        let hi = lo + self.0[lo..]
            .partition_point(|e| e.name().starts_with(prefix.as_str()));

        let mut out = Vec::new();
        for e in &self.0[lo..hi] {
            if path::glob_match(e.name(), pattern)? {
                out.push(e.clone());
            }
        }
        Ok(out)
    }
}

impl IntoIterator for OrderedIndex {
    type Item = IndexEntry;
    type IntoIter = std::vec::IntoIter<IndexEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
