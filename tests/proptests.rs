//! Property-based tests for the codec, filter, and path invariants (§8.1).

use std::io::Cursor;

use ibarchive::{glob_prefix, normalize_name, Header, Index, Reader, Writer};
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./-]{1,40}".prop_filter("non-empty after trim", |s| !s.is_empty())
}

proptest! {
    /// Invariant 4: writer-reader idempotence. Writing `[(name, body)]`
    /// with distinct names and reading back, after `Filter()`, yields
    /// exactly the same names with exactly the same body bytes.
    #[test]
    fn write_read_roundtrip(
        names in prop::collection::hash_set(name_strategy(), 1..8),
        payload in prop::collection::vec(any::<u8>(), 0..200),
    ) {
        let mut w = Writer::new(Vec::new());
        let names: Vec<String> = names.into_iter().collect();
        for name in &names {
            w.write_header(Header::new(name.clone(), 0o600, 0)).unwrap();
            w.write(&payload).unwrap();
        }
        w.close().unwrap();
        let bytes = w.into_inner();

        let mut r = Reader::new(Cursor::new(bytes));
        let filtered = r.index().unwrap().filter();
        prop_assert_eq!(filtered.len(), names.len());

        for name in &names {
            let entry = filtered.find(name).unwrap();
            r.seek(&entry).unwrap();
            let mut buf = vec![0u8; entry.size as usize];
            let mut total = 0;
            while total < buf.len() {
                let n = r.read(&mut buf[total..]).unwrap();
                prop_assert!(n > 0);
                total += n;
            }
            prop_assert_eq!(buf, payload.clone());
        }
    }

    /// Invariant 6: overwriting a name always surfaces the latest body
    /// after `Filter()`, regardless of body contents.
    #[test]
    fn overwrite_keeps_latest_body(
        first in prop::collection::vec(any::<u8>(), 1..50),
        second in prop::collection::vec(any::<u8>(), 1..50),
    ) {
        let mut w = Writer::new(Vec::new());
        w.write_header(Header::new("name", 0o600, 0)).unwrap();
        w.write(&first).unwrap();
        w.write_header(Header::new("name", 0o600, 0)).unwrap();
        w.write(&second).unwrap();
        w.close().unwrap();

        let mut r = Reader::new(Cursor::new(w.into_inner()));
        let idx = r.index().unwrap();
        prop_assert_eq!(idx.len(), 2);

        let filtered = idx.filter();
        prop_assert_eq!(filtered.len(), 1);
        let entry = filtered.find("name").unwrap();
        r.seek(&entry).unwrap();
        let mut buf = vec![0u8; entry.size as usize];
        let mut total = 0;
        while total < buf.len() {
            let n = r.read(&mut buf[total..]).unwrap();
            total += n;
        }
        prop_assert_eq!(buf, second);
    }

    /// Invariant 7: a tombstone makes `Find` return `None` regardless of
    /// what the name previously held.
    #[test]
    fn tombstone_hides_name(body in prop::collection::vec(any::<u8>(), 0..50)) {
        let mut w = Writer::new(Vec::new());
        w.write_header(Header::new("name", 0o600, 0)).unwrap();
        w.write(&body).unwrap();
        w.write_header(Header::new("name", 0o600, 0)).unwrap();
        w.mark_deleted().unwrap();
        w.close().unwrap();

        let mut r = Reader::new(Cursor::new(w.into_inner()));
        prop_assert!(r.index().unwrap().find("name").is_none());
    }

    /// Invariant 8: `ToSafePaths` is idempotent, and its output never
    /// contains a `.`/`..` segment or a backslash.
    #[test]
    fn safe_path_idempotent(raw in "[a-zA-Z0-9_./\\\\:-]{0,40}") {
        let once = normalize_name(&raw);
        let twice = normalize_name(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(!once.contains('\\'));
        prop_assert!(once.split('/').all(|seg| seg != "." && seg != ".."));
    }

    /// Invariant 9: `globPrefix(p)` is a prefix of every literal match of
    /// `p` (here: the pattern with its metacharacters replaced by fixed
    /// literal text forms a name that the prefix must still bound).
    #[test]
    fn glob_prefix_bounds_literal_match(
        literal_prefix in "[a-zA-Z0-9_/-]{0,15}",
        literal_suffix in "[a-zA-Z0-9_/-]{0,15}",
    ) {
        let pattern = format!("{literal_prefix}*{literal_suffix}");
        let prefix = glob_prefix(&pattern);
        prop_assert_eq!(&prefix, &literal_prefix);

        let literal_match = format!("{literal_prefix}{literal_suffix}");
        prop_assert!(literal_match.starts_with(&prefix));
    }

    /// Invariant 10: flipping any bit inside the index region (signature,
    /// version, or entries) either trips a decode error or the footer CRC
    /// check; corruption is never silently accepted.
    #[test]
    fn bit_flip_in_index_is_detected(byte_in_last_entry in 0usize..4) {
        let mut w = Writer::new(Vec::new());
        w.write_header(Header::new("a", 0o600, 0)).unwrap();
        w.write(b"hello").unwrap();
        w.close().unwrap();
        let mut bytes = w.into_inner();

        // Flip a bit inside the last entry's trailing flags field: four
        // bytes immediately before the 24-byte footer.
        let len = bytes.len();
        let pos = len - 24 - 4 + byte_in_last_entry;
        bytes[pos] ^= 0x01;

        let mut r = Reader::new(Cursor::new(bytes));
        prop_assert!(r.index().is_err());
    }
}

#[test]
fn empty_index_filter_is_empty() {
    assert!(Index::new().filter().is_empty());
}
