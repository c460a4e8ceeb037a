//! Per-batch collision counters.
//!
//! A batch (the types of one module, the methods or fields of one type) is
//! always walked in declaration order. Each sibling's candidate name is hashed
//! with [`content_hash`]; the first candidate with a given hash is kept as is,
//! later ones get `_0`, `_1`, ... in walk order. Since the walk order never
//! depends on which sibling was requested first, neither do the suffixes.

use std::collections::hash_map::Entry;

use kiln_text::{content_hash, ByteStringBuffer};
use rustc_hash::FxHashMap;

#[derive(Default)]
pub(crate) struct Disambiguator {
    /// Candidate hash -> next suffix for that hash.
    counts: FxHashMap<u32, u32>,
    collisions: usize,
}

impl Disambiguator {
    /// Make the candidate occupying `buf[start..]` unique within the batch,
    /// appending a numeric suffix if an earlier sibling claimed it.
    ///
    /// A suffixed name is itself registered, so a later sibling literally
    /// named like it (`Foo` then `Foo` then `Foo_0`) is suffixed in turn.
    pub(crate) fn disambiguate(&mut self, buf: &mut ByteStringBuffer, start: usize) {
        let hash = content_hash(buf.view_from(start));
        if let Entry::Vacant(slot) = self.counts.entry(hash) {
            slot.insert(0);
            return;
        }

        self.collisions += 1;
        let base_len = buf.len();
        loop {
            let suffix = self.next_suffix(hash);
            buf.append_ascii('_');
            buf.append_int(i64::from(suffix));

            let suffixed = content_hash(buf.view_from(start));
            if let Entry::Vacant(slot) = self.counts.entry(suffixed) {
                slot.insert(0);
                return;
            }
            buf.truncate(base_len);
        }
    }

    fn next_suffix(&mut self, hash: u32) -> u32 {
        let count = self.counts.entry(hash).or_insert(0);
        let suffix = *count;
        *count += 1;
        suffix
    }

    /// Number of candidates that needed a suffix.
    pub(crate) fn collisions(&self) -> usize {
        self.collisions
    }
}
