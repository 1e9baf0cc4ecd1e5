//! Content-addressed deduplication of lines.
//!
//! The lookup structure is a `HashMap` keyed by the SHA-256 payload
//! fingerprint, pointing into an append-only `Vec` of entries. Payload
//! emission order depends only on the explicit insertion index bookkeeping,
//! never on map iteration order.
use std::collections::HashMap;

use crate::pack::bank::{BankAddress, BankCursor};
use crate::zsm::Line;

/// One entry per distinct line payload in the compressed dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictEntry {
    /// Number of original line occurrences sharing this payload.
    pub count: usize,
    /// 0-based first-seen index in encounter order; dense, gap-free, and
    /// the payload emission order of the serializer.
    pub insert_index: usize,
    /// Address assigned at first sight, never reassigned.
    pub address: BankAddress,
    /// SHA-256 digest of the payload bytes.
    pub fingerprint: [u8; 32],
}

/// Fingerprint-to-entry table built in one forward pass over the line list.
#[derive(Debug, Default)]
pub struct DedupTable {
    index: HashMap<[u8; 32], usize>,
    entries: Vec<DictEntry>,
}

impl DedupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `line`.
    ///
    /// A new fingerprint allocates an address for the line's byte length and
    /// appends a fresh entry; a repeat bumps the occurrence count and reuses
    /// the address recorded at first sight without touching the cursor.
    ///
    /// Returns the entry's address and whether this was the first sighting.
    pub fn record(&mut self, line: &Line, cursor: &mut BankCursor) -> (BankAddress, bool) {
        let fingerprint = line.fingerprint();
        match self.index.get(&fingerprint) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.count += 1;
                (entry.address, false)
            }
            None => {
                let address = cursor.alloc(line.len());
                let insert_index = self.entries.len();
                self.index.insert(fingerprint, insert_index);
                self.entries.push(DictEntry {
                    count: 1,
                    insert_index,
                    address,
                    fingerprint,
                });
                (address, true)
            }
        }
    }

    /// Entries in ascending insertion-index order.
    pub fn entries(&self) -> &[DictEntry] {
        &self.entries
    }

    /// Number of distinct payloads seen so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
