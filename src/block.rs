//! Block: bounded-capacity sorted run of records
//!
//! A block keeps its entries sorted by record ordering at all times. The
//! capacity bound is owned by the store configuration; the block itself
//! only guarantees sortedness and order-preserving removal.

use crate::record::Record;

/// Internally sorted container of records, the unit of on-disk grouping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    entries: Vec<Record>,
}

impl Block {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a block from an arbitrary run of records, sorting it
    pub fn from_records(mut records: Vec<Record>) -> Self {
        records.sort();
        Self { entries: records }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Record] {
        &self.entries
    }

    pub fn contains(&self, record: &Record) -> bool {
        self.entries.binary_search(record).is_ok()
    }

    /// Insert at the sorted position. The caller checks the store-wide
    /// duplicate invariant and the capacity bound before calling.
    pub fn insert_sorted(&mut self, record: Record) {
        let pos = match self.entries.binary_search(&record) {
            Ok(pos) | Err(pos) => pos,
        };
        self.entries.insert(pos, record);
    }

    /// Remove the first entry equal to `record`, shifting the rest left.
    /// Returns true if a match was removed.
    pub fn remove(&mut self, record: &Record) -> bool {
        if let Some(pos) = self.entries.iter().position(|e| e == record) {
            self.entries.remove(pos);
            true
        } else {
            false
        }
    }

    /// Move all entries out, leaving the block empty
    pub fn drain(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.entries)
    }
}
