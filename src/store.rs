//! Store: the full block sequence and its single backing file
//!
//! ## File format (all integers little-endian)
//! ```text
//! i32              block_count
//! repeated:
//!   i32            entry_count
//!   repeated:
//!     [u8; 65]     key (NUL-terminated)
//!     i32          value
//! ```
//!
//! The store owns the file exclusively: every load reads the whole file and
//! every save rewrites it from scratch. There is no append path and no
//! atomicity across a crash mid-save; that is an accepted limitation.

use crate::block::Block;
use crate::record::Record;
use crate::{Result, StoreError};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

/// Ordered sequence of blocks persisted as one file. Sequence order is not
/// a sort key; only intra-block order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    pub blocks: Vec<Block>,
}

impl Store {
    /// A well-formed empty store: exactly one empty block
    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::new()],
        }
    }

    /// Read the full block sequence. An absent file is an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = match File::open(path.as_ref()) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::empty()),
            Err(e) => return Err(e.into()),
        };
        let mut reader = BufReader::new(file);

        let block_count = read_count(&mut reader, "block count")?;
        let mut blocks = Vec::with_capacity(block_count);
        for _ in 0..block_count {
            let entry_count = read_count(&mut reader, "entry count")?;
            let mut entries = Vec::with_capacity(entry_count);
            for _ in 0..entry_count {
                entries.push(Record::decode(&mut reader)?);
            }
            blocks.push(Block::from_records(entries));
        }

        Ok(Self { blocks })
    }

    /// Overwrite the file with the full block sequence
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        write_count(&mut writer, self.blocks.len(), "block count")?;
        for block in &self.blocks {
            write_count(&mut writer, block.len(), "entry count")?;
            for record in block.entries() {
                record.encode(&mut writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// True if any block holds a record equal to `record`
    pub fn contains(&self, record: &Record) -> bool {
        self.blocks.iter().any(|b| b.contains(record))
    }

    /// Total record count across all blocks
    pub fn total_records(&self) -> usize {
        self.blocks.iter().map(Block::len).sum()
    }

    /// Flatten all blocks in block-then-intra-block order
    pub fn flatten(&mut self) -> Vec<Record> {
        let mut flat = Vec::with_capacity(self.total_records());
        for block in &mut self.blocks {
            flat.append(&mut block.drain());
        }
        flat
    }

    /// Merge and re-split: re-partition every record into consecutive
    /// capacity-sized blocks (the last may be smaller), each sorted
    /// internally. An empty store ends up with exactly one empty block.
    pub fn rebuild(&mut self, capacity: usize) {
        let flat = self.flatten();
        if flat.is_empty() {
            self.blocks = vec![Block::new()];
            return;
        }

        let mut blocks = Vec::with_capacity(flat.len().div_ceil(capacity));
        let mut flat = flat.into_iter().peekable();
        while flat.peek().is_some() {
            let chunk: Vec<Record> = flat.by_ref().take(capacity).collect();
            blocks.push(Block::from_records(chunk));
        }
        self.blocks = blocks;
    }
}

fn read_count<R: Read>(reader: &mut R, what: &str) -> Result<usize> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            StoreError::Corrupted(format!("truncated file while reading {}", what))
        } else {
            e.into()
        }
    })?;
    let count = i32::from_le_bytes(buf);
    if count < 0 {
        return Err(StoreError::Corrupted(format!("negative {}: {}", what, count)));
    }
    Ok(count as usize)
}

fn write_count<W: Write>(writer: &mut W, count: usize, what: &str) -> Result<()> {
    let count = i32::try_from(count)
        .map_err(|_| StoreError::InvalidData(format!("{} exceeds i32 range", what)))?;
    writer.write_all(&count.to_le_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn record(key: &str, value: i32) -> Record {
        Record::new(key, value).unwrap()
    }

    fn multiset(store: &Store) -> Vec<Record> {
        let mut all: Vec<Record> = store
            .blocks
            .iter()
            .flat_map(|b| b.entries().to_vec())
            .collect();
        all.sort();
        all
    }

    #[test]
    fn test_load_absent_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = Store::load(dir.path().join("missing.bin")).unwrap();
        assert_eq!(store.blocks.len(), 1);
        assert!(store.blocks[0].is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");

        let mut store = Store::empty();
        store.blocks[0].insert_sorted(record("alpha", 3));
        store.blocks[0].insert_sorted(record("alpha", 1));
        store.blocks.push(Block::from_records(vec![record("beta", -7)]));
        store.save(&path).unwrap();

        let loaded = Store::load(&path).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");

        let mut store = Store::empty();
        for v in 0..20 {
            store.blocks[0].insert_sorted(record("k", v));
        }
        store.save(&path).unwrap();

        let small = Store::empty();
        small.save(&path).unwrap();
        let loaded = Store::load(&path).unwrap();
        assert_eq!(loaded.total_records(), 0);
    }

    #[test]
    fn test_load_rejects_truncated_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");

        // Claims one block but holds no entry count.
        std::fs::write(&path, 1i32.to_le_bytes()).unwrap();
        assert!(matches!(
            Store::load(&path),
            Err(StoreError::Corrupted(_))
        ));
    }

    #[test]
    fn test_load_rejects_negative_block_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");

        std::fs::write(&path, (-1i32).to_le_bytes()).unwrap();
        assert!(matches!(
            Store::load(&path),
            Err(StoreError::Corrupted(_))
        ));
    }

    #[test]
    fn test_rebuild_preserves_multiset_and_bounds_blocks() {
        let mut store = Store::empty();
        // Many fragmented blocks of one record each.
        for v in 0..25 {
            store
                .blocks
                .push(Block::from_records(vec![record("frag", v)]));
        }
        let before = multiset(&store);

        store.rebuild(10);
        assert_eq!(multiset(&store), before);
        assert_eq!(store.blocks.len(), 3);
        assert!(store.blocks.iter().all(|b| b.len() <= 10));
        // Last chunk holds the remainder.
        assert_eq!(store.blocks[2].len(), 5);
    }

    #[test]
    fn test_rebuild_empty_store_keeps_one_empty_block() {
        let mut store = Store {
            blocks: vec![Block::new(), Block::new(), Block::new()],
        };
        store.rebuild(10);
        assert_eq!(store.blocks.len(), 1);
        assert!(store.blocks[0].is_empty());
    }

    #[test]
    fn test_rebuild_chunks_are_sorted_internally() {
        let mut store = Store::empty();
        for v in [9, 2, 7, 1, 8, 3] {
            store.blocks.push(Block::from_records(vec![record("k", v)]));
        }
        store.rebuild(4);
        for block in &store.blocks {
            assert!(block.entries().windows(2).all(|w| w[0] <= w[1]));
        }
        let values: BTreeSet<i32> = store
            .blocks
            .iter()
            .flat_map(|b| b.entries().iter().map(Record::value))
            .collect();
        assert_eq!(values.len(), 6);
    }
}
