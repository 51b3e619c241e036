//! Engine: insert / delete / find over the persistent store
//!
//! Every operation is synchronous and self-contained: load the whole store,
//! mutate or scan in memory, save the whole store (mutations only). The
//! backing file is assumed to be exclusively owned by this process, so no
//! locking is needed.

use crate::block::Block;
use crate::config::StoreConfig;
use crate::record::Record;
use crate::store::Store;
use crate::Result;
use std::path::{Path, PathBuf};

/// Multimap engine over a single backing file
pub struct Engine {
    path: PathBuf,
    config: StoreConfig,
}

impl Engine {
    /// Open an engine on `path`. The file is created lazily by the first
    /// insert; an absent file behaves as an empty store.
    pub fn open<P: AsRef<Path>>(path: P, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            config,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Insert (key, value) unless an equal record already exists anywhere
    /// in the store. Rebuilds eagerly when the block count crosses the
    /// threshold, within the same call.
    pub fn insert(&self, key: &str, value: i32) -> Result<()> {
        let record = Record::new(key, value)?;
        let mut store = Store::load(&self.path)?;

        if store.contains(&record) {
            return Ok(());
        }

        let capacity = self.config.block_capacity;
        match store.blocks.iter_mut().find(|b| b.len() < capacity) {
            Some(block) => block.insert_sorted(record),
            None => {
                let mut block = Block::new();
                block.insert_sorted(record);
                store.blocks.push(block);
            }
        }

        if store.blocks.len() > self.config.rebuild_threshold {
            store.rebuild(capacity);
        }

        store.save(&self.path)
    }

    /// Remove the first record equal to (key, value), scanning blocks in
    /// sequence order. A miss leaves the file untouched.
    pub fn delete(&self, key: &str, value: i32) -> Result<()> {
        let record = Record::new(key, value)?;
        let mut store = Store::load(&self.path)?;

        for block in &mut store.blocks {
            if block.remove(&record) {
                return store.save(&self.path);
            }
        }
        Ok(())
    }

    /// All values associated with `key`, ascending. The store never holds
    /// duplicate records, so no deduplication is needed here.
    pub fn find(&self, key: &str) -> Result<Vec<i32>> {
        let store = Store::load(&self.path)?;

        let mut values: Vec<i32> = store
            .blocks
            .iter()
            .flat_map(|b| b.entries())
            .filter(|r| r.key() == key)
            .map(Record::value)
            .collect();
        values.sort_unstable();
        Ok(values)
    }
}
