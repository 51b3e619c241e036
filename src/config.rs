//! Store configuration
//!
//! Block capacity and the rebuild threshold are store-wide constants: they
//! control per-block scan cost and how much fragmentation is tolerated
//! before a rebuild merges and re-splits the whole file.

use crate::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum key length in bytes (excluding the on-disk NUL terminator)
pub const MAX_KEY_LEN: usize = 64;

/// On-disk width of the key field: MAX_KEY_LEN bytes plus NUL terminator
pub const KEY_FIELD_LEN: usize = MAX_KEY_LEN + 1;

/// Store configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum number of records per block
    pub block_capacity: usize,

    /// Rebuild when the block count exceeds this after an insert
    pub rebuild_threshold: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            block_capacity: 100,
            rebuild_threshold: 50,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: StoreConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject degenerate settings
    pub fn validate(&self) -> Result<()> {
        if self.block_capacity == 0 {
            return Err(StoreError::Config("block_capacity must be at least 1".into()));
        }
        if self.rebuild_threshold == 0 {
            return Err(StoreError::Config("rebuild_threshold must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_valid() {
        assert!(StoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = StoreConfig {
            block_capacity: 0,
            rebuild_threshold: 50,
        };
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"block_capacity": 8, "rebuild_threshold": 4}"#)
            .unwrap();
        file.flush().unwrap();

        let config = StoreConfig::from_file(file.path()).unwrap();
        assert_eq!(config.block_capacity, 8);
        assert_eq!(config.rebuild_threshold, 4);
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        file.flush().unwrap();

        assert!(StoreConfig::from_file(file.path()).is_err());
    }
}
