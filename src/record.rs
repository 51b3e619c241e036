//! Record: a single (key, value) pair
//!
//! Records are ordered lexicographically by key, then numerically by value.
//! On disk a record is a fixed-width 69-byte cell: a NUL-terminated 65-byte
//! key field followed by a little-endian i32 value.

use crate::config::{KEY_FIELD_LEN, MAX_KEY_LEN};
use crate::{Result, StoreError};
use std::cmp::Ordering;
use std::io::{Read, Write};

/// Encoded record size in bytes
pub const RECORD_LEN: usize = KEY_FIELD_LEN + 4;

/// A (key, value) pair stored in the multimap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    key: String,
    value: i32,
}

impl Record {
    /// Create a record, enforcing the key-length limit at the boundary
    /// instead of relying on buffer geometry.
    pub fn new(key: &str, value: i32) -> Result<Self> {
        validate_key(key)?;
        Ok(Self {
            key: key.to_string(),
            value,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Write the fixed-width encoding: key bytes, NUL padding to 65, value
    pub fn encode<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut field = [0u8; KEY_FIELD_LEN];
        field[..self.key.len()].copy_from_slice(self.key.as_bytes());
        writer.write_all(&field)?;
        writer.write_all(&self.value.to_le_bytes())?;
        Ok(())
    }

    /// Read one fixed-width record cell
    pub fn decode<R: Read>(reader: &mut R) -> Result<Self> {
        let mut field = [0u8; KEY_FIELD_LEN];
        reader.read_exact(&mut field)?;

        let end = field
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| StoreError::Corrupted("key field missing NUL terminator".into()))?;
        let key = std::str::from_utf8(&field[..end])
            .map_err(|_| StoreError::Corrupted("key field is not valid UTF-8".into()))?
            .to_string();

        let mut value_buf = [0u8; 4];
        reader.read_exact(&mut value_buf)?;

        Ok(Self {
            key,
            value: i32::from_le_bytes(value_buf),
        })
    }
}

impl Ord for Record {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.value.cmp(&other.value))
    }
}

impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Validate a key against the fixed on-disk field
pub fn validate_key(key: &str) -> Result<()> {
    if key.len() > MAX_KEY_LEN {
        return Err(StoreError::KeyTooLong {
            len: key.len(),
            max: MAX_KEY_LEN,
        });
    }
    if key.is_empty() {
        return Err(StoreError::InvalidData("key must not be empty".into()));
    }
    if key.as_bytes().contains(&0) {
        return Err(StoreError::InvalidData("key must not contain NUL bytes".into()));
    }
    Ok(())
}
