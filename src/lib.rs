//! blockmap — persistent block-organized multimap
//!
//! Maps string keys (at most 64 bytes) to sets of 32-bit signed integers,
//! persisted in a single binary file.
//!
//! ## Architecture
//! - Record: fixed-width (key, value) pair, ordered by key then value
//! - Block: bounded-capacity sorted run of records
//! - Store: the full block sequence, read and rewritten wholly per mutation
//! - Engine: insert / delete / find, with eager rebuild (merge + re-split)
//!   once the block count crosses a threshold
//!
//! Single-threaded and fully synchronous: the backing file is exclusively
//! owned by the running process, and there is no crash-atomicity.

pub mod block;
pub mod command;
pub mod config;
pub mod engine;
pub mod record;
pub mod store;

mod error;

pub use config::{StoreConfig, MAX_KEY_LEN};
pub use engine::Engine;
pub use error::{Result, StoreError};
