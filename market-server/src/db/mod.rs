//! Database layer - embedded redb key-value store

mod storage;

pub use storage::{MarketStorage, StorageError, StorageResult};
