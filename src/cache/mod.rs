//! Persistent local cache for asteroid records and the featured picture

mod store;

pub use store::{CacheStore, StoreError};
