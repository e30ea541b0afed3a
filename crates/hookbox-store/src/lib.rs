// ABOUTME: Persistence layer for hookbox, owning the single on-disk record collection.
// ABOUTME: Provides RecordStore with serialized read-modify-write and crash-safe atomic replace.

mod atomic;
mod lock;
pub mod record_store;

pub use record_store::{RecordStore, StoreError};
