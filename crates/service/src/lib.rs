//! Service layer on top of the JSON document store.
//! - `storage` owns the on-disk layout and locking.
//! - `catalog` maps the schema and instance collections onto typed records.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod catalog;
