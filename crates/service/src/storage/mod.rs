//! Storage layer for the service crate
//!
//! A file-backed JSON document store keyed by `(collection, owner, entry)`.

pub mod json_doc_store;

pub use json_doc_store::{JsonDocStore, RECORD_EXT};
pub use configs::LockScope;
