//! Document store abstraction for pluggable storage engines.
//!
//! The identity stores treat their database as a black box: schemaless
//! tables addressed by name, holding documents addressed by a string
//! primary key. This crate defines that contract plus an in-memory
//! engine used for tests and local runs.

pub mod document;
pub mod error;
pub mod memory;
pub mod store;

pub use document::Document;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{DocumentStore, ScanCondition, ScanOp, StoreResult};

#[cfg(any(test, feature = "test-utils"))]
pub use store::MockDocumentStore;
