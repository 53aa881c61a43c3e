//! Identity Store Library
//!
//! This crate persists user and role records in a document database.
//! It exposes narrow capability traits per aggregate concern (passwords,
//! logins, claims, lockout, tokens, roles, ...) backed by a single
//! repository over any [`docstore::DocumentStore`] implementation.

pub mod config;
pub mod repository;
pub mod store;

pub use config::StoreConfig;
pub use repository::DataAccess;
pub use store::{DocumentRoleStore, DocumentUserStore};
