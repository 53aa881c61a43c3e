//! Domain layer - identity records and value encodings.
//!
//! This crate contains the pure record shapes with no store dependencies:
//! the user and role aggregates, their relation types, and the timestamp
//! codec used when records are persisted as documents.

pub mod constants;
pub mod convert;
pub mod error;
pub mod role;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use role::RoleRecord;
pub use user::{AuthToken, Claim, LoginInfo, UserRecord};
