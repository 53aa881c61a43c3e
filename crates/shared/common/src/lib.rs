//! Common utilities shared by the identity store crates.
//!
//! This crate provides:
//! - Unified error handling for store adapters
//! - Option helpers for lookup results

pub mod error;

pub use error::{AppError, AppResult, OptionExt};
