//! Repository layer for data access.

pub mod entities;

mod data_access;

pub use data_access::DataAccess;

use common::{AppError, AppResult};
use tokio_util::sync::CancellationToken;

/// Fail fast when the caller has already cancelled, before any state
/// change or store traffic.
pub(crate) fn ensure_not_cancelled(token: &CancellationToken) -> AppResult<()> {
    if token.is_cancelled() {
        return Err(AppError::Cancelled);
    }
    Ok(())
}
