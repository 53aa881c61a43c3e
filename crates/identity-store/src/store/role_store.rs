//! Role store: role persistence and role-claim capability traits.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use common::{AppError, AppResult};
use docstore::DocumentStore;
use domain::{Claim, RoleRecord};

use crate::config::StoreConfig;
use crate::repository::{ensure_not_cancelled, DataAccess};

/// Base role store: persistence and identification.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Persist a freshly constructed role
    async fn create(&self, role: &RoleRecord, cancellation: &CancellationToken) -> AppResult<()>;

    /// Persist the current state of the record
    async fn update(&self, role: &RoleRecord, cancellation: &CancellationToken) -> AppResult<()>;

    /// Remove the role's document; membership lists on users are left
    /// untouched
    async fn delete(&self, role: &RoleRecord, cancellation: &CancellationToken) -> AppResult<()>;

    /// Point lookup by primary key
    async fn find_by_id(
        &self,
        role_id: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<RoleRecord>>;

    /// Scan lookup by normalized role name
    async fn find_by_name(
        &self,
        normalized_name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<RoleRecord>>;

    async fn role_id(
        &self,
        role: &RoleRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String>;

    async fn role_name(
        &self,
        role: &RoleRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String>;

    /// Set the display name; the normalized form is set separately
    async fn set_role_name(
        &self,
        role: &mut RoleRecord,
        name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn normalized_role_name(
        &self,
        role: &RoleRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String>;

    async fn set_normalized_role_name(
        &self,
        role: &mut RoleRecord,
        normalized_name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;
}

/// Role claim storage.
#[async_trait]
pub trait RoleClaimStore: RoleStore {
    async fn add_claim(
        &self,
        role: &mut RoleRecord,
        claim: Claim,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn claims(
        &self,
        role: &RoleRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<Claim>>;

    /// Remove the first held occurrence of `claim`; absent claims are a
    /// no-op
    async fn remove_claim(
        &self,
        role: &mut RoleRecord,
        claim: &Claim,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;
}

/// Concrete role store over a document repository.
pub struct DocumentRoleStore {
    data: DataAccess,
}

impl DocumentRoleStore {
    /// Create a store over a shared engine handle.
    pub fn new(store: Arc<dyn DocumentStore>, config: StoreConfig) -> Self {
        Self {
            data: DataAccess::new(store, config),
        }
    }
}

#[async_trait]
impl RoleStore for DocumentRoleStore {
    async fn create(&self, role: &RoleRecord, cancellation: &CancellationToken) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        self.data.save_role(role, cancellation).await
    }

    async fn update(&self, role: &RoleRecord, cancellation: &CancellationToken) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        self.data.save_role(role, cancellation).await
    }

    async fn delete(&self, role: &RoleRecord, cancellation: &CancellationToken) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        self.data.delete_role(role, cancellation).await
    }

    async fn find_by_id(
        &self,
        role_id: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<RoleRecord>> {
        ensure_not_cancelled(cancellation)?;
        self.data.get_role_by_id(role_id, cancellation).await
    }

    async fn find_by_name(
        &self,
        normalized_name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<RoleRecord>> {
        ensure_not_cancelled(cancellation)?;
        self.data.get_role_by_name(normalized_name, cancellation).await
    }

    async fn role_id(
        &self,
        role: &RoleRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String> {
        ensure_not_cancelled(cancellation)?;
        Ok(role.id.clone())
    }

    async fn role_name(
        &self,
        role: &RoleRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String> {
        ensure_not_cancelled(cancellation)?;
        Ok(role.name.clone())
    }

    async fn set_role_name(
        &self,
        role: &mut RoleRecord,
        name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        if name.is_empty() {
            return Err(AppError::invalid_argument("name must not be empty"));
        }
        role.name = name.to_string();
        Ok(())
    }

    async fn normalized_role_name(
        &self,
        role: &RoleRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String> {
        ensure_not_cancelled(cancellation)?;
        Ok(role.normalized_name.clone())
    }

    async fn set_normalized_role_name(
        &self,
        role: &mut RoleRecord,
        normalized_name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        if normalized_name.is_empty() {
            return Err(AppError::invalid_argument(
                "normalized_name must not be empty",
            ));
        }
        role.normalized_name = normalized_name.to_string();
        Ok(())
    }
}

#[async_trait]
impl RoleClaimStore for DocumentRoleStore {
    async fn add_claim(
        &self,
        role: &mut RoleRecord,
        claim: Claim,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        role.add_claim(claim);
        Ok(())
    }

    async fn claims(
        &self,
        role: &RoleRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<Claim>> {
        ensure_not_cancelled(cancellation)?;
        Ok(role.claims.clone())
    }

    async fn remove_claim(
        &self,
        role: &mut RoleRecord,
        claim: &Claim,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        role.remove_claim(claim);
        Ok(())
    }
}
