//! Document-table gateway shared by the user and role stores.
//!
//! Every read and write the identity stores perform goes through
//! [`DataAccess`]: records flatten to rows on the way in and rows are
//! rebuilt into records on the way out, so misaligned stored documents
//! are caught here rather than surfacing as silently shuffled relations.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use common::{AppError, AppResult};
use docstore::{Document, DocumentStore, ScanCondition};
use domain::{Claim, RoleRecord, UserRecord};

use super::entities::{role, user, Entity};
use super::ensure_not_cancelled;
use crate::config::StoreConfig;

/// Data access layer over a shared document store handle.
#[derive(Clone)]
pub struct DataAccess {
    store: Arc<dyn DocumentStore>,
    config: StoreConfig,
}

impl DataAccess {
    /// Create a gateway over a shared engine handle.
    pub fn new(store: Arc<dyn DocumentStore>, config: StoreConfig) -> Self {
        Self { store, config }
    }

    // =========================================================================
    // Generic core
    // =========================================================================

    /// Upsert a record by its primary key.
    async fn save<E: Entity>(
        &self,
        table: &str,
        record: &E,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        let document = encode(&record.to_row())?;
        self.store.put(table, record.key(), document).await?;
        debug!(table, key = record.key(), "saved record");
        Ok(())
    }

    /// Remove a record by key; missing keys are a no-op.
    async fn delete(&self, table: &str, key: &str, cancellation: &CancellationToken) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        self.store.delete(table, key).await?;
        debug!(table, key, "deleted record");
        Ok(())
    }

    /// Point lookup by primary key; absence is `Ok(None)`.
    async fn get_by_id<E: Entity>(
        &self,
        table: &str,
        id: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<E>> {
        ensure_not_cancelled(cancellation)?;
        match self.store.get(table, id).await? {
            Some(document) => decode::<E>(document).map(Some),
            None => Ok(None),
        }
    }

    /// First record matching the conditions, in engine scan order.
    async fn scan_first<E: Entity>(
        &self,
        table: &str,
        conditions: Vec<ScanCondition>,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<E>> {
        ensure_not_cancelled(cancellation)?;
        match self.store.scan(table, conditions).await?.into_iter().next() {
            Some(document) => decode::<E>(document).map(Some),
            None => Ok(None),
        }
    }

    /// All records matching the AND-combined conditions.
    async fn scan_where<E: Entity>(
        &self,
        table: &str,
        conditions: Vec<ScanCondition>,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<E>> {
        ensure_not_cancelled(cancellation)?;
        let documents = self.store.scan(table, conditions).await?;
        documents.into_iter().map(decode::<E>).collect()
    }

    // =========================================================================
    // User table
    // =========================================================================

    pub async fn save_user(&self, user: &UserRecord, cancellation: &CancellationToken) -> AppResult<()> {
        self.save(&self.config.users_table, user, cancellation).await
    }

    pub async fn delete_user(&self, user: &UserRecord, cancellation: &CancellationToken) -> AppResult<()> {
        self.delete(&self.config.users_table, user.key(), cancellation)
            .await
    }

    pub async fn get_user_by_id(
        &self,
        id: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<UserRecord>> {
        self.get_by_id(&self.config.users_table, id, cancellation).await
    }

    /// First user whose `attribute` equals `value`, in scan order.
    pub async fn get_user_by_attribute(
        &self,
        attribute: &str,
        value: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<UserRecord>> {
        self.scan_first(
            &self.config.users_table,
            vec![ScanCondition::eq(attribute, value)],
            cancellation,
        )
        .await
    }

    /// Resolve an external login back to its owner.
    ///
    /// The engine-side `contains` conditions narrow each sequence
    /// independently, so a candidate may hold the provider and the key at
    /// different indexes. Only a user with the pair at one index is a
    /// match.
    pub async fn get_user_by_login(
        &self,
        provider: &str,
        provider_key: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<UserRecord>> {
        let candidates: Vec<UserRecord> = self
            .scan_where(
                &self.config.users_table,
                vec![
                    ScanCondition::contains(user::attr::LOGIN_PROVIDERS, provider),
                    ScanCondition::contains(user::attr::LOGIN_PROVIDER_KEYS, provider_key),
                ],
                cancellation,
            )
            .await?;

        Ok(candidates
            .into_iter()
            .find(|candidate| candidate.find_login(provider, provider_key).is_some()))
    }

    /// All users holding `claim`, with the type and value at one index.
    pub async fn get_users_by_claim(
        &self,
        claim: &Claim,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<UserRecord>> {
        let candidates: Vec<UserRecord> = self
            .scan_where(
                &self.config.users_table,
                vec![
                    ScanCondition::contains(user::attr::CLAIM_TYPES, claim.claim_type.as_str()),
                    ScanCondition::contains(user::attr::CLAIM_VALUES, claim.claim_value.as_str()),
                ],
                cancellation,
            )
            .await?;

        Ok(candidates
            .into_iter()
            .filter(|candidate| candidate.has_claim(claim))
            .collect())
    }

    /// All members of a role, by normalized role name.
    pub async fn get_users_by_role(
        &self,
        normalized_role: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<UserRecord>> {
        self.scan_where(
            &self.config.users_table,
            vec![ScanCondition::contains(user::attr::ROLES, normalized_role)],
            cancellation,
        )
        .await
    }

    // =========================================================================
    // Role table
    // =========================================================================

    pub async fn save_role(&self, role: &RoleRecord, cancellation: &CancellationToken) -> AppResult<()> {
        self.save(&self.config.roles_table, role, cancellation).await
    }

    pub async fn delete_role(&self, role: &RoleRecord, cancellation: &CancellationToken) -> AppResult<()> {
        self.delete(&self.config.roles_table, role.key(), cancellation)
            .await
    }

    pub async fn get_role_by_id(
        &self,
        id: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<RoleRecord>> {
        self.get_by_id(&self.config.roles_table, id, cancellation).await
    }

    /// First role whose normalized name equals `normalized_name`.
    pub async fn get_role_by_name(
        &self,
        normalized_name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<RoleRecord>> {
        self.scan_first(
            &self.config.roles_table,
            vec![ScanCondition::eq(role::attr::NORMALIZED_NAME, normalized_name)],
            cancellation,
        )
        .await
    }
}

fn encode<R: serde::Serialize>(row: &R) -> AppResult<Document> {
    match serde_json::to_value(row) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::decode("row did not encode to a document")),
        Err(e) => Err(AppError::decode(format!("failed to encode row: {e}"))),
    }
}

fn decode<E: Entity>(document: Document) -> AppResult<E> {
    let row: E::Row = serde_json::from_value(Value::Object(document)).map_err(|e| {
        let err = AppError::decode(format!("failed to decode row: {e}"));
        warn!(code = err.code(), error = %e, "stored document does not match the row shape");
        err
    })?;
    E::from_row(row).map_err(|e| {
        let err = AppError::from(e);
        warn!(code = err.code(), error = %err, "stored document failed validation");
        err
    })
}
