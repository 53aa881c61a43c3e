//! User row: the flat document shape a user record is stored as.
//!
//! Relation lists flatten into index-aligned parallel string sequences so
//! the document stays a bag of scalar and string-list attributes the
//! engine can filter on. Alignment holds by construction on the way in
//! and is re-checked on the way out.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use domain::convert;
use domain::{AuthToken, Claim, DomainError, DomainResult, LoginInfo, UserRecord};

use super::Entity;

/// Document attribute names used in scan conditions.
pub mod attr {
    pub const NORMALIZED_USER_NAME: &str = "normalized_user_name";
    pub const NORMALIZED_EMAIL: &str = "normalized_email";
    pub const LOGIN_PROVIDERS: &str = "login_providers";
    pub const LOGIN_PROVIDER_KEYS: &str = "login_provider_keys";
    pub const CLAIM_TYPES: &str = "claim_types";
    pub const CLAIM_VALUES: &str = "claim_values";
    pub const ROLES: &str = "roles";
}

/// Persisted user document.
///
/// Lists default to empty on decode because document engines commonly
/// drop empty attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub user_name: String,
    pub normalized_user_name: String,
    pub concurrency_stamp: String,
    pub security_stamp: String,
    pub password_hash: Option<String>,
    pub authenticator_key: Option<String>,
    pub email: Option<String>,
    pub normalized_email: Option<String>,
    pub email_confirmed: bool,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    pub two_factor_enabled: bool,
    pub lockout_enabled: bool,
    #[serde(default, with = "convert::datetime_offset")]
    pub lockout_end: Option<DateTime<FixedOffset>>,
    pub access_failed_count: u32,
    #[serde(default)]
    pub recovery_codes: Vec<String>,
    #[serde(default)]
    pub login_providers: Vec<String>,
    #[serde(default)]
    pub login_provider_keys: Vec<String>,
    #[serde(default)]
    pub login_provider_display_names: Vec<String>,
    #[serde(default)]
    pub claim_types: Vec<String>,
    #[serde(default)]
    pub claim_values: Vec<String>,
    #[serde(default)]
    pub token_login_providers: Vec<String>,
    #[serde(default)]
    pub token_names: Vec<String>,
    #[serde(default)]
    pub token_values: Vec<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl From<&UserRecord> for UserRow {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            user_name: record.user_name.clone(),
            normalized_user_name: record.normalized_user_name.clone(),
            concurrency_stamp: record.concurrency_stamp.clone(),
            security_stamp: record.security_stamp.clone(),
            password_hash: record.password_hash.clone(),
            authenticator_key: record.authenticator_key.clone(),
            email: record.email.clone(),
            normalized_email: record.normalized_email.clone(),
            email_confirmed: record.email_confirmed,
            phone_number: record.phone_number.clone(),
            phone_number_confirmed: record.phone_number_confirmed,
            two_factor_enabled: record.two_factor_enabled,
            lockout_enabled: record.lockout_enabled,
            lockout_end: record.lockout_end,
            access_failed_count: record.access_failed_count,
            recovery_codes: record.recovery_codes.clone(),
            login_providers: record.logins.iter().map(|l| l.provider.clone()).collect(),
            login_provider_keys: record
                .logins
                .iter()
                .map(|l| l.provider_key.clone())
                .collect(),
            login_provider_display_names: record
                .logins
                .iter()
                .map(|l| l.display_name.clone())
                .collect(),
            claim_types: record.claims.iter().map(|c| c.claim_type.clone()).collect(),
            claim_values: record
                .claims
                .iter()
                .map(|c| c.claim_value.clone())
                .collect(),
            token_login_providers: record.tokens.iter().map(|t| t.provider.clone()).collect(),
            token_names: record.tokens.iter().map(|t| t.name.clone()).collect(),
            token_values: record.tokens.iter().map(|t| t.value.clone()).collect(),
            roles: record.roles.clone(),
        }
    }
}

impl TryFrom<UserRow> for UserRecord {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        if row.login_provider_keys.len() != row.login_providers.len()
            || row.login_provider_display_names.len() != row.login_providers.len()
        {
            return Err(misaligned(&row.id, "login"));
        }
        if row.claim_values.len() != row.claim_types.len() {
            return Err(misaligned(&row.id, "claim"));
        }
        if row.token_names.len() != row.token_login_providers.len()
            || row.token_values.len() != row.token_login_providers.len()
        {
            return Err(misaligned(&row.id, "token"));
        }

        let logins = row
            .login_providers
            .into_iter()
            .zip(row.login_provider_keys)
            .zip(row.login_provider_display_names)
            .map(|((provider, provider_key), display_name)| LoginInfo {
                provider,
                provider_key,
                display_name,
            })
            .collect();
        let claims = row
            .claim_types
            .into_iter()
            .zip(row.claim_values)
            .map(|(claim_type, claim_value)| Claim {
                claim_type,
                claim_value,
            })
            .collect();
        let tokens = row
            .token_login_providers
            .into_iter()
            .zip(row.token_names)
            .zip(row.token_values)
            .map(|((provider, name), value)| AuthToken {
                provider,
                name,
                value,
            })
            .collect();

        Ok(UserRecord {
            id: row.id,
            user_name: row.user_name,
            normalized_user_name: row.normalized_user_name,
            concurrency_stamp: row.concurrency_stamp,
            security_stamp: row.security_stamp,
            password_hash: row.password_hash,
            authenticator_key: row.authenticator_key,
            email: row.email,
            normalized_email: row.normalized_email,
            email_confirmed: row.email_confirmed,
            phone_number: row.phone_number,
            phone_number_confirmed: row.phone_number_confirmed,
            two_factor_enabled: row.two_factor_enabled,
            lockout_enabled: row.lockout_enabled,
            lockout_end: row.lockout_end,
            access_failed_count: row.access_failed_count,
            recovery_codes: row.recovery_codes,
            logins,
            claims,
            tokens,
            roles: row.roles,
        })
    }
}

fn misaligned(id: &str, relation: &str) -> DomainError {
    DomainError::format(format!(
        "user {id}: {relation} sequences disagree in length"
    ))
}

impl Entity for UserRecord {
    type Row = UserRow;

    fn key(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> UserRow {
        UserRow::from(self)
    }

    fn from_row(row: UserRow) -> DomainResult<Self> {
        UserRecord::try_from(row)
    }
}
