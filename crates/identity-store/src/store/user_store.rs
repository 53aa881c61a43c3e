//! User store: the capability traits an identity framework consumes,
//! implemented over the document repository.
//!
//! Mutators edit the record in memory only; nothing reaches the store
//! until `update` (or `create`) persists the whole record in one write.
//! Every method takes a cancellation token last and returns `Cancelled`
//! before any effect when the token is already triggered.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use tokio_util::sync::CancellationToken;

use common::{AppError, AppResult};
use docstore::DocumentStore;
use domain::{Claim, LoginInfo, UserRecord};

use crate::config::StoreConfig;
use crate::repository::entities::user::attr;
use crate::repository::{ensure_not_cancelled, DataAccess};

/// Base user store: persistence and identification.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a freshly constructed user
    async fn create(&self, user: &UserRecord, cancellation: &CancellationToken) -> AppResult<()>;

    /// Persist the current state of the record, refreshing its
    /// concurrency stamp
    async fn update(&self, user: &mut UserRecord, cancellation: &CancellationToken)
        -> AppResult<()>;

    /// Remove the user's document; missing documents are a no-op
    async fn delete(&self, user: &UserRecord, cancellation: &CancellationToken) -> AppResult<()>;

    /// Point lookup by primary key
    async fn find_by_id(
        &self,
        user_id: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<UserRecord>>;

    /// Scan lookup by normalized username
    async fn find_by_name(
        &self,
        normalized_user_name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<UserRecord>>;

    async fn user_id(&self, user: &UserRecord, cancellation: &CancellationToken)
        -> AppResult<String>;

    async fn user_name(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String>;

    /// Set the username; the normalized form is recomputed in the same
    /// step
    async fn set_user_name(
        &self,
        user: &mut UserRecord,
        user_name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn normalized_user_name(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String>;

    async fn set_normalized_user_name(
        &self,
        user: &mut UserRecord,
        normalized_user_name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;
}

/// Password hash storage.
#[async_trait]
pub trait UserPasswordStore: UserStore {
    /// Replace the password hash, rotating the security stamp
    async fn set_password_hash(
        &self,
        user: &mut UserRecord,
        password_hash: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn password_hash(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<String>>;

    async fn has_password(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<bool>;
}

/// Email address storage and lookup.
#[async_trait]
pub trait UserEmailStore: UserStore {
    async fn set_email(
        &self,
        user: &mut UserRecord,
        email: Option<&str>,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn email(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<String>>;

    async fn email_confirmed(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<bool>;

    async fn set_email_confirmed(
        &self,
        user: &mut UserRecord,
        confirmed: bool,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    /// Scan lookup by normalized email
    async fn find_by_email(
        &self,
        normalized_email: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<UserRecord>>;

    async fn normalized_email(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<String>>;

    async fn set_normalized_email(
        &self,
        user: &mut UserRecord,
        normalized_email: Option<&str>,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;
}

/// Phone number storage.
#[async_trait]
pub trait UserPhoneNumberStore: UserStore {
    async fn phone_number(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<String>>;

    async fn set_phone_number(
        &self,
        user: &mut UserRecord,
        phone_number: Option<&str>,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn phone_number_confirmed(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<bool>;

    async fn set_phone_number_confirmed(
        &self,
        user: &mut UserRecord,
        confirmed: bool,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;
}

/// External login linkage and reverse lookup.
#[async_trait]
pub trait UserLoginStore: UserStore {
    /// Link an external login; re-adding an existing pair is a no-op
    async fn add_login(
        &self,
        user: &mut UserRecord,
        login: LoginInfo,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    /// Unlink an external login, rotating the security stamp on removal
    async fn remove_login(
        &self,
        user: &mut UserRecord,
        provider: &str,
        provider_key: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn logins(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<LoginInfo>>;

    /// Resolve `(provider, provider_key)` back to its owner
    async fn find_by_login(
        &self,
        provider: &str,
        provider_key: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<UserRecord>>;
}

/// Claim storage and claim-holder search.
#[async_trait]
pub trait UserClaimStore: UserStore {
    async fn claims(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<Claim>>;

    async fn add_claims(
        &self,
        user: &mut UserRecord,
        claims: Vec<Claim>,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    /// Swap one held claim for another; absent claims are a no-op
    async fn replace_claim(
        &self,
        user: &mut UserRecord,
        old: &Claim,
        new: Claim,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn remove_claims(
        &self,
        user: &mut UserRecord,
        claims: &[Claim],
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    /// All users holding `claim`
    async fn users_for_claim(
        &self,
        claim: &Claim,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<UserRecord>>;
}

/// Security stamp storage.
#[async_trait]
pub trait UserSecurityStampStore: UserStore {
    async fn set_security_stamp(
        &self,
        user: &mut UserRecord,
        stamp: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn security_stamp(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String>;
}

/// Lockout bookkeeping.
#[async_trait]
pub trait UserLockoutStore: UserStore {
    async fn lockout_end(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<DateTime<FixedOffset>>>;

    async fn set_lockout_end(
        &self,
        user: &mut UserRecord,
        lockout_end: Option<DateTime<FixedOffset>>,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    /// Bump the failed-access counter, returning the new count
    async fn increment_access_failed_count(
        &self,
        user: &mut UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<u32>;

    async fn reset_access_failed_count(
        &self,
        user: &mut UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn access_failed_count(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<u32>;

    async fn lockout_enabled(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<bool>;

    async fn set_lockout_enabled(
        &self,
        user: &mut UserRecord,
        enabled: bool,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;
}

/// Two-factor flag storage.
#[async_trait]
pub trait UserTwoFactorStore: UserStore {
    async fn set_two_factor_enabled(
        &self,
        user: &mut UserRecord,
        enabled: bool,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn two_factor_enabled(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<bool>;
}

/// Authenticator key storage.
#[async_trait]
pub trait UserAuthenticatorKeyStore: UserStore {
    async fn set_authenticator_key(
        &self,
        user: &mut UserRecord,
        key: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn authenticator_key(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<String>>;
}

/// One-time recovery code storage.
#[async_trait]
pub trait UserRecoveryCodeStore: UserStore {
    /// Replace the full set of unused codes
    async fn replace_codes(
        &self,
        user: &mut UserRecord,
        codes: Vec<String>,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    /// Consume a code, returning whether it was unused
    async fn redeem_code(
        &self,
        user: &mut UserRecord,
        code: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<bool>;

    async fn count_codes(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<usize>;
}

/// Role membership, denormalized onto the user record.
#[async_trait]
pub trait UserRoleStore: UserStore {
    /// Add the user to a role by normalized name; duplicates are ignored
    async fn add_to_role(
        &self,
        user: &mut UserRecord,
        normalized_role: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn remove_from_role(
        &self,
        user: &mut UserRecord,
        normalized_role: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn roles(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<String>>;

    async fn is_in_role(
        &self,
        user: &UserRecord,
        normalized_role: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<bool>;

    /// All members of a role
    async fn users_in_role(
        &self,
        normalized_role: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<UserRecord>>;
}

/// Provider-issued token storage.
#[async_trait]
pub trait UserTokenStore: UserStore {
    /// Store a token value, overwriting an existing `(provider, name)`
    /// pair in place
    async fn set_token(
        &self,
        user: &mut UserRecord,
        provider: &str,
        name: &str,
        value: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn remove_token(
        &self,
        user: &mut UserRecord,
        provider: &str,
        name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()>;

    async fn token(
        &self,
        user: &UserRecord,
        provider: &str,
        name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<String>>;
}

/// Concrete user store over a document repository.
pub struct DocumentUserStore {
    data: DataAccess,
}

impl DocumentUserStore {
    /// Create a store over a shared engine handle.
    pub fn new(store: Arc<dyn DocumentStore>, config: StoreConfig) -> Self {
        Self {
            data: DataAccess::new(store, config),
        }
    }
}

#[async_trait]
impl UserStore for DocumentUserStore {
    async fn create(&self, user: &UserRecord, cancellation: &CancellationToken) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        self.data.save_user(user, cancellation).await
    }

    async fn update(
        &self,
        user: &mut UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.refresh_concurrency_stamp();
        self.data.save_user(user, cancellation).await
    }

    async fn delete(&self, user: &UserRecord, cancellation: &CancellationToken) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        self.data.delete_user(user, cancellation).await
    }

    async fn find_by_id(
        &self,
        user_id: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<UserRecord>> {
        ensure_not_cancelled(cancellation)?;
        self.data.get_user_by_id(user_id, cancellation).await
    }

    async fn find_by_name(
        &self,
        normalized_user_name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<UserRecord>> {
        ensure_not_cancelled(cancellation)?;
        self.data
            .get_user_by_attribute(attr::NORMALIZED_USER_NAME, normalized_user_name, cancellation)
            .await
    }

    async fn user_id(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.id.clone())
    }

    async fn user_name(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.user_name.clone())
    }

    async fn set_user_name(
        &self,
        user: &mut UserRecord,
        user_name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        if user_name.is_empty() {
            return Err(AppError::invalid_argument("user_name must not be empty"));
        }
        user.set_user_name(user_name);
        Ok(())
    }

    async fn normalized_user_name(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.normalized_user_name.clone())
    }

    async fn set_normalized_user_name(
        &self,
        user: &mut UserRecord,
        normalized_user_name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        if normalized_user_name.is_empty() {
            return Err(AppError::invalid_argument(
                "normalized_user_name must not be empty",
            ));
        }
        user.normalized_user_name = normalized_user_name.to_string();
        Ok(())
    }
}

#[async_trait]
impl UserPasswordStore for DocumentUserStore {
    async fn set_password_hash(
        &self,
        user: &mut UserRecord,
        password_hash: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.set_password_hash(password_hash);
        Ok(())
    }

    async fn password_hash(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<String>> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.password_hash.clone())
    }

    async fn has_password(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<bool> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.has_password())
    }
}

#[async_trait]
impl UserEmailStore for DocumentUserStore {
    async fn set_email(
        &self,
        user: &mut UserRecord,
        email: Option<&str>,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.email = email.map(str::to_string);
        Ok(())
    }

    async fn email(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<String>> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.email.clone())
    }

    async fn email_confirmed(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<bool> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.email_confirmed)
    }

    async fn set_email_confirmed(
        &self,
        user: &mut UserRecord,
        confirmed: bool,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.email_confirmed = confirmed;
        Ok(())
    }

    async fn find_by_email(
        &self,
        normalized_email: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<UserRecord>> {
        ensure_not_cancelled(cancellation)?;
        self.data
            .get_user_by_attribute(attr::NORMALIZED_EMAIL, normalized_email, cancellation)
            .await
    }

    async fn normalized_email(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<String>> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.normalized_email.clone())
    }

    async fn set_normalized_email(
        &self,
        user: &mut UserRecord,
        normalized_email: Option<&str>,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.normalized_email = normalized_email.map(str::to_string);
        Ok(())
    }
}

#[async_trait]
impl UserPhoneNumberStore for DocumentUserStore {
    async fn phone_number(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<String>> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.phone_number.clone())
    }

    async fn set_phone_number(
        &self,
        user: &mut UserRecord,
        phone_number: Option<&str>,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.phone_number = phone_number.map(str::to_string);
        Ok(())
    }

    async fn phone_number_confirmed(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<bool> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.phone_number_confirmed)
    }

    async fn set_phone_number_confirmed(
        &self,
        user: &mut UserRecord,
        confirmed: bool,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.phone_number_confirmed = confirmed;
        Ok(())
    }
}

#[async_trait]
impl UserLoginStore for DocumentUserStore {
    async fn add_login(
        &self,
        user: &mut UserRecord,
        login: LoginInfo,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.add_login(login);
        Ok(())
    }

    async fn remove_login(
        &self,
        user: &mut UserRecord,
        provider: &str,
        provider_key: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.remove_login(provider, provider_key);
        Ok(())
    }

    async fn logins(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<LoginInfo>> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.logins.clone())
    }

    async fn find_by_login(
        &self,
        provider: &str,
        provider_key: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<UserRecord>> {
        ensure_not_cancelled(cancellation)?;
        self.data
            .get_user_by_login(provider, provider_key, cancellation)
            .await
    }
}

#[async_trait]
impl UserClaimStore for DocumentUserStore {
    async fn claims(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<Claim>> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.claims.clone())
    }

    async fn add_claims(
        &self,
        user: &mut UserRecord,
        claims: Vec<Claim>,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        for claim in claims {
            user.add_claim(claim);
        }
        Ok(())
    }

    async fn replace_claim(
        &self,
        user: &mut UserRecord,
        old: &Claim,
        new: Claim,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.replace_claim(old, new);
        Ok(())
    }

    async fn remove_claims(
        &self,
        user: &mut UserRecord,
        claims: &[Claim],
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        for claim in claims {
            user.remove_claim(claim);
        }
        Ok(())
    }

    async fn users_for_claim(
        &self,
        claim: &Claim,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<UserRecord>> {
        ensure_not_cancelled(cancellation)?;
        self.data.get_users_by_claim(claim, cancellation).await
    }
}

#[async_trait]
impl UserSecurityStampStore for DocumentUserStore {
    async fn set_security_stamp(
        &self,
        user: &mut UserRecord,
        stamp: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.security_stamp = stamp.to_string();
        Ok(())
    }

    async fn security_stamp(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<String> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.security_stamp.clone())
    }
}

#[async_trait]
impl UserLockoutStore for DocumentUserStore {
    async fn lockout_end(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<DateTime<FixedOffset>>> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.lockout_end)
    }

    async fn set_lockout_end(
        &self,
        user: &mut UserRecord,
        lockout_end: Option<DateTime<FixedOffset>>,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.lockout_end = lockout_end;
        Ok(())
    }

    async fn increment_access_failed_count(
        &self,
        user: &mut UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<u32> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.increment_access_failed_count())
    }

    async fn reset_access_failed_count(
        &self,
        user: &mut UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.reset_access_failed_count();
        Ok(())
    }

    async fn access_failed_count(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<u32> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.access_failed_count)
    }

    async fn lockout_enabled(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<bool> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.lockout_enabled)
    }

    async fn set_lockout_enabled(
        &self,
        user: &mut UserRecord,
        enabled: bool,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.lockout_enabled = enabled;
        Ok(())
    }
}

#[async_trait]
impl UserTwoFactorStore for DocumentUserStore {
    async fn set_two_factor_enabled(
        &self,
        user: &mut UserRecord,
        enabled: bool,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.two_factor_enabled = enabled;
        Ok(())
    }

    async fn two_factor_enabled(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<bool> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.two_factor_enabled)
    }
}

#[async_trait]
impl UserAuthenticatorKeyStore for DocumentUserStore {
    async fn set_authenticator_key(
        &self,
        user: &mut UserRecord,
        key: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.authenticator_key = Some(key.to_string());
        Ok(())
    }

    async fn authenticator_key(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<String>> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.authenticator_key.clone())
    }
}

#[async_trait]
impl UserRecoveryCodeStore for DocumentUserStore {
    async fn replace_codes(
        &self,
        user: &mut UserRecord,
        codes: Vec<String>,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.replace_recovery_codes(codes);
        Ok(())
    }

    async fn redeem_code(
        &self,
        user: &mut UserRecord,
        code: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<bool> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.redeem_recovery_code(code))
    }

    async fn count_codes(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<usize> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.recovery_codes.len())
    }
}

#[async_trait]
impl UserRoleStore for DocumentUserStore {
    async fn add_to_role(
        &self,
        user: &mut UserRecord,
        normalized_role: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        if normalized_role.is_empty() {
            return Err(AppError::invalid_argument("role name must not be empty"));
        }
        user.add_to_role(normalized_role);
        Ok(())
    }

    async fn remove_from_role(
        &self,
        user: &mut UserRecord,
        normalized_role: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.remove_from_role(normalized_role);
        Ok(())
    }

    async fn roles(
        &self,
        user: &UserRecord,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<String>> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.roles.clone())
    }

    async fn is_in_role(
        &self,
        user: &UserRecord,
        normalized_role: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<bool> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.is_in_role(normalized_role))
    }

    async fn users_in_role(
        &self,
        normalized_role: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Vec<UserRecord>> {
        ensure_not_cancelled(cancellation)?;
        self.data.get_users_by_role(normalized_role, cancellation).await
    }
}

#[async_trait]
impl UserTokenStore for DocumentUserStore {
    async fn set_token(
        &self,
        user: &mut UserRecord,
        provider: &str,
        name: &str,
        value: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.set_token(provider, name, value);
        Ok(())
    }

    async fn remove_token(
        &self,
        user: &mut UserRecord,
        provider: &str,
        name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<()> {
        ensure_not_cancelled(cancellation)?;
        user.remove_token(provider, name);
        Ok(())
    }

    async fn token(
        &self,
        user: &UserRecord,
        provider: &str,
        name: &str,
        cancellation: &CancellationToken,
    ) -> AppResult<Option<String>> {
        ensure_not_cancelled(cancellation)?;
        Ok(user.token(provider, name).map(str::to_string))
    }
}
