//! User record and its relation types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::normalize_name;
use crate::error::{DomainError, DomainResult};

/// One external login linked to a user.
///
/// `(provider, provider_key)` is unique within a user and across users,
/// so a login can be resolved back to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInfo {
    pub provider: String,
    pub provider_key: String,
    pub display_name: String,
}

impl LoginInfo {
    pub fn new(
        provider: impl Into<String>,
        provider_key: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            provider_key: provider_key.into(),
            display_name: display_name.into(),
        }
    }
}

/// A claim held by a user or role. Users may hold duplicate pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_type: String,
    pub claim_value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, claim_value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            claim_value: claim_value.into(),
        }
    }
}

/// An authentication token issued to a user by a provider.
///
/// `(provider, name)` is unique per user; setting an existing pair
/// overwrites the value in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub provider: String,
    pub name: String,
    pub value: String,
}

/// User record: one authenticatable principal.
///
/// A self-contained aggregate persisted as a single row. Logins, claims,
/// tokens and role memberships are ordered lists on the record itself;
/// membership carries the normalized role name rather than a foreign key,
/// so deleting a role does not touch its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Primary key, generated at construction.
    pub id: String,
    pub user_name: String,
    /// Uppercase form of `user_name`, the case-insensitive lookup key.
    pub normalized_user_name: String,
    /// Opaque version token, refreshed on every persisted update.
    /// Callers wanting optimistic concurrency compare it; nothing here
    /// enforces it.
    pub concurrency_stamp: String,
    /// Opaque token rotated whenever a credential-affecting field changes.
    pub security_stamp: String,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub authenticator_key: Option<String>,
    pub email: Option<String>,
    pub normalized_email: Option<String>,
    pub email_confirmed: bool,
    pub phone_number: Option<String>,
    pub phone_number_confirmed: bool,
    pub two_factor_enabled: bool,
    pub lockout_enabled: bool,
    /// `None` and a past instant both mean "not locked out".
    pub lockout_end: Option<DateTime<FixedOffset>>,
    pub access_failed_count: u32,
    /// Unused one-time recovery codes.
    pub recovery_codes: Vec<String>,
    pub logins: Vec<LoginInfo>,
    pub claims: Vec<Claim>,
    pub tokens: Vec<AuthToken>,
    /// Normalized role names, no duplicates.
    pub roles: Vec<String>,
}

impl UserRecord {
    /// Create a user with a fresh id and stamps. Fails when `user_name`
    /// is empty.
    pub fn new(user_name: impl Into<String>) -> DomainResult<Self> {
        let user_name = user_name.into();
        if user_name.is_empty() {
            return Err(DomainError::invalid_argument("user_name must not be empty"));
        }
        let normalized_user_name = normalize_name(&user_name);
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_name,
            normalized_user_name,
            concurrency_stamp: Uuid::new_v4().to_string(),
            security_stamp: Uuid::new_v4().to_string(),
            password_hash: None,
            authenticator_key: None,
            email: None,
            normalized_email: None,
            email_confirmed: false,
            phone_number: None,
            phone_number_confirmed: false,
            two_factor_enabled: false,
            lockout_enabled: false,
            lockout_end: None,
            access_failed_count: 0,
            recovery_codes: Vec::new(),
            logins: Vec::new(),
            claims: Vec::new(),
            tokens: Vec::new(),
            roles: Vec::new(),
        })
    }

    /// Whether a non-empty password hash is set.
    pub fn has_password(&self) -> bool {
        self.password_hash.as_deref().is_some_and(|hash| !hash.is_empty())
    }

    /// Set the username and recompute its normalized form.
    pub fn set_user_name(&mut self, user_name: impl Into<String>) {
        self.user_name = user_name.into();
        self.normalized_user_name = normalize_name(&self.user_name);
    }

    /// Replace the password hash, rotating the security stamp so existing
    /// sessions are invalidated.
    pub fn set_password_hash(&mut self, hash: impl Into<String>) {
        self.rotate_security_stamp();
        self.password_hash = Some(hash.into());
    }

    /// Refresh the opaque version token; done on every persisted update.
    pub fn refresh_concurrency_stamp(&mut self) {
        self.concurrency_stamp = Uuid::new_v4().to_string();
    }

    fn rotate_security_stamp(&mut self) {
        self.security_stamp = Uuid::new_v4().to_string();
    }

    pub fn find_login(&self, provider: &str, provider_key: &str) -> Option<&LoginInfo> {
        self.logins
            .iter()
            .find(|l| l.provider == provider && l.provider_key == provider_key)
    }

    /// Link an external login. Re-adding an existing `(provider, key)`
    /// pair is a no-op; returns whether the login was added.
    pub fn add_login(&mut self, login: LoginInfo) -> bool {
        if self.find_login(&login.provider, &login.provider_key).is_some() {
            return false;
        }
        self.logins.push(login);
        true
    }

    /// Unlink an external login, rotating the security stamp when an
    /// entry was actually removed.
    pub fn remove_login(&mut self, provider: &str, provider_key: &str) -> bool {
        let Some(index) = self
            .logins
            .iter()
            .position(|l| l.provider == provider && l.provider_key == provider_key)
        else {
            return false;
        };
        self.logins.remove(index);
        self.rotate_security_stamp();
        true
    }

    pub fn has_claim(&self, claim: &Claim) -> bool {
        self.claims.contains(claim)
    }

    pub fn add_claim(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    /// Remove the first occurrence of `claim`; returns whether one was
    /// held.
    pub fn remove_claim(&mut self, claim: &Claim) -> bool {
        match self.claims.iter().position(|c| c == claim) {
            Some(index) => {
                self.claims.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the first occurrence of `old` with `new`. No-op when `old`
    /// is not held.
    pub fn replace_claim(&mut self, old: &Claim, new: Claim) -> bool {
        match self.claims.iter().position(|c| c == old) {
            Some(index) => {
                self.claims[index] = new;
                true
            }
            None => false,
        }
    }

    /// Store a token value for `(provider, name)`, overwriting in place
    /// when the pair already exists.
    pub fn set_token(
        &mut self,
        provider: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        let provider = provider.into();
        let name = name.into();
        let value = value.into();
        match self
            .tokens
            .iter()
            .position(|t| t.provider == provider && t.name == name)
        {
            Some(index) => self.tokens[index].value = value,
            None => self.tokens.push(AuthToken { provider, name, value }),
        }
    }

    pub fn remove_token(&mut self, provider: &str, name: &str) -> bool {
        match self
            .tokens
            .iter()
            .position(|t| t.provider == provider && t.name == name)
        {
            Some(index) => {
                self.tokens.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn token(&self, provider: &str, name: &str) -> Option<&str> {
        self.tokens
            .iter()
            .find(|t| t.provider == provider && t.name == name)
            .map(|t| t.value.as_str())
    }

    /// Add the user to a role by normalized name; duplicates are ignored.
    pub fn add_to_role(&mut self, normalized_role: impl Into<String>) -> bool {
        let normalized_role = normalized_role.into();
        if self.roles.contains(&normalized_role) {
            return false;
        }
        self.roles.push(normalized_role);
        true
    }

    pub fn remove_from_role(&mut self, normalized_role: &str) -> bool {
        match self.roles.iter().position(|r| r == normalized_role) {
            Some(index) => {
                self.roles.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn is_in_role(&self, normalized_role: &str) -> bool {
        self.roles.iter().any(|r| r == normalized_role)
    }

    /// Replace the full set of unused recovery codes.
    pub fn replace_recovery_codes(&mut self, codes: impl IntoIterator<Item = String>) {
        self.recovery_codes = codes.into_iter().collect();
    }

    /// Consume a one-time recovery code; returns whether it was unused.
    pub fn redeem_recovery_code(&mut self, code: &str) -> bool {
        match self.recovery_codes.iter().position(|c| c == code) {
            Some(index) => {
                self.recovery_codes.remove(index);
                true
            }
            None => false,
        }
    }

    /// Bump the failed-access counter, returning the new count.
    pub fn increment_access_failed_count(&mut self) -> u32 {
        self.access_failed_count += 1;
        self.access_failed_count
    }

    pub fn reset_access_failed_count(&mut self) {
        self.access_failed_count = 0;
    }
}
