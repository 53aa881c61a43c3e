//! Role record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::normalize_name;
use crate::error::{DomainError, DomainResult};
use crate::user::Claim;

/// Role record: a named group users can belong to.
///
/// Membership lives on the user records; a role row only carries its
/// names and claims. The display name and its normalized form are set
/// independently by callers, mirroring the two-step rename flow of
/// identity frameworks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Primary key, generated at construction.
    pub id: String,
    pub name: String,
    /// Uppercase form of `name`, the case-insensitive lookup key.
    pub normalized_name: String,
    pub claims: Vec<Claim>,
}

impl RoleRecord {
    /// Create a role with a fresh id. Fails when `name` is empty.
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DomainError::invalid_argument("name must not be empty"));
        }
        let normalized_name = normalize_name(&name);
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            normalized_name,
            claims: Vec::new(),
        })
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
}
