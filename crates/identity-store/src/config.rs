//! Identity store configuration.

use std::env;

use domain::{DEFAULT_ROLES_TABLE, DEFAULT_USERS_TABLE};

/// Identity store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Table holding user documents
    pub users_table: String,
    /// Table holding role documents
    pub roles_table: String,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            users_table: env::var("IDENTITY_USERS_TABLE")
                .unwrap_or_else(|_| DEFAULT_USERS_TABLE.to_string()),
            roles_table: env::var("IDENTITY_ROLES_TABLE")
                .unwrap_or_else(|_| DEFAULT_ROLES_TABLE.to_string()),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            users_table: DEFAULT_USERS_TABLE.to_string(),
            roles_table: DEFAULT_ROLES_TABLE.to_string(),
        }
    }
}
