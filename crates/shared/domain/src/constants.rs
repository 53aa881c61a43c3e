//! Domain-level constants.
//!
//! These constants define the default storage locations and the
//! normalization rule shared by user and role names.

// =============================================================================
// Tables
// =============================================================================

/// Default table holding user records
pub const DEFAULT_USERS_TABLE: &str = "users";

/// Default table holding role records
pub const DEFAULT_ROLES_TABLE: &str = "roles";

// =============================================================================
// Normalization
// =============================================================================

/// Canonical uppercase form used for case-insensitive name and email lookups
pub fn normalize_name(value: &str) -> String {
    value.to_uppercase()
}
