//! Role row: the flat document shape a role record is stored as.

use serde::{Deserialize, Serialize};

use domain::{Claim, DomainError, DomainResult, RoleRecord};

use super::Entity;

/// Document attribute names used in scan conditions.
pub mod attr {
    pub const NORMALIZED_NAME: &str = "normalized_name";
}

/// Persisted role document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRow {
    pub id: String,
    pub name: String,
    pub normalized_name: String,
    #[serde(default)]
    pub claim_types: Vec<String>,
    #[serde(default)]
    pub claim_values: Vec<String>,
}

impl From<&RoleRecord> for RoleRow {
    fn from(record: &RoleRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            normalized_name: record.normalized_name.clone(),
            claim_types: record.claims.iter().map(|c| c.claim_type.clone()).collect(),
            claim_values: record
                .claims
                .iter()
                .map(|c| c.claim_value.clone())
                .collect(),
        }
    }
}

impl TryFrom<RoleRow> for RoleRecord {
    type Error = DomainError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        if row.claim_values.len() != row.claim_types.len() {
            return Err(DomainError::format(format!(
                "role {}: claim sequences disagree in length",
                row.id
            )));
        }

        let claims = row
            .claim_types
            .into_iter()
            .zip(row.claim_values)
            .map(|(claim_type, claim_value)| Claim {
                claim_type,
                claim_value,
            })
            .collect();

        Ok(RoleRecord {
            id: row.id,
            name: row.name,
            normalized_name: row.normalized_name,
            claims,
        })
    }
}

impl Entity for RoleRecord {
    type Row = RoleRow;

    fn key(&self) -> &str {
        &self.id
    }

    fn to_row(&self) -> RoleRow {
        RoleRow::from(self)
    }

    fn from_row(row: RoleRow) -> DomainResult<Self> {
        RoleRecord::try_from(row)
    }
}
