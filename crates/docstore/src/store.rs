//! Document store contract and scan conditions.

use async_trait::async_trait;
use serde_json::Value;

use crate::document::Document;
use crate::error::StoreError;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Comparison applied by a scan condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOp {
    /// Attribute equals the value
    Eq,
    /// Attribute is a list containing the value
    Contains,
}

/// One attribute filter applied engine-side during a table scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanCondition {
    pub attribute: String,
    pub op: ScanOp,
    pub value: Value,
}

impl ScanCondition {
    pub fn eq(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            op: ScanOp::Eq,
            value: value.into(),
        }
    }

    pub fn contains(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            op: ScanOp::Contains,
            value: value.into(),
        }
    }

    /// Whether a document satisfies this condition. Missing attributes
    /// never match.
    pub fn matches(&self, document: &Document) -> bool {
        let Some(attribute) = document.get(&self.attribute) else {
            return false;
        };
        match self.op {
            ScanOp::Eq => attribute == &self.value,
            ScanOp::Contains => {
                matches!(attribute, Value::Array(items) if items.contains(&self.value))
            }
        }
    }
}

/// Document store contract for dependency injection.
///
/// Keys are opaque strings and tables are addressed by name; engines
/// may create tables lazily on first write. A `get` miss is `Ok(None)`,
/// never an error, and `delete` of an absent key is a no-op.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by primary key
    async fn get(&self, table: &str, key: &str) -> StoreResult<Option<Document>>;

    /// Insert or fully replace the document under `key`
    async fn put(&self, table: &str, key: &str, document: Document) -> StoreResult<()>;

    /// Remove a document by primary key
    async fn delete(&self, table: &str, key: &str) -> StoreResult<()>;

    /// Full-table scan returning every document that satisfies all
    /// `conditions`; order is engine-defined
    async fn scan(
        &self,
        table: &str,
        conditions: Vec<ScanCondition>,
    ) -> StoreResult<Vec<Document>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_eq_matches_scalar_attributes() {
        let document = doc(json!({ "name": "ALICE", "count": 3 }));
        assert!(ScanCondition::eq("name", "ALICE").matches(&document));
        assert!(ScanCondition::eq("count", 3).matches(&document));
        assert!(!ScanCondition::eq("name", "BOB").matches(&document));
    }

    #[test]
    fn test_eq_never_matches_missing_attributes() {
        let document = doc(json!({ "name": "ALICE" }));
        assert!(!ScanCondition::eq("email", "ALICE").matches(&document));
    }

    #[test]
    fn test_contains_matches_list_membership() {
        let document = doc(json!({ "roles": ["ADMIN", "EDITOR"] }));
        assert!(ScanCondition::contains("roles", "ADMIN").matches(&document));
        assert!(!ScanCondition::contains("roles", "VIEWER").matches(&document));
    }

    #[test]
    fn test_contains_never_matches_scalar_attributes() {
        let document = doc(json!({ "roles": "ADMIN" }));
        assert!(!ScanCondition::contains("roles", "ADMIN").matches(&document));
    }
}
