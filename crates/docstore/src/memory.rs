//! In-memory document store engine.
//!
//! Backs tests and local runs. Tables are created on first write, and
//! scans walk a hash map, so result order is unspecified just like the
//! engines this stands in for.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use crate::document::Document;
use crate::store::{DocumentStore, ScanCondition, StoreResult};

/// Hash-map backed [`DocumentStore`].
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, HashMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, table: &str, key: &str) -> StoreResult<Option<Document>> {
        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|rows| rows.get(key)).cloned())
    }

    async fn put(&self, table: &str, key: &str, document: Document) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), document);
        trace!(table, key, "put document");
        Ok(())
    }

    async fn delete(&self, table: &str, key: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.remove(key);
        }
        trace!(table, key, "delete document");
        Ok(())
    }

    async fn scan(
        &self,
        table: &str,
        conditions: Vec<ScanCondition>,
    ) -> StoreResult<Vec<Document>> {
        let tables = self.tables.read().await;
        let Some(rows) = tables.get(table) else {
            return Ok(Vec::new());
        };
        let matched: Vec<Document> = rows
            .values()
            .filter(|doc| conditions.iter().all(|c| c.matches(doc)))
            .cloned()
            .collect();
        trace!(table, matched = matched.len(), "scan");
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_get_misses_are_none() {
        let store = MemoryStore::new();
        assert!(store.get("users", "u1").await.unwrap().is_none());

        store.put("users", "u1", doc(json!({ "id": "u1" }))).await.unwrap();
        assert!(store.get("users", "u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let store = MemoryStore::new();
        let document = doc(json!({ "id": "u1", "name": "alice" }));
        store.put("users", "u1", document.clone()).await.unwrap();
        assert_eq!(store.get("users", "u1").await.unwrap(), Some(document));
    }

    #[tokio::test]
    async fn test_put_replaces_the_whole_document() {
        let store = MemoryStore::new();
        store
            .put("users", "u1", doc(json!({ "id": "u1", "name": "alice" })))
            .await
            .unwrap();
        store.put("users", "u1", doc(json!({ "id": "u1" }))).await.unwrap();

        let stored = store.get("users", "u1").await.unwrap().unwrap();
        assert!(stored.get("name").is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        store.put("users", "u1", doc(json!({ "id": "u1" }))).await.unwrap();

        store.delete("users", "u1").await.unwrap();
        store.delete("users", "u1").await.unwrap();
        store.delete("ghosts", "u1").await.unwrap();
        assert!(store.get("users", "u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_scan_without_conditions_returns_everything() {
        let store = MemoryStore::new();
        store.put("users", "u1", doc(json!({ "id": "u1" }))).await.unwrap();
        store.put("users", "u2", doc(json!({ "id": "u2" }))).await.unwrap();

        let all = store.scan("users", Vec::new()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_scan_applies_every_condition() {
        let store = MemoryStore::new();
        store
            .put(
                "users",
                "u1",
                doc(json!({ "id": "u1", "email": "A@X.COM", "roles": ["ADMIN"] })),
            )
            .await
            .unwrap();
        store
            .put(
                "users",
                "u2",
                doc(json!({ "id": "u2", "email": "B@X.COM", "roles": ["ADMIN", "EDITOR"] })),
            )
            .await
            .unwrap();

        let admins = store
            .scan("users", vec![ScanCondition::contains("roles", "ADMIN")])
            .await
            .unwrap();
        assert_eq!(admins.len(), 2);

        let narrowed = store
            .scan(
                "users",
                vec![
                    ScanCondition::contains("roles", "EDITOR"),
                    ScanCondition::eq("email", "B@X.COM"),
                ],
            )
            .await
            .unwrap();
        assert_eq!(narrowed.len(), 1);
        assert_eq!(narrowed[0].get("id"), Some(&json!("u2")));
    }

    #[tokio::test]
    async fn test_scan_of_missing_table_is_empty() {
        let store = MemoryStore::new();
        assert!(store.scan("nope", Vec::new()).await.unwrap().is_empty());
    }
}
