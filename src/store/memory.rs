use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use super::contract::{DocPath, DocumentStore, Precondition, StoreError, WriteOp};

// ============================================================================
// In-Memory Store
// ============================================================================
//
// Implements the full atomic-write contract over a lock-guarded map. The
// precondition is evaluated under the same write lock that applies the
// batch, so it is a genuine compare-and-swap. Backs every unit test and
// non-durable local runs.
//
// ============================================================================

#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<DocPath, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn document_count(&self) -> usize {
        self.documents.read().expect("store lock poisoned").len()
    }

    /// Paths of every stored document under the given prefix, for
    /// inspecting history logs and index buckets in tests.
    #[allow(dead_code)]
    pub fn paths_with_prefix(&self, prefix: &str) -> Vec<DocPath> {
        self.documents
            .read()
            .expect("store lock poisoned")
            .keys()
            .filter(|path| path.starts_with(prefix))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn allocate_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    fn server_timestamp(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn read(&self, path: &DocPath) -> Result<Option<Value>, StoreError> {
        let documents = self.documents.read().expect("store lock poisoned");
        Ok(documents.get(path).cloned())
    }

    async fn atomic_write(
        &self,
        writes: Vec<WriteOp>,
        precondition: Option<Precondition>,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().expect("store lock poisoned");

        if let Some(guard) = precondition {
            if !guard.holds(documents.get(&guard.path)) {
                return Err(StoreError::PreconditionFailed {
                    path: guard.path,
                    field: guard.field,
                    expected: guard.expected,
                });
            }
        }

        for write in writes {
            match write {
                WriteOp::Put(path, value) => {
                    documents.insert(path, value);
                }
                WriteOp::Delete(path) => {
                    documents.remove(&path);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: &[&str]) -> DocPath {
        DocPath::new(segments)
    }

    #[tokio::test]
    async fn test_batch_applies_all_writes() {
        let store = MemoryStore::new();

        store
            .atomic_write(
                vec![
                    WriteOp::Put(path(&["orders", "o1"]), json!({"status": "created"})),
                    WriteOp::Put(path(&["index", "u1", "o1"]), json!(true)),
                ],
                None,
            )
            .await
            .unwrap();

        assert_eq!(store.document_count(), 2);
        assert_eq!(
            store.read(&path(&["index", "u1", "o1"])).await.unwrap(),
            Some(json!(true))
        );
    }

    #[tokio::test]
    async fn test_delete_removes_document() {
        let store = MemoryStore::new();

        store
            .atomic_write(
                vec![WriteOp::Put(path(&["index", "created", "o1"]), json!(true))],
                None,
            )
            .await
            .unwrap();
        store
            .atomic_write(
                vec![
                    WriteOp::Delete(path(&["index", "created", "o1"])),
                    WriteOp::Put(path(&["index", "cancelled", "o1"]), json!(true)),
                ],
                None,
            )
            .await
            .unwrap();

        assert_eq!(
            store.read(&path(&["index", "created", "o1"])).await.unwrap(),
            None
        );
        assert_eq!(
            store
                .read(&path(&["index", "cancelled", "o1"]))
                .await
                .unwrap(),
            Some(json!(true))
        );
    }

    #[tokio::test]
    async fn test_failed_precondition_writes_nothing() {
        let store = MemoryStore::new();

        store
            .atomic_write(
                vec![WriteOp::Put(
                    path(&["orders", "o1"]),
                    json!({"status": "created", "version": 2}),
                )],
                None,
            )
            .await
            .unwrap();

        let guard = Precondition::field_equals(path(&["orders", "o1"]), "version", json!(1));
        let result = store
            .atomic_write(
                vec![
                    WriteOp::Put(path(&["orders", "o1"]), json!({"status": "cancelled"})),
                    WriteOp::Put(path(&["index", "cancelled", "o1"]), json!(true)),
                ],
                Some(guard),
            )
            .await;

        assert!(matches!(result, Err(StoreError::PreconditionFailed { .. })));
        assert_eq!(
            store.read(&path(&["orders", "o1"])).await.unwrap(),
            Some(json!({"status": "created", "version": 2}))
        );
        assert_eq!(
            store
                .read(&path(&["index", "cancelled", "o1"]))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_matching_precondition_commits_batch() {
        let store = MemoryStore::new();

        store
            .atomic_write(
                vec![WriteOp::Put(
                    path(&["orders", "o1"]),
                    json!({"status": "created", "version": 1}),
                )],
                None,
            )
            .await
            .unwrap();

        let guard = Precondition::field_equals(path(&["orders", "o1"]), "version", json!(1));
        store
            .atomic_write(
                vec![WriteOp::Put(
                    path(&["orders", "o1"]),
                    json!({"status": "cancelled", "version": 2}),
                )],
                Some(guard),
            )
            .await
            .unwrap();

        let stored = store.read(&path(&["orders", "o1"])).await.unwrap().unwrap();
        assert_eq!(stored["status"], "cancelled");
        assert_eq!(stored["version"], 2);
    }

    #[tokio::test]
    async fn test_precondition_on_absent_document_fails() {
        let store = MemoryStore::new();

        let guard = Precondition::field_equals(path(&["orders", "missing"]), "version", json!(1));
        let result = store
            .atomic_write(
                vec![WriteOp::Put(path(&["orders", "missing"]), json!({}))],
                Some(guard),
            )
            .await;

        assert!(matches!(result, Err(StoreError::PreconditionFailed { .. })));
        assert_eq!(store.document_count(), 0);
    }
}
