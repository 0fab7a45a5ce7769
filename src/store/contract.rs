use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Document Store Contract
// ============================================================================
//
// The service persists orders, history entries, and index entries as JSON
// documents addressed by path. All writes that must be consistent with each
// other go through `atomic_write`: the whole batch applies or none of it
// does. Individual writes are never observable before the batch commits.
//
// ============================================================================

/// Slash-separated location of a single document, e.g.
/// `orders_delivery/<order-id>` or `orders_delivery_by_user/<user-id>/<order-id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath(String);

impl DocPath {
    pub fn new(segments: &[&str]) -> Self {
        Self(segments.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry in an atomic batch.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Put(DocPath, Value),
    Delete(DocPath),
}

/// Guard attached to an atomic batch. The store must refuse the whole batch
/// when the stored document's field no longer holds the expected value, or
/// when the document is absent.
#[derive(Debug, Clone)]
pub struct Precondition {
    pub path: DocPath,
    pub field: &'static str,
    pub expected: Value,
}

impl Precondition {
    pub fn field_equals(path: DocPath, field: &'static str, expected: Value) -> Self {
        Self {
            path,
            field,
            expected,
        }
    }

    /// Evaluate against the current state of the guarded document.
    pub fn holds(&self, current: Option<&Value>) -> bool {
        match current {
            Some(doc) => doc.get(self.field) == Some(&self.expected),
            None => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("precondition failed for {path}: expected {field} = {expected}")]
    PreconditionFailed {
        path: DocPath,
        field: &'static str,
        expected: Value,
    },

    #[error("store backend failure")]
    Backend(#[source] anyhow::Error),
}

/// Abstract transactional document store consumed by the domain layer.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Server-generated unique identifier for a new document.
    fn allocate_id(&self) -> Uuid;

    /// Store-assigned "now", used for every persisted timestamp.
    fn server_timestamp(&self) -> DateTime<Utc>;

    async fn read(&self, path: &DocPath) -> Result<Option<Value>, StoreError>;

    /// All-or-nothing multi-location write. When a precondition is supplied
    /// and does not hold, nothing is written and
    /// `StoreError::PreconditionFailed` is returned.
    async fn atomic_write(
        &self,
        writes: Vec<WriteOp>,
        precondition: Option<Precondition>,
    ) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_doc_path_joins_segments() {
        let path = DocPath::new(&["orders_delivery", "abc"]);
        assert_eq!(path.as_str(), "orders_delivery/abc");
        assert!(path.starts_with("orders_delivery/"));
    }

    #[test]
    fn test_precondition_holds_on_matching_field() {
        let guard = Precondition::field_equals(DocPath::new(&["a", "b"]), "version", json!(3));

        let doc = json!({"version": 3, "status": "created"});
        assert!(guard.holds(Some(&doc)));
    }

    #[test]
    fn test_precondition_fails_on_mismatch_or_absence() {
        let guard = Precondition::field_equals(DocPath::new(&["a", "b"]), "version", json!(3));

        let doc = json!({"version": 4});
        assert!(!guard.holds(Some(&doc)));
        assert!(!guard.holds(None));
    }
}
