use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use super::contract::{DocPath, DocumentStore, Precondition, StoreError, WriteOp};

// ============================================================================
// ScyllaDB-Backed Store
// ============================================================================
//
// Persists every document in a single path-keyed table:
//
//   documents (path text PRIMARY KEY, payload text, updated_at timestamp)
//
// `atomic_write` builds one logged batch covering all puts and deletes, so
// ScyllaDB commits the whole set or none of it. The precondition is
// verified by reading the guarded document immediately before the batch
// (optimistic concurrency: read the current value, refuse on mismatch,
// then write).
//
// ============================================================================

pub struct ScyllaStore {
    session: Arc<Session>,
}

impl ScyllaStore {
    /// Connect and bootstrap the keyspace and documents table.
    pub async fn connect(node: &str, keyspace: &str) -> anyhow::Result<Self> {
        tracing::info!(node = %node, keyspace = %keyspace, "Connecting to ScyllaDB");

        let session: Session = SessionBuilder::new().known_node(node).build().await?;

        session
            .query_unpaged(
                format!(
                    "CREATE KEYSPACE IF NOT EXISTS {} WITH REPLICATION = \
                     {{'class': 'SimpleStrategy', 'replication_factor': 1}}",
                    keyspace
                ),
                &[],
            )
            .await?;

        session.use_keyspace(keyspace, false).await?;

        session
            .query_unpaged(
                "CREATE TABLE IF NOT EXISTS documents (\
                 path text PRIMARY KEY, payload text, updated_at timestamp)",
                &[],
            )
            .await?;

        Ok(Self {
            session: Arc::new(session),
        })
    }

    async fn check_precondition(&self, guard: &Precondition) -> Result<(), StoreError> {
        let current = self.read(&guard.path).await?;
        if guard.holds(current.as_ref()) {
            Ok(())
        } else {
            Err(StoreError::PreconditionFailed {
                path: guard.path.clone(),
                field: guard.field,
                expected: guard.expected.clone(),
            })
        }
    }
}

fn backend(err: impl Into<anyhow::Error>) -> StoreError {
    StoreError::Backend(err.into())
}

#[async_trait]
impl DocumentStore for ScyllaStore {
    fn allocate_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    fn server_timestamp(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn read(&self, path: &DocPath) -> Result<Option<Value>, StoreError> {
        let result = self
            .session
            .query_unpaged(
                "SELECT payload FROM documents WHERE path = ?",
                (path.as_str(),),
            )
            .await
            .map_err(backend)?;

        let rows_result = match result.into_rows_result() {
            Ok(rows) => rows,
            Err(_) => return Ok(None), // No rows
        };

        match rows_result.maybe_first_row::<(String,)>() {
            Ok(Some((payload,))) => {
                let value = serde_json::from_str(&payload).map_err(backend)?;
                Ok(Some(value))
            }
            _ => Ok(None),
        }
    }

    async fn atomic_write(
        &self,
        writes: Vec<WriteOp>,
        precondition: Option<Precondition>,
    ) -> Result<(), StoreError> {
        if let Some(guard) = &precondition {
            self.check_precondition(guard).await?;
        }

        let mut batch = scylla::statement::batch::Batch::default();
        let mut values: Vec<Box<dyn scylla::serialize::row::SerializeRow + Send + Sync>> = vec![];
        let now = Utc::now();

        for write in &writes {
            match write {
                WriteOp::Put(path, value) => {
                    let payload = serde_json::to_string(value).map_err(backend)?;
                    batch.append_statement(
                        "INSERT INTO documents (path, payload, updated_at) VALUES (?, ?, ?)",
                    );
                    values.push(Box::new((path.as_str().to_string(), payload, now)));
                }
                WriteOp::Delete(path) => {
                    batch.append_statement("DELETE FROM documents WHERE path = ?");
                    values.push(Box::new((path.as_str().to_string(),)));
                }
            }
        }

        self.session.batch(&batch, values).await.map_err(backend)?;

        tracing::debug!(write_count = writes.len(), "Committed document batch");

        Ok(())
    }
}

// ============================================================================
// Integration Test Notes
// ============================================================================
//
// ScyllaStore requires a running ScyllaDB node and is therefore covered by
// integration environments, not unit tests:
//
// 1. atomic_write commits all statements of a batch or none
// 2. read returns None for absent paths
// 3. precondition mismatch refuses the batch without writing
//
// The contract itself (batch semantics, precondition evaluation, index
// moves) is unit-tested against MemoryStore, which implements the same
// trait.
//
// ============================================================================
