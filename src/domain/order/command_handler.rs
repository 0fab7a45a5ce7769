use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::store::{paths, DocumentStore, Precondition, StoreError, WriteOp};

use super::errors::OrderError;
use super::history::HistoryEntry;
use super::order::Order;
use super::request::{CancelOrderRequest, CreateOrderRequest};
use super::value_objects::OrderStatus;

// ============================================================================
// Order Command Handler
// ============================================================================
//
// Orchestrates: Request -> Validation -> Order -> Atomic Batch
//
// Every operation produces exactly one atomic batch covering the order
// document, its history append, and the affected index entries. Partial
// application is impossible: either every location reflects the operation
// or none does.
//
// ============================================================================

pub struct OrderCommandHandler {
    store: Arc<dyn DocumentStore>,
    currency: String,
}

impl OrderCommandHandler {
    pub fn new(store: Arc<dyn DocumentStore>, currency: impl Into<String>) -> Self {
        Self {
            store,
            currency: currency.into(),
        }
    }

    /// Validate an intake request, compute totals, and persist the order,
    /// its initial history entry, and all three index entries in one batch.
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Uuid, OrderError> {
        let validated = request.validate(&self.currency)?;

        let order_id = self.store.allocate_id();
        let now = self.store.server_timestamp();
        let order = Order::create(order_id, validated, now);

        let entry_id = self.store.allocate_id();
        let entry = HistoryEntry::new(OrderStatus::Created, now);

        let writes = vec![
            WriteOp::Put(paths::order(order_id), encode(&order)?),
            WriteOp::Put(paths::history_entry(order_id, entry_id), encode(&entry)?),
            WriteOp::Put(
                paths::index_by_user(&order.user_id, order_id),
                Value::Bool(true),
            ),
            WriteOp::Put(
                paths::index_by_local(&order.local_id, order_id),
                Value::Bool(true),
            ),
            WriteOp::Put(
                paths::index_by_status(order.status.as_str(), order_id),
                Value::Bool(true),
            ),
        ];

        self.store.atomic_write(writes, None).await?;

        tracing::info!(
            order_id = %order_id,
            user_id = %order.user_id,
            local_id = %order.local_id,
            item_count = order.items.len(),
            total = %order.totals.total,
            "✅ Order created"
        );

        Ok(order_id)
    }

    /// Cancel an order the caller owns, append the history entry, and move
    /// the status index entry, all in one guarded batch.
    pub async fn cancel_order(&self, request: CancelOrderRequest) -> Result<(), OrderError> {
        if request.user_id.is_empty() {
            return Err(OrderError::MissingField("userId"));
        }
        let order_id = request.order_id.ok_or(OrderError::MissingField("orderId"))?;

        let mut order = self.load_order(order_id).await?;

        if !order.is_owned_by(&request.user_id) {
            tracing::warn!(
                order_id = %order_id,
                caller = %request.user_id,
                "Cancellation rejected: caller does not own the order"
            );
            return Err(OrderError::Forbidden);
        }
        if !order.can_cancel() {
            return Err(OrderError::InvalidStateTransition(order.status));
        }

        let prior_status = order.status;
        let expected_version = order.version;
        let now = self.store.server_timestamp();
        order.apply_cancellation(request.reason.clone(), now);

        let entry_id = self.store.allocate_id();
        let entry = HistoryEntry::with_reason(OrderStatus::Cancelled, now, request.reason);

        let writes = vec![
            WriteOp::Put(paths::order(order_id), encode(&order)?),
            WriteOp::Put(paths::history_entry(order_id, entry_id), encode(&entry)?),
            WriteOp::Delete(paths::index_by_status(prior_status.as_str(), order_id)),
            WriteOp::Put(
                paths::index_by_status(OrderStatus::Cancelled.as_str(), order_id),
                Value::Bool(true),
            ),
        ];
        let guard = Precondition::field_equals(
            paths::order(order_id),
            "version",
            json!(expected_version),
        );

        match self.store.atomic_write(writes, Some(guard)).await {
            Ok(()) => {
                tracing::info!(
                    order_id = %order_id,
                    user_id = %order.user_id,
                    prior_status = %prior_status,
                    "✅ Order cancelled"
                );
                Ok(())
            }
            // Another transition won the race between our read and the
            // commit. Report the status that actually prevailed.
            Err(StoreError::PreconditionFailed { .. }) => {
                let current = self.load_order(order_id).await?;
                Err(OrderError::InvalidStateTransition(current.status))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn load_order(&self, order_id: Uuid) -> Result<Order, OrderError> {
        match self.store.read(&paths::order(order_id)).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| OrderError::Internal(e.into()))
            }
            None => Err(OrderError::NotFound),
        }
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Value, OrderError> {
    serde_json::to_value(value).map_err(|e| OrderError::Internal(e.into()))
}
