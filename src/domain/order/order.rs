use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::request::ValidatedOrder;
use super::value_objects::{
    CustomerSnapshot, LineItem, LocalSnapshot, OrderLocation, OrderStatus, OrderTotals, OrderType,
    PaymentInfo,
};

// ============================================================================
// Order Aggregate
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    // Identity
    pub id: Uuid,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub user_id: String,
    pub local_id: String,
    pub delivery_man_id: Option<String>,

    // Current state
    pub status: OrderStatus,
    pub version: i64,

    // Audit trail
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Money
    pub payment: PaymentInfo,
    pub totals: OrderTotals,

    // Contents (immutable after creation)
    pub items: Vec<LineItem>,
    pub location: OrderLocation,

    // Display copies captured at creation, never re-synced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalSnapshot>,

    // Present only once cancelled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Build the initial aggregate from a validated intake request.
    pub fn create(id: Uuid, validated: ValidatedOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            order_type: validated.order_type,
            user_id: validated.user_id,
            local_id: validated.local_id,
            delivery_man_id: None,
            status: OrderStatus::Created,
            version: 1,
            created_at: now,
            updated_at: now,
            payment: PaymentInfo::pending(validated.payment_method),
            totals: validated.totals,
            items: validated.items,
            location: validated.location,
            customer: validated.customer,
            local: validated.local,
            cancel_reason: None,
            cancelled_at: None,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn can_cancel(&self) -> bool {
        self.status.is_cancellable()
    }

    /// Apply the cancellation mutation. Callers must have checked
    /// `can_cancel` first; the version bump makes the write guardable.
    pub fn apply_cancellation(&mut self, reason: Option<String>, at: DateTime<Utc>) {
        self.status = OrderStatus::Cancelled;
        self.updated_at = at;
        self.cancelled_at = Some(at);
        self.cancel_reason = reason;
        self.version += 1;
    }
}
