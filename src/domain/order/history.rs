use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_objects::OrderStatus;

// ============================================================================
// Order Status History
// ============================================================================
//
// One entry per state transition, append-only. Entries live as their own
// documents under the order's history collection and are never rewritten.
//
// ============================================================================

/// Who performed a transition. Only customer-initiated transitions exist in
/// this service; the enum stays closed until another actor type does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub status: OrderStatus,
    pub at: DateTime<Utc>,
    pub by: Actor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HistoryEntry {
    pub fn new(status: OrderStatus, at: DateTime<Utc>) -> Self {
        Self {
            status,
            at,
            by: Actor::User,
            reason: None,
        }
    }

    pub fn with_reason(status: OrderStatus, at: DateTime<Utc>, reason: Option<String>) -> Self {
        Self {
            status,
            at,
            by: Actor::User,
            reason,
        }
    }
}
