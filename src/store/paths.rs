use uuid::Uuid;

use super::contract::DocPath;

// ============================================================================
// Persisted Layout
// ============================================================================
//
// Primary collection:
//   orders_delivery/<order-id>                         -> full Order document
//   orders_delivery/<order-id>/history/<entry-id>      -> one HistoryEntry
//
// Secondary indexes (boolean presence, one status bucket per order):
//   orders_delivery_by_user/<user-id>/<order-id>       -> true
//   orders_delivery_by_local/<local-id>/<order-id>     -> true
//   orders_delivery_by_status/<status>/<order-id>      -> true
//
// ============================================================================

pub const ORDERS: &str = "orders_delivery";
pub const ORDERS_BY_USER: &str = "orders_delivery_by_user";
pub const ORDERS_BY_LOCAL: &str = "orders_delivery_by_local";
pub const ORDERS_BY_STATUS: &str = "orders_delivery_by_status";

const HISTORY: &str = "history";

pub fn order(order_id: Uuid) -> DocPath {
    DocPath::new(&[ORDERS, &order_id.to_string()])
}

pub fn history_entry(order_id: Uuid, entry_id: Uuid) -> DocPath {
    DocPath::new(&[ORDERS, &order_id.to_string(), HISTORY, &entry_id.to_string()])
}

/// Prefix shared by every history entry of one order.
#[allow(dead_code)]
pub fn history_prefix(order_id: Uuid) -> String {
    format!("{}/{}/{}/", ORDERS, order_id, HISTORY)
}

pub fn index_by_user(user_id: &str, order_id: Uuid) -> DocPath {
    DocPath::new(&[ORDERS_BY_USER, user_id, &order_id.to_string()])
}

pub fn index_by_local(local_id: &str, order_id: Uuid) -> DocPath {
    DocPath::new(&[ORDERS_BY_LOCAL, local_id, &order_id.to_string()])
}

pub fn index_by_status(status: &str, order_id: Uuid) -> DocPath {
    DocPath::new(&[ORDERS_BY_STATUS, status, &order_id.to_string()])
}
