use super::value_objects::OrderStatus;
use crate::store::StoreError;

// ============================================================================
// Order Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("location must include finite numeric lat/lng coordinates")]
    InvalidLocation,

    #[error("order items cannot be empty")]
    EmptyItems,

    #[error("invalid item at index {index}: {reason}")]
    InvalidItem { index: usize, reason: String },

    #[error("order not found")]
    NotFound,

    // Never discloses whether the order exists.
    #[error("operation not allowed")]
    Forbidden,

    #[error("order cannot be cancelled from status {0}")]
    InvalidStateTransition(OrderStatus),

    // Callers see the generic message; the source is logged for operators.
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl OrderError {
    /// Stable label for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::MissingField(_) => "missing_field",
            OrderError::InvalidLocation => "invalid_location",
            OrderError::EmptyItems => "empty_items",
            OrderError::InvalidItem { .. } => "invalid_item",
            OrderError::NotFound => "not_found",
            OrderError::Forbidden => "forbidden",
            OrderError::InvalidStateTransition(_) => "invalid_state_transition",
            OrderError::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        OrderError::Internal(err.into())
    }
}
