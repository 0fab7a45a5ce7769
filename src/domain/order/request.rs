use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::errors::OrderError;
use super::value_objects::{
    CustomerSnapshot, LineItem, LocalSnapshot, OrderLocation, OrderTotals, OrderType,
    PaymentMethod,
};

// ============================================================================
// Request Schemas + Validation
// ============================================================================
//
// Inbound bodies are parsed into typed schemas first, then validated
// fail-fast: the first violation wins and nothing is written. Item
// normalization recomputes every monetary derivation server-side; a
// caller-supplied totalPrice is ignored by the schema.
//
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub address_text: Option<String>,
    #[serde(default)]
    pub references: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLineItem {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: Decimal,
}

impl RawLineItem {
    /// Map one raw item to the canonical shape, naming the offending index
    /// on the first violation.
    fn normalize(self, index: usize) -> Result<LineItem, OrderError> {
        if self.product_id.is_empty() {
            return Err(OrderError::InvalidItem {
                index,
                reason: "productId must be a non-empty string".to_string(),
            });
        }
        if self.quantity <= 0 {
            return Err(OrderError::InvalidItem {
                index,
                reason: "quantity must be greater than zero".to_string(),
            });
        }
        let quantity = u32::try_from(self.quantity).map_err(|_| OrderError::InvalidItem {
            index,
            reason: "quantity out of range".to_string(),
        })?;
        if self.unit_price < Decimal::ZERO {
            return Err(OrderError::InvalidItem {
                index,
                reason: "unitPrice cannot be negative".to_string(),
            });
        }

        Ok(LineItem {
            product_id: self.product_id,
            product_name: self.product_name,
            slug: self.slug,
            image: self.image,
            comments: self.comments,
            quantity,
            unit_price: self.unit_price,
            total_price: Decimal::from(quantity) * self.unit_price,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub local_id: String,
    #[serde(default)]
    pub zone_id: String,
    #[serde(default)]
    pub zone_name: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub delivery_method: Option<OrderType>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub delivery_fee: Option<Decimal>,
    #[serde(default)]
    pub discount: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<RawLineItem>,
    #[serde(default)]
    pub customer: Option<CustomerSnapshot>,
    #[serde(default)]
    pub local: Option<LocalSnapshot>,
}

/// Validation output: every field typed, every derivation recomputed.
#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    pub order_type: OrderType,
    pub user_id: String,
    pub local_id: String,
    pub payment_method: PaymentMethod,
    pub items: Vec<LineItem>,
    pub totals: OrderTotals,
    pub location: OrderLocation,
    pub customer: Option<CustomerSnapshot>,
    pub local: Option<LocalSnapshot>,
}

impl CreateOrderRequest {
    /// Fail-fast validation in field order; first violation wins.
    pub fn validate(self, currency: &str) -> Result<ValidatedOrder, OrderError> {
        if self.user_id.is_empty() {
            return Err(OrderError::MissingField("userId"));
        }
        if self.local_id.is_empty() {
            return Err(OrderError::MissingField("localId"));
        }
        if self.zone_id.is_empty() {
            return Err(OrderError::MissingField("zoneId"));
        }
        let geo = self.location.ok_or(OrderError::MissingField("location"))?;
        if !geo.lat.is_finite() || !geo.lng.is_finite() {
            return Err(OrderError::InvalidLocation);
        }
        if self.items.is_empty() {
            return Err(OrderError::EmptyItems);
        }

        let mut items = Vec::with_capacity(self.items.len());
        let mut subtotal = Decimal::ZERO;
        for (index, raw) in self.items.into_iter().enumerate() {
            let item = raw.normalize(index)?;
            subtotal += item.total_price;
            items.push(item);
        }

        let delivery_fee = self.delivery_fee.unwrap_or(Decimal::ZERO);
        let discount = self.discount.unwrap_or(Decimal::ZERO);
        let total = (subtotal + delivery_fee - discount).max(Decimal::ZERO);

        Ok(ValidatedOrder {
            order_type: self.delivery_method.unwrap_or_default(),
            user_id: self.user_id,
            local_id: self.local_id,
            payment_method: self.payment_method.unwrap_or_default(),
            items,
            totals: OrderTotals {
                subtotal,
                delivery_fee,
                discount,
                total,
                currency: currency.to_string(),
            },
            location: OrderLocation {
                zone_id: self.zone_id,
                zone_name: self.zone_name,
                lat: geo.lat,
                lng: geo.lng,
                address_text: geo.address_text,
                references: geo.references,
            },
            customer: self.customer,
            local: self.local,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub order_id: Option<Uuid>,
    #[serde(default)]
    pub reason: Option<String>,
}
