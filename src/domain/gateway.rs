//! Request and response shapes exchanged with the payment gateway.
//!
//! Field names follow the PayPal Orders v2 JSON so the HTTP adapter can
//! deserialize responses straight into these types.

use super::checkout::ShippingAddress;
use super::transaction::{Intent, OrderStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Everything needed to register a new order with the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrderRequest {
    pub basket_id: u64,
    pub amount: Decimal,
    pub currency: String,
    pub return_url: String,
    pub cancel_url: String,
    pub shipping_required: bool,
    pub address: Option<ShippingAddress>,
    pub shipping_charge: Option<Decimal>,
    pub intent: Intent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub id: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl CreatedOrder {
    /// Where the buyer must be sent to approve the order.
    pub fn approve_url(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == "approve")
            .map(|link| link.href.as_str())
    }
}

/// Postal address in the gateway's vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line_2: Option<String>,
    /// City or town.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_area_2: Option<String>,
    /// State, province or county.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_area_1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub country_code: String,
}

impl From<&ShippingAddress> for GatewayAddress {
    fn from(address: &ShippingAddress) -> Self {
        Self {
            address_line_1: Some(address.line1.clone()),
            address_line_2: address.line2.clone(),
            admin_area_2: Some(address.city.clone()),
            admin_area_1: address.state.clone(),
            postal_code: Some(address.postcode.clone()),
            country_code: address.country_code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payer {
    pub payer_id: String,
    #[serde(default)]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingName {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipping {
    #[serde(default)]
    pub name: Option<ShippingName>,
    #[serde(default)]
    pub address: Option<GatewayAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRef {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payments {
    #[serde(default)]
    pub authorizations: Vec<PaymentRef>,
    #[serde(default)]
    pub captures: Vec<PaymentRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseUnit {
    #[serde(default)]
    pub shipping: Option<Shipping>,
    #[serde(default)]
    pub payments: Option<Payments>,
}

fn first_payments(units: &[PurchaseUnit]) -> Option<&Payments> {
    units.first().and_then(|unit| unit.payments.as_ref())
}

/// Order details as returned once the buyer has approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub payer: Payer,
    #[serde(default)]
    pub purchase_units: Vec<PurchaseUnit>,
}

impl OrderDetails {
    pub fn shipping(&self) -> Option<&Shipping> {
        self.purchase_units
            .first()
            .and_then(|unit| unit.shipping.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedOrder {
    #[serde(default)]
    pub purchase_units: Vec<PurchaseUnit>,
}

impl AuthorizedOrder {
    pub fn authorization_id(&self) -> Option<&str> {
        first_payments(&self.purchase_units)
            .and_then(|payments| payments.authorizations.first())
            .map(|authorization| authorization.id.as_str())
    }
}

/// Result of a capture, either of an order or of an authorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedPayment {
    pub id: String,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of a full order as returned by the order capture endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedOrder {
    pub id: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub purchase_units: Vec<PurchaseUnit>,
}

impl From<CapturedOrder> for CapturedPayment {
    fn from(order: CapturedOrder) -> Self {
        let id = first_payments(&order.purchase_units)
            .and_then(|payments| payments.captures.first())
            .map(|capture| capture.id.clone())
            .unwrap_or(order.id);
        Self {
            id,
            status: order.status,
        }
    }
}
