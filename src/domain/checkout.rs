//! The slice of the storefront's basket, buyer and shipping model that the
//! checkout facade reads.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basket {
    pub id: u64,
    /// Basket currency; the configured default applies when absent.
    #[serde(default)]
    pub currency: Option<String>,
    pub total_incl_tax: Decimal,
    #[serde(default = "default_true")]
    pub shipping_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub postcode: String,
    /// ISO 3166-1 alpha-2 code.
    pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerAddress {
    #[serde(flatten)]
    pub address: ShippingAddress,
    #[serde(default)]
    pub is_default_for_billing: bool,
}

/// The signed-in customer, if any, with their address book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Buyer {
    #[serde(default)]
    pub addresses: Vec<BuyerAddress>,
}

impl Buyer {
    /// The address used when none was chosen explicitly: the default billing
    /// address if one is flagged, otherwise the first in the address book.
    pub fn preferred_address(&self) -> Option<&ShippingAddress> {
        self.addresses
            .iter()
            .find(|entry| entry.is_default_for_billing)
            .or_else(|| self.addresses.first())
            .map(|entry| &entry.address)
    }
}

/// A shipping method already priced for the basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub code: String,
    pub charge_incl_tax: Decimal,
}
