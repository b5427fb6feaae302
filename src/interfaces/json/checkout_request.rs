use crate::domain::checkout::{Basket, Buyer, ShippingAddress, ShippingMethod};
use crate::error::Result;
use serde::Deserialize;
use std::io::Read;

/// A checkout hand-off from the storefront: the frozen basket plus whatever
/// shipping choices were already made.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckoutRequest {
    pub basket: Basket,
    #[serde(default)]
    pub buyer: Option<Buyer>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub shipping_method: Option<ShippingMethod>,
}

impl CheckoutRequest {
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }
}
