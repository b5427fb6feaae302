//! Domain types and the ports the checkout facade depends on.

pub mod checkout;
pub mod gateway;
pub mod legacy;
pub mod ports;
pub mod transaction;
