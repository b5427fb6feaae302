//! Application layer containing the checkout orchestration.
//!
//! `CheckoutFacade` is the single entry point the storefront calls, once per
//! step of the buyer's journey. It drives the payment gateway through the
//! domain ports and records each outcome in the transaction store.

pub mod facade;
pub mod locks;
