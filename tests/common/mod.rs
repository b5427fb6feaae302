#![allow(dead_code)]

use async_trait::async_trait;
use paypal_express::application::facade::CheckoutFacade;
use paypal_express::config::CheckoutConfig;
use paypal_express::domain::checkout::{Basket, ShippingAddress};
use paypal_express::domain::gateway::{
    AuthorizedOrder, CapturedPayment, CreateOrderRequest, CreatedOrder, GatewayAddress, Link,
    OrderDetails, Payer, PaymentRef, Payments, PurchaseUnit, Refund, Shipping, ShippingName,
};
use paypal_express::domain::ports::PaymentGateway;
use paypal_express::domain::transaction::{CaptureTarget, Intent, OrderStatus};
use paypal_express::error::GatewayError;
use paypal_express::infrastructure::in_memory::InMemoryTransactionStore;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

pub const ORDER_ID: &str = "4MW805572N795704B";
pub const PAYER_ID: &str = "0000000000001";
pub const PAYER_EMAIL: &str = "sherlock.holmes@example.com";
pub const AUTHORIZATION_ID: &str = "3C679366HH908993F";
pub const CAPTURE_ID: &str = "2D6171889X1782919";
pub const REFUND_ID: &str = "1JU08902781691411";
pub const APPROVE_URL: &str = "https://www.sandbox.paypal.com/checkoutnow?token=4MW805572N795704B";

/// A remote call as seen by [`FakeGateway`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateOrder(CreateOrderRequest),
    GetOrder(String),
    AuthorizeOrder(String),
    CaptureOrder { id: String, intent: Intent },
    RefundOrder {
        capture_id: String,
        amount: Decimal,
        currency: String,
    },
    VoidAuthorizedOrder(String),
}

/// Records every call and answers with canned sandbox responses.
#[derive(Clone, Default)]
pub struct FakeGateway {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_create: bool,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_create_order() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| pred(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreatedOrder, GatewayError> {
        self.record(Call::CreateOrder(request.clone()));
        if self.fail_create {
            return Err(GatewayError::Api {
                status: 422,
                message: "The requested action could not be performed".to_string(),
            });
        }
        Ok(CreatedOrder {
            id: ORDER_ID.to_string(),
            status: OrderStatus::Created,
            links: vec![
                Link {
                    href: format!("https://api.sandbox.paypal.com/v2/checkout/orders/{}", ORDER_ID),
                    rel: "self".to_string(),
                    method: Some("GET".to_string()),
                },
                Link {
                    href: APPROVE_URL.to_string(),
                    rel: "approve".to_string(),
                    method: Some("GET".to_string()),
                },
            ],
        })
    }

    async fn get_order(&self, order_id: &str) -> Result<OrderDetails, GatewayError> {
        self.record(Call::GetOrder(order_id.to_string()));
        tokio::task::yield_now().await;
        Ok(OrderDetails {
            payer: Payer {
                payer_id: PAYER_ID.to_string(),
                email_address: Some(PAYER_EMAIL.to_string()),
            },
            purchase_units: vec![PurchaseUnit {
                shipping: Some(Shipping {
                    name: Some(ShippingName {
                        full_name: "Sherlock Holmes".to_string(),
                    }),
                    address: Some(GatewayAddress {
                        address_line_1: Some("221B Baker Street".to_string()),
                        admin_area_2: Some("London".to_string()),
                        postal_code: Some("WC2N 5DU".to_string()),
                        country_code: "GB".to_string(),
                        ..GatewayAddress::default()
                    }),
                }),
                payments: None,
            }],
        })
    }

    async fn authorize_order(&self, order_id: &str) -> Result<AuthorizedOrder, GatewayError> {
        self.record(Call::AuthorizeOrder(order_id.to_string()));
        Ok(AuthorizedOrder {
            purchase_units: vec![PurchaseUnit {
                shipping: None,
                payments: Some(Payments {
                    authorizations: vec![PaymentRef {
                        id: AUTHORIZATION_ID.to_string(),
                        status: Some("CREATED".to_string()),
                    }],
                    captures: Vec::new(),
                }),
            }],
        })
    }

    async fn capture_order(
        &self,
        target: CaptureTarget<'_>,
    ) -> Result<CapturedPayment, GatewayError> {
        self.record(Call::CaptureOrder {
            id: target.id().to_string(),
            intent: target.intent(),
        });
        Ok(CapturedPayment {
            id: CAPTURE_ID.to_string(),
            status: OrderStatus::Completed,
        })
    }

    async fn refund_order(
        &self,
        capture_id: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<Refund, GatewayError> {
        self.record(Call::RefundOrder {
            capture_id: capture_id.to_string(),
            amount,
            currency: currency.to_string(),
        });
        Ok(Refund {
            id: REFUND_ID.to_string(),
            status: Some("COMPLETED".to_string()),
        })
    }

    async fn void_authorized_order(&self, authorization_id: &str) -> Result<(), GatewayError> {
        self.record(Call::VoidAuthorizedOrder(authorization_id.to_string()));
        Ok(())
    }
}

pub fn config(intent: &str) -> CheckoutConfig {
    CheckoutConfig {
        order_intent: intent.to_string(),
        callback_host: Some("shop.example.com".to_string()),
        ..CheckoutConfig::default()
    }
}

/// A facade over an in-memory store, plus a handle on the gateway it calls.
pub fn checkout_facade(intent: &str, gateway: FakeGateway) -> (CheckoutFacade, FakeGateway) {
    let facade = CheckoutFacade::new(
        config(intent),
        Box::new(gateway.clone()),
        Box::new(InMemoryTransactionStore::new()),
    );
    (facade, gateway)
}

pub fn basket(total: Decimal) -> Basket {
    Basket {
        id: 12,
        currency: Some("GBP".to_string()),
        total_incl_tax: total,
        shipping_required: true,
    }
}

pub fn baker_street() -> ShippingAddress {
    ShippingAddress {
        full_name: "Sherlock Holmes".to_string(),
        line1: "221B Baker Street".to_string(),
        line2: None,
        city: "London".to_string(),
        state: None,
        postcode: "WC2N 5DU".to_string(),
        country_code: "GB".to_string(),
    }
}
