use super::gateway::{
    AuthorizedOrder, CapturedPayment, CreateOrderRequest, CreatedOrder, OrderDetails, Refund,
};
use super::legacy::LegacyTransaction;
use super::transaction::{CaptureTarget, NewTransaction, Transaction};
use crate::error::{CheckoutError, GatewayError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Inserts a new record. Fails with `DuplicateOrder` if the order id is taken.
    async fn create(&self, tx: NewTransaction) -> Result<Transaction>;
    async fn get(&self, order_id: &str) -> Result<Option<Transaction>>;
    /// Persists an existing record in place.
    async fn save(&self, tx: &Transaction) -> Result<()>;
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<Transaction>>;

    async fn get_by_order_id(&self, order_id: &str) -> Result<Transaction> {
        self.get(order_id)
            .await?
            .ok_or_else(|| CheckoutError::NotFound {
                order_id: order_id.to_string(),
            })
    }
}

#[async_trait]
pub trait LegacyTransactionLog: Send + Sync {
    /// Redacts and stores the record, returning it with its assigned id.
    async fn append(&self, record: LegacyTransaction) -> Result<LegacyTransaction>;
    async fn get(&self, id: u64) -> Result<Option<LegacyTransaction>>;
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<LegacyTransaction>>;
}

/// Remote operations on gateway orders.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> std::result::Result<CreatedOrder, GatewayError>;
    async fn get_order(&self, order_id: &str) -> std::result::Result<OrderDetails, GatewayError>;
    async fn authorize_order(
        &self,
        order_id: &str,
    ) -> std::result::Result<AuthorizedOrder, GatewayError>;
    async fn capture_order(
        &self,
        target: CaptureTarget<'_>,
    ) -> std::result::Result<CapturedPayment, GatewayError>;
    async fn refund_order(
        &self,
        capture_id: &str,
        amount: Decimal,
        currency: &str,
    ) -> std::result::Result<Refund, GatewayError>;
    async fn void_authorized_order(
        &self,
        authorization_id: &str,
    ) -> std::result::Result<(), GatewayError>;
}

pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type LegacyTransactionLogBox = Box<dyn LegacyTransactionLog>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
