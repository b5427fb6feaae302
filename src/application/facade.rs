use super::locks::OrderLocks;
use crate::config::CheckoutConfig;
use crate::domain::checkout::{Basket, Buyer, ShippingAddress, ShippingMethod};
use crate::domain::gateway::{CreateOrderRequest, OrderDetails};
use crate::domain::ports::{PaymentGatewayBox, TransactionStoreBox};
use crate::domain::transaction::{NewTransaction, OrderStatus, Transaction};
use crate::error::{ConfigError, GatewayError, Result};
use tracing::{error, info};

/// Bridges the storefront checkout flow and the payment gateway.
///
/// Every operation re-reads the persisted transaction before deciding which
/// remote calls are still needed, and holds a per-order lock for the whole
/// read-call-persist sequence.
pub struct CheckoutFacade {
    config: CheckoutConfig,
    gateway: PaymentGatewayBox,
    transactions: TransactionStoreBox,
    locks: OrderLocks,
}

impl CheckoutFacade {
    pub fn new(
        config: CheckoutConfig,
        gateway: PaymentGatewayBox,
        transactions: TransactionStoreBox,
    ) -> Self {
        Self {
            config,
            gateway,
            transactions,
            locks: OrderLocks::new(),
        }
    }

    /// Registers the basket with the gateway and returns the URL the buyer
    /// must visit to approve the payment.
    ///
    /// `shipping_address` and `shipping_method` are passed when the gateway
    /// is used as a payment method after shipping was chosen on the
    /// storefront. Returns `None` if the gateway did not offer an approval
    /// link.
    pub async fn initiate_checkout(
        &self,
        basket: &Basket,
        buyer: Option<&Buyer>,
        shipping_address: Option<&ShippingAddress>,
        shipping_method: Option<&ShippingMethod>,
        host: Option<&str>,
    ) -> Result<Option<String>> {
        let currency = basket
            .currency
            .clone()
            .unwrap_or_else(|| self.config.default_currency.clone());

        let host = host
            .or(self.config.callback_host.as_deref())
            .ok_or(ConfigError::Missing("PAYPAL_CALLBACK_HOST"))?;

        let address = if basket.shipping_required {
            shipping_address
                .or_else(|| buyer.and_then(Buyer::preferred_address))
                .cloned()
        } else {
            None
        };

        let shipping_charge = shipping_method.map(|method| method.charge_incl_tax);
        let order_total = basket.total_incl_tax + shipping_charge.unwrap_or_default();

        let intent = self.config.intent()?;

        let request = CreateOrderRequest {
            basket_id: basket.id,
            amount: order_total,
            currency: currency.clone(),
            return_url: self.config.return_url(host, basket.id),
            cancel_url: self.config.cancel_url(host, basket.id),
            shipping_required: basket.shipping_required,
            address,
            shipping_charge,
            intent,
        };
        let order = self.gateway.create_order(&request).await?;

        let tx = self
            .transactions
            .create(NewTransaction {
                order_id: order.id.clone(),
                amount: order_total,
                currency,
                status: order.status.clone(),
                intent,
            })
            .await
            .inspect_err(|err| {
                error!(
                    order_id = %order.id,
                    error = %err,
                    "Gateway order created but not recorded"
                );
            })?;

        info!(
            order_id = %tx.order_id,
            basket_id = basket.id,
            amount = %tx.amount,
            currency = %tx.currency,
            intent = %tx.intent,
            status = %tx.status,
            "Checkout initiated"
        );

        Ok(order.approve_url().map(str::to_string))
    }

    /// Records payer details once the buyer has approved, and authorizes the
    /// order when its intent requires it. Safe to call repeatedly.
    pub async fn fetch_transaction_details(&self, token: &str) -> Result<Transaction> {
        let _guard = self.locks.acquire(token).await;
        let mut tx = self.transactions.get_by_order_id(token).await?;

        if !tx.has_payer() {
            let details = self.gateway.get_order(&tx.order_id).await?;
            record_payer(&mut tx, &details)?;
            self.persist(&tx, "get_order").await?;
            info!(order_id = %tx.order_id, payer_id = ?tx.payer_id, "Payer details recorded");
        }

        if tx.is_authorization() && tx.authorization_id.is_none() {
            let authorized = self.gateway.authorize_order(&tx.order_id).await?;
            let authorization_id = authorized
                .authorization_id()
                .ok_or_else(|| GatewayError::Decode("no authorization in response".to_string()))?;
            tx.authorization_id = Some(authorization_id.to_string());
            self.persist(&tx, "authorize_order").await?;
            info!(order_id = %tx.order_id, authorization_id, "Order authorized");
        }

        Ok(tx)
    }

    /// Takes the funds, either directly from the order or from its
    /// authorization.
    pub async fn capture_order(&self, token: &str) -> Result<Transaction> {
        let _guard = self.locks.acquire(token).await;
        let mut tx = self.transactions.get_by_order_id(token).await?;

        let captured = self.gateway.capture_order(tx.capture_target()).await?;
        tx.capture_id = Some(captured.id);
        tx.status = captured.status;
        self.persist(&tx, "capture_order").await?;

        info!(
            order_id = %tx.order_id,
            capture_id = ?tx.capture_id,
            status = %tx.status,
            "Order captured"
        );
        Ok(tx)
    }

    /// Refunds the full captured amount recorded at creation.
    pub async fn refund_order(&self, token: &str) -> Result<Transaction> {
        let _guard = self.locks.acquire(token).await;
        let mut tx = self.transactions.get_by_order_id(token).await?;

        let capture_id = tx.capture_id.as_deref().unwrap_or_default();
        let refund = self
            .gateway
            .refund_order(capture_id, tx.amount, &tx.currency)
            .await?;
        tx.refund_id = Some(refund.id);
        self.persist(&tx, "refund_order").await?;

        info!(order_id = %tx.order_id, refund_id = ?tx.refund_id, "Order refunded");
        Ok(tx)
    }

    pub async fn void_authorization(&self, token: &str) -> Result<Transaction> {
        let _guard = self.locks.acquire(token).await;
        let mut tx = self.transactions.get_by_order_id(token).await?;

        let authorization_id = tx.authorization_id.as_deref().unwrap_or_default();
        self.gateway.void_authorized_order(authorization_id).await?;
        tx.status = OrderStatus::Voided;
        self.persist(&tx, "void_authorized_order").await?;

        info!(order_id = %tx.order_id, "Authorization voided");
        Ok(tx)
    }

    pub async fn transaction(&self, token: &str) -> Result<Transaction> {
        self.transactions.get_by_order_id(token).await
    }

    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.transactions.list().await
    }

    // The remote call has already succeeded at this point; a failed write
    // loses its outcome, so leave enough in the log to reconcile by hand.
    async fn persist(&self, tx: &Transaction, step: &'static str) -> Result<()> {
        self.transactions.save(tx).await.inspect_err(|err| {
            error!(
                order_id = %tx.order_id,
                step,
                authorization_id = ?tx.authorization_id,
                capture_id = ?tx.capture_id,
                refund_id = ?tx.refund_id,
                status = %tx.status,
                error = %err,
                "Gateway call succeeded but the transaction could not be saved"
            );
        })
    }
}

fn record_payer(tx: &mut Transaction, details: &OrderDetails) -> Result<()> {
    tx.payer_id = Some(details.payer.payer_id.clone());
    tx.email = details.payer.email_address.clone();

    if let Some(shipping) = details.shipping() {
        tx.address_full_name = shipping.name.as_ref().map(|name| name.full_name.clone());
        tx.address = shipping
            .address
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
    }
    Ok(())
}
