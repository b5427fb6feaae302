use crate::config::GatewayConfig;
use crate::domain::gateway::{
    AuthorizedOrder, CapturedOrder, CapturedPayment, CreateOrderRequest, CreatedOrder,
    GatewayAddress, OrderDetails, Refund,
};
use crate::domain::ports::PaymentGateway;
use crate::domain::transaction::CaptureTarget;
use async_trait::async_trait;
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::GatewayError;

type GatewayResult<T> = Result<T, GatewayError>;

// Refresh the OAuth token this long before PayPal says it expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    name: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// PayPal Orders v2 REST client.
pub struct PayPalGateway {
    http: Client,
    config: GatewayConfig,
    token: RwLock<Option<AccessToken>>,
}

impl PayPalGateway {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            token: RwLock::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn access_token(&self) -> GatewayResult<String> {
        if let Some(token) = self.token.read().await.as_ref()
            && token.expires_at > Instant::now()
        {
            return Ok(token.value.clone());
        }

        debug!(path = "/v1/oauth2/token", "Requesting PayPal access token");
        let resp = self
            .http
            .post(self.endpoint("/v1/oauth2/token"))
            .basic_auth(
                &self.config.client_id,
                Some(self.config.client_secret.expose_secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let token: TokenResponse = decode(resp).await?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *self.token.write().await = Some(AccessToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn get(&self, path: &str) -> GatewayResult<Response> {
        let token = self.access_token().await?;
        debug!(method = "GET", path, "PayPal request");
        let resp = self
            .http
            .get(self.endpoint(path))
            .bearer_auth(token)
            .send()
            .await?;
        check(resp).await
    }

    async fn post(&self, path: &str, body: &Value) -> GatewayResult<Response> {
        let token = self.access_token().await?;
        debug!(method = "POST", path, "PayPal request");
        let resp = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(token)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        check(resp).await
    }

    /// JSON body for `POST /v2/checkout/orders`.
    pub fn order_body(&self, request: &CreateOrderRequest) -> Value {
        let mut amount = json!({
            "currency_code": request.currency,
            "value": format_money(request.amount),
        });
        if let Some(shipping) = request.shipping_charge {
            amount["breakdown"] = json!({
                "item_total": {
                    "currency_code": request.currency,
                    "value": format_money(request.amount - shipping),
                },
                "shipping": {
                    "currency_code": request.currency,
                    "value": format_money(shipping),
                },
            });
        }

        let mut purchase_unit = json!({
            "reference_id": request.basket_id.to_string(),
            "amount": amount,
        });
        if let Some(address) = &request.address {
            purchase_unit["shipping"] = json!({
                "name": { "full_name": address.full_name },
                "address": GatewayAddress::from(address),
            });
        }

        let shipping_preference = match (request.shipping_required, &request.address) {
            (false, _) => "NO_SHIPPING",
            (true, Some(_)) => "SET_PROVIDED_ADDRESS",
            (true, None) => "GET_FROM_FILE",
        };
        let user_action = if self.config.buyer_pays_on_paypal {
            "PAY_NOW"
        } else {
            "CONTINUE"
        };

        let mut context = json!({
            "return_url": request.return_url,
            "cancel_url": request.cancel_url,
            "shipping_preference": shipping_preference,
            "user_action": user_action,
        });
        if let Some(brand_name) = &self.config.brand_name {
            context["brand_name"] = json!(brand_name);
        }
        if let Some(landing_page) = &self.config.landing_page {
            context["landing_page"] = json!(landing_page);
        }
        if let Some(locale) = &self.config.locale {
            context["locale"] = json!(locale);
        }

        json!({
            "intent": request.intent,
            "purchase_units": [purchase_unit],
            "application_context": context,
        })
    }
}

#[async_trait]
impl PaymentGateway for PayPalGateway {
    async fn create_order(&self, request: &CreateOrderRequest) -> GatewayResult<CreatedOrder> {
        let body = self.order_body(request);
        let resp = self.post("/v2/checkout/orders", &body).await?;
        decode(resp).await
    }

    async fn get_order(&self, order_id: &str) -> GatewayResult<OrderDetails> {
        let resp = self.get(&format!("/v2/checkout/orders/{}", order_id)).await?;
        decode(resp).await
    }

    async fn authorize_order(&self, order_id: &str) -> GatewayResult<AuthorizedOrder> {
        let path = format!("/v2/checkout/orders/{}/authorize", order_id);
        let resp = self.post(&path, &json!({})).await?;
        decode(resp).await
    }

    async fn capture_order(&self, target: CaptureTarget<'_>) -> GatewayResult<CapturedPayment> {
        match target {
            CaptureTarget::Order(order_id) => {
                let path = format!("/v2/checkout/orders/{}/capture", order_id);
                let resp = self.post(&path, &json!({})).await?;
                let order: CapturedOrder = decode(resp).await?;
                Ok(order.into())
            }
            CaptureTarget::Authorization(authorization_id) => {
                let path = format!("/v2/payments/authorizations/{}/capture", authorization_id);
                let resp = self.post(&path, &json!({ "final_capture": true })).await?;
                decode(resp).await
            }
        }
    }

    async fn refund_order(
        &self,
        capture_id: &str,
        amount: Decimal,
        currency: &str,
    ) -> GatewayResult<Refund> {
        let path = format!("/v2/payments/captures/{}/refund", capture_id);
        let body = json!({
            "amount": {
                "value": format_money(amount),
                "currency_code": currency,
            }
        });
        let resp = self.post(&path, &body).await?;
        decode(resp).await
    }

    async fn void_authorized_order(&self, authorization_id: &str) -> GatewayResult<()> {
        let path = format!("/v2/payments/authorizations/{}/void", authorization_id);
        self.post(&path, &json!({})).await?;
        Ok(())
    }
}

fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// Turns a non-2xx response into `GatewayError::Api`, preferring the message
/// from PayPal's error body.
async fn check(resp: Response) -> GatewayResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|err| err.message.or(err.error_description).or(err.name))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body
            }
        });

    Err(GatewayError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> GatewayResult<T> {
    let resp = check(resp).await?;
    resp.json::<T>()
        .await
        .map_err(|e| GatewayError::Decode(e.to_string()))
}
