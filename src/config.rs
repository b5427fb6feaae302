use crate::domain::transaction::Intent;
use crate::error::ConfigError;
use secrecy::SecretString;
use std::env;
use std::time::Duration;

pub const SANDBOX_API_URL: &str = "https://api-m.sandbox.paypal.com";
pub const LIVE_API_URL: &str = "https://api-m.paypal.com";

/// Settings that shape how checkouts are registered with the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutConfig {
    /// Raw configured intent. Validated by [`CheckoutConfig::intent`].
    pub order_intent: String,
    pub default_currency: String,
    pub callback_scheme: String,
    /// Host used for callback URLs when the caller does not supply one.
    pub callback_host: Option<String>,
    /// Path template for the buyer's return after approval; `{basket_id}` is substituted.
    pub return_path: String,
    pub cancel_path: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            order_intent: Intent::Capture.as_str().to_string(),
            default_currency: "GBP".to_string(),
            callback_scheme: "https".to_string(),
            callback_host: None,
            return_path: "/checkout/paypal/preview/{basket_id}/".to_string(),
            cancel_path: "/checkout/paypal/cancel/{basket_id}/".to_string(),
        }
    }
}

impl CheckoutConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let config = Self {
            order_intent: env::var("PAYPAL_ORDER_INTENT").unwrap_or(defaults.order_intent),
            default_currency: env::var("PAYPAL_CURRENCY").unwrap_or(defaults.default_currency),
            callback_scheme: env::var("PAYPAL_CALLBACK_SCHEME")
                .unwrap_or(defaults.callback_scheme),
            callback_host: env::var("PAYPAL_CALLBACK_HOST").ok(),
            return_path: env::var("PAYPAL_RETURN_PATH").unwrap_or(defaults.return_path),
            cancel_path: env::var("PAYPAL_CANCEL_PATH").unwrap_or(defaults.cancel_path),
        };

        // Surface a bad deployment at startup rather than mid-checkout.
        config.intent()?;
        Ok(config)
    }

    pub fn intent(&self) -> Result<Intent, ConfigError> {
        self.order_intent.parse()
    }

    pub fn return_url(&self, host: &str, basket_id: u64) -> String {
        self.callback_url(host, &self.return_path, basket_id)
    }

    pub fn cancel_url(&self, host: &str, basket_id: u64) -> String {
        self.callback_url(host, &self.cancel_path, basket_id)
    }

    fn callback_url(&self, host: &str, template: &str, basket_id: u64) -> String {
        let path = template.replace("{basket_id}", &basket_id.to_string());
        format!("{}://{}{}", self.callback_scheme, host, path)
    }
}

/// Credentials and presentation options for the PayPal REST API.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_url: String,
    pub client_id: String,
    pub client_secret: SecretString,
    pub brand_name: Option<String>,
    /// `LOGIN`, `BILLING` or `NO_PREFERENCE`.
    pub landing_page: Option<String>,
    pub locale: Option<String>,
    /// Buyers complete payment on PayPal rather than returning to confirm.
    pub buyer_pays_on_paypal: bool,
    pub timeout: Duration,
}

impl GatewayConfig {
    pub fn new(
        api_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: &str,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.to_string()),
            brand_name: None,
            landing_page: None,
            locale: None,
            buyer_pays_on_paypal: false,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let sandbox = parse_bool("PAYPAL_SANDBOX_MODE", true)?;
        let api_url = env::var("PAYPAL_API_URL").unwrap_or_else(|_| {
            if sandbox { SANDBOX_API_URL } else { LIVE_API_URL }.to_string()
        });
        let client_id =
            env::var("PAYPAL_CLIENT_ID").map_err(|_| ConfigError::Missing("PAYPAL_CLIENT_ID"))?;
        let client_secret = env::var("PAYPAL_CLIENT_SECRET")
            .map_err(|_| ConfigError::Missing("PAYPAL_CLIENT_SECRET"))?;

        let timeout = match env::var("PAYPAL_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid {
                    key: "PAYPAL_TIMEOUT_SECS",
                    value: raw,
                })?,
            Err(_) => Duration::from_secs(30),
        };

        Ok(Self {
            brand_name: env::var("PAYPAL_BRAND_NAME").ok(),
            landing_page: env::var("PAYPAL_LANDING_PAGE").ok(),
            locale: env::var("PAYPAL_LOCALE").ok(),
            buyer_pays_on_paypal: parse_bool("PAYPAL_BUYER_PAYS_ON_PAYPAL", false)?,
            timeout,
            ..Self::new(api_url, client_id, &client_secret)
        })
    }
}

fn parse_bool(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value: raw }),
        },
        Err(_) => Ok(default),
    }
}
