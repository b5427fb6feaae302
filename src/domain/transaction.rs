use crate::error::ConfigError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether funds are taken immediately or reserved for a later capture.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    Authorize,
    #[default]
    Capture,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Authorize => "AUTHORIZE",
            Intent::Capture => "CAPTURE",
        }
    }
}

impl FromStr for Intent {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "AUTHORIZE" => Ok(Intent::Authorize),
            "CAPTURE" => Ok(Intent::Capture),
            other => Err(ConfigError::InvalidIntent(other.to_string())),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last known gateway-side state of an order.
///
/// The five named states are the ones the checkout flow reasons about. The
/// gateway can report others (a capture held for review comes back as
/// `PENDING`), and those are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Created,
    Saved,
    Approved,
    Voided,
    Completed,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Saved => "SAVED",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Voided => "VOIDED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Other(status) => status,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CREATED" => OrderStatus::Created,
            "SAVED" => OrderStatus::Saved,
            "APPROVED" => OrderStatus::Approved,
            "VOIDED" => OrderStatus::Voided,
            "COMPLETED" => OrderStatus::Completed,
            _ => OrderStatus::Other(value),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(status) => status,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identifier a capture is issued against.
///
/// Authorized orders are captured through their authorization; orders created
/// with `CAPTURE` intent are captured directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTarget<'a> {
    Authorization(&'a str),
    Order(&'a str),
}

impl CaptureTarget<'_> {
    pub fn id(&self) -> &str {
        match self {
            CaptureTarget::Authorization(id) | CaptureTarget::Order(id) => id,
        }
    }

    pub fn intent(&self) -> Intent {
        match self {
            CaptureTarget::Authorization(_) => Intent::Authorize,
            CaptureTarget::Order(_) => Intent::Capture,
        }
    }
}

/// Fields known when a gateway order is first created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: OrderStatus,
    pub intent: Intent,
}

/// One express checkout attempt, keyed by the gateway order id.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub order_id: String,
    pub authorization_id: Option<String>,
    pub capture_id: Option<String>,
    pub refund_id: Option<String>,
    pub payer_id: Option<String>,
    pub email: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub status: OrderStatus,
    pub intent: Intent,
    pub address_full_name: Option<String>,
    /// Shipping address as reported by the gateway, serialized to JSON.
    pub address: Option<String>,
    pub date_created: DateTime<Utc>,
}

impl Transaction {
    pub fn new(new: NewTransaction, date_created: DateTime<Utc>) -> Self {
        Self {
            order_id: new.order_id,
            authorization_id: None,
            capture_id: None,
            refund_id: None,
            payer_id: None,
            email: None,
            amount: new.amount,
            currency: new.currency,
            status: new.status,
            intent: new.intent,
            address_full_name: None,
            address: None,
            date_created,
        }
    }

    pub fn is_authorization(&self) -> bool {
        self.intent == Intent::Authorize
    }

    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    /// True once the buyer has approved the order and payer data was recorded.
    pub fn has_payer(&self) -> bool {
        self.payer_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Picks the identifier a capture must be issued against.
    ///
    /// A missing authorization id is passed through as an empty string; the
    /// gateway is the one that rejects capturing an unauthorized order.
    pub fn capture_target(&self) -> CaptureTarget<'_> {
        match self.intent {
            Intent::Authorize => {
                CaptureTarget::Authorization(self.authorization_id.as_deref().unwrap_or_default())
            }
            Intent::Capture => CaptureTarget::Order(&self.order_id),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "intent: {}, status: {}", self.intent, self.status)
    }
}
