//! Audit records left behind by the NVP-era express checkout integration.
//!
//! Current checkout code only reads these. Each record keeps the raw request
//! and response exchanged with the gateway, with the API password redacted
//! before the record reaches storage.

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const PASSWORD_MASK: &str = "PWD=XXXXXX&";

static PASSWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PWD=\d+&").expect("Invalid password regex"));

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum Ack {
    Success,
    SuccessWithWarning,
    Failure,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LegacyTransaction {
    /// Assigned by the log on append.
    #[serde(default)]
    pub id: u64,
    /// NVP method name, e.g. `SetExpressCheckout`.
    pub method: String,
    pub version: String,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub ack: Ack,
    pub correlation_id: Option<String>,
    pub token: Option<String>,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub raw_request: String,
    pub raw_response: String,
    /// Round trip time in milliseconds.
    pub response_time: f64,
    pub date_created: DateTime<Utc>,
}

impl LegacyTransaction {
    pub fn is_successful(&self) -> bool {
        matches!(self.ack, Ack::Success | Ack::SuccessWithWarning)
    }

    /// Copy of the record that is safe to persist.
    pub fn redacted(mut self) -> Self {
        self.raw_request = redact_credentials(&self.raw_request);
        self
    }
}

/// Masks every `PWD=<digits>&` pair in an NVP query string.
pub fn redact_credentials(raw_request: &str) -> String {
    PASSWORD_RE
        .replace_all(raw_request, PASSWORD_MASK)
        .into_owned()
}
