use thiserror::Error;

/// Failures reported by the payment gateway adapter.
///
/// The facade never inspects these; they travel unchanged to the caller,
/// which decides how to present them.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Gateway rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Gateway transport error: {0}")]
    Transport(String),
    #[error("Unexpected gateway response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// HTTP-style status code, when the gateway produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            GatewayError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            GatewayError::Transport(err.to_string())
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("'{0}' is not a valid order intent")]
    InvalidIntent(String),
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("No transaction found for order {order_id}")]
    NotFound { order_id: String },
    #[error("A transaction for order {order_id} already exists")]
    DuplicateOrder { order_id: String },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for CheckoutError {
    fn from(err: rocksdb::Error) -> Self {
        CheckoutError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
