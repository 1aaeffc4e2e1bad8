//! Error types for es-connector

use es_core::SyncDetail;
use thiserror::Error;

/// Remote call errors
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Request could not be sent or the response could not be read (C001)
    #[error("[C001] Transport error: {0}")]
    Transport(String),

    /// Remote side answered with a non-2xx status (C002)
    ///
    /// `detail` holds the item detail when the body was an error envelope.
    #[error("[C002] HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        detail: SyncDetail,
    },

    /// 2xx response whose body is not a sync envelope (C003)
    #[error("[C003] Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP client could not be configured (C004)
    #[error("[C004] Connector configuration error: {0}")]
    Config(String),
}

impl ConnectorError {
    /// The error text without its code prefix, as shown per entity
    pub fn detail(&self) -> String {
        match self {
            ConnectorError::Transport(msg)
            | ConnectorError::InvalidResponse(msg)
            | ConnectorError::Config(msg) => msg.clone(),
            ConnectorError::Status {
                status, message, ..
            } => format!("HTTP {}: {}", status, message),
        }
    }
}

/// Result type alias for ConnectorError
pub type ConnectorResult<T> = Result<T, ConnectorError>;
