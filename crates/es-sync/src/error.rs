//! Error types for es-sync

use es_connector::ConnectorError;
use es_core::SyncDetail;
use thiserror::Error;

/// Why a single entity attempt failed
///
/// Never escapes the executor: every variant is folded into an error
/// `SyncResult` for the entity.
#[derive(Error, Debug)]
pub enum AttemptError {
    /// The connector call itself failed (S001)
    #[error("[S001] Remote call failed: {0}")]
    Connector(#[from] ConnectorError),

    /// The remote side answered with an error envelope (S002)
    #[error("[S002] Remote reported an error: {message}")]
    Rejected { message: String, detail: SyncDetail },

    /// The connector panicked while handling the call (S003)
    #[error("[S003] Connector panicked: {0}")]
    Panicked(String),
}

impl AttemptError {
    /// Message recorded on the entity's result
    pub fn message(&self) -> String {
        match self {
            AttemptError::Connector(err) => err.detail(),
            AttemptError::Rejected { message, .. } if message.is_empty() => {
                "remote reported an error without a message".to_string()
            }
            AttemptError::Rejected { message, .. } => message.clone(),
            AttemptError::Panicked(msg) => format!("connector panicked: {}", msg),
        }
    }

    /// Item detail that came with an error envelope, whatever the HTTP status
    pub fn into_detail(self) -> SyncDetail {
        match self {
            AttemptError::Rejected { detail, .. }
            | AttemptError::Connector(ConnectorError::Status { detail, .. }) => detail,
            _ => SyncDetail::default(),
        }
    }
}
