//! es-connector - Remote sync API abstraction for erpsync
//!
//! This crate provides the `Connector` trait that the sync executor drives,
//! the JSON envelope exchanged with the remote sync endpoints, and an
//! HTTP implementation built on reqwest.

pub mod envelope;
pub mod error;
pub mod http;
pub mod traits;

pub use envelope::{ImportOptions, RemoteAction, RemoteData, RemoteItem, RemoteResponse, RemoteStatus};
pub use error::{ConnectorError, ConnectorResult};
pub use http::HttpConnector;
pub use traits::Connector;
