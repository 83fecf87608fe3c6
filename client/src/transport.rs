//! Transport seam between [`crate::EscClient`] and the network.
//!
//! Implementations own HTTP, authentication headers, timeouts and retries;
//! they hand back parsed JSON bodies and classify failures as
//! [`PlatformError`]s.

use async_trait::async_trait;
use rust_common::PlatformError;
use serde_json::Value;
use url::Url;

/// Request/response transport for the ESC API.
#[async_trait]
pub trait EscTransport: Send + Sync {
    /// `GET url`, returning the parsed body (`null` when empty).
    async fn get(&self, url: Url) -> Result<Value, PlatformError>;

    /// `POST url` with an optional JSON body.
    async fn post(&self, url: Url, body: Option<Value>) -> Result<Value, PlatformError>;

    /// `PUT url` with a JSON body.
    async fn put(&self, url: Url, body: Value) -> Result<Value, PlatformError>;

    /// `DELETE url`.
    async fn delete(&self, url: Url) -> Result<(), PlatformError>;
}
