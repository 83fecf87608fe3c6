//! Mock implementations for testing.
//!
//! [`MockTransport`] records every request and answers from a queue of
//! canned responses, so the client can be tested without a network.

use async_trait::async_trait;
use esc_client::EscTransport;
use rust_common::PlatformError;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

/// HTTP method of a recorded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

/// A request seen by the mock transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Method
    pub method: RequestMethod,
    /// Full URL, query included
    pub url: Url,
    /// JSON body, if any
    pub body: Option<Value>,
}

/// In-memory transport with queued responses.
#[derive(Debug, Default, Clone)]
pub struct MockTransport {
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    responses: Arc<RwLock<VecDeque<Result<Value, PlatformError>>>>,
}

impl MockTransport {
    /// Create a mock transport with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body.
    pub async fn respond_with(&self, body: Value) {
        self.responses.write().await.push_back(Ok(body));
    }

    /// Queue a failure.
    pub async fn fail_with(&self, error: PlatformError) {
        self.responses.write().await.push_back(Err(error));
    }

    /// Get all recorded requests.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// Get the most recent request.
    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.read().await.last().cloned()
    }

    /// Get request count.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Number of queued responses not consumed yet.
    pub async fn pending_responses(&self) -> usize {
        self.responses.read().await.len()
    }

    async fn record(
        &self,
        method: RequestMethod,
        url: Url,
        body: Option<Value>,
    ) -> Result<Value, PlatformError> {
        self.requests
            .write()
            .await
            .push(RecordedRequest { method, url, body });
        self.responses
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(PlatformError::Internal("no queued response".to_string())))
    }
}

#[async_trait]
impl EscTransport for MockTransport {
    async fn get(&self, url: Url) -> Result<Value, PlatformError> {
        self.record(RequestMethod::Get, url, None).await
    }

    async fn post(&self, url: Url, body: Option<Value>) -> Result<Value, PlatformError> {
        self.record(RequestMethod::Post, url, body).await
    }

    async fn put(&self, url: Url, body: Value) -> Result<Value, PlatformError> {
        self.record(RequestMethod::Put, url, Some(body)).await
    }

    async fn delete(&self, url: Url) -> Result<(), PlatformError> {
        self.record(RequestMethod::Delete, url, None).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_transport_queue() {
        let mock = MockTransport::new();
        mock.respond_with(json!({"id": "1"})).await;
        mock.fail_with(PlatformError::RateLimited).await;

        let url = Url::parse("https://api.example.com/api/esc/x").unwrap();
        assert_eq!(mock.get(url.clone()).await.unwrap(), json!({"id": "1"}));
        assert!(matches!(
            mock.put(url.clone(), json!({})).await,
            Err(PlatformError::RateLimited)
        ));
        assert!(mock.delete(url).await.is_err());

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].method, RequestMethod::Put);
        assert_eq!(requests[1].body, Some(json!({})));
        assert_eq!(mock.pending_responses().await, 0);
    }
}
