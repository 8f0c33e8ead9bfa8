use async_trait::async_trait;
use claude_relay::{
    Error, Result,
    upstream::{UpstreamClient, UpstreamRequest, UpstreamResponse},
};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Mock upstream client for testing
#[derive(Debug, Clone)]
pub struct MockUpstreamClient {
    pub response: Arc<Mutex<Option<UpstreamResponse>>>,
    pub requests: Arc<Mutex<Vec<UpstreamRequest>>>,
    pub error: Option<String>,
}

impl MockUpstreamClient {
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
            error: None,
        }
    }

    pub fn with_response(self, status: StatusCode, body: Value) -> Self {
        *self.response.lock().unwrap() = Some(UpstreamResponse::new(status, body));
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn get_requests(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamClient for MockUpstreamClient {
    async fn send_message(&self, request: UpstreamRequest) -> Result<UpstreamResponse> {
        self.requests.lock().unwrap().push(request);

        if let Some(ref error) = self.error {
            return Err(Error::upstream(error.clone()));
        }

        self.response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::upstream("No mock response configured"))
    }
}

impl Default for MockUpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}
