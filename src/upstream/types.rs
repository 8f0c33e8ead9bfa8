use bytes::Bytes;
use reqwest::StatusCode;
use serde_json::Value;

/// One outbound call: the resolved key and the inbound body, untouched.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub api_key: String,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// Token accounting reported by the upstream, if any.
    pub fn usage(&self) -> Option<&Value> {
        self.body.get("usage")
    }

    /// Text of the first content block, `content[0].text`.
    pub fn primary_text(&self) -> Option<&str> {
        self.body
            .get("content")
            .and_then(|content| content.get(0))
            .and_then(|block| block.get("text"))
            .and_then(Value::as_str)
    }
}
