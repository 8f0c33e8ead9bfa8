//! Best-effort views over request and response bodies, used only for logging.
//!
//! Nothing here rejects a body: fields that are missing or of an unexpected
//! type are simply reported as absent.

use serde::Serialize;
use serde_json::Value;

/// Upper bound, in characters, on the output preview written to the logs.
pub const PREVIEW_CHAR_LIMIT: usize = 500;

/// Truncates `text` to at most [`PREVIEW_CHAR_LIMIT`] characters.
pub fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHAR_LIMIT).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessagesField<'a> {
    Absent,
    List(&'a [Value]),
    /// Present but not an array.
    Invalid(&'a Value),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageStat {
    pub role: String,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestSummary<'a> {
    pub model: Option<&'a str>,
    pub max_tokens: Option<u64>,
    pub system_length: usize,
    pub messages: MessagesField<'a>,
}

impl<'a> RequestSummary<'a> {
    pub fn from_body(body: &'a Value) -> Self {
        let messages = match body.get("messages") {
            None | Some(Value::Null) => MessagesField::Absent,
            Some(Value::Array(list)) => MessagesField::List(list),
            Some(other) => MessagesField::Invalid(other),
        };

        Self {
            model: body.get("model").and_then(Value::as_str),
            max_tokens: body.get("max_tokens").and_then(Value::as_u64),
            system_length: body.get("system").map(text_length).unwrap_or(0),
            messages,
        }
    }

    pub fn message_count(&self) -> usize {
        match self.messages {
            MessagesField::List(list) => list.len(),
            _ => 0,
        }
    }

    pub fn message_stats(&self) -> Vec<MessageStat> {
        let MessagesField::List(list) = self.messages else {
            return Vec::new();
        };

        list.iter()
            .map(|message| MessageStat {
                role: message
                    .get("role")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string(),
                length: message.get("content").map(text_length).unwrap_or(0),
            })
            .collect()
    }
}

/// Character count of a string, or of the `text` fields of a block array.
fn text_length(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        Value::Array(blocks) => blocks
            .iter()
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .map(|text| text.chars().count())
            .sum(),
        _ => 0,
    }
}
