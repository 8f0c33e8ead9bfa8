use super::{
    summary::{MessagesField, RequestSummary, preview},
    types::ErrorResponse,
};
use crate::{
    Error, Result,
    config::{Config, LogVerbosity},
    credentials::{CredentialProvider, EnvCredential},
    upstream::{AnthropicClient, UpstreamClient, UpstreamRequest, UpstreamResponse},
};
use axum::{
    extract::{State, rejection::BytesRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, error, error_span, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn UpstreamClient>,
    pub credentials: Arc<dyn CredentialProvider>,
    pub verbosity: LogVerbosity,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            upstream: Arc::new(AnthropicClient::new(&config.upstream)?),
            credentials: Arc::new(EnvCredential::new(&config.upstream.api_key_env)),
            verbosity: config.server.logs.verbosity,
            max_body_bytes: config.server.max_body_bytes,
        })
    }
}

/// Forwards a browser `POST` to the upstream and relays the answer, tagged
/// with a fresh `requestId`. CORS headers are added by the router layer.
pub async fn relay(
    State(state): State<AppState>,
    method: Method,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }

    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(ErrorResponse::new("Method Not Allowed")),
        )
            .into_response();
    }

    let request_id = Uuid::new_v4().to_string();

    // Error level so the id stays attached under any level filter
    let span = error_span!("relay", request_id = %request_id);
    handle_post(&state, &request_id, body)
        .instrument(span)
        .await
}

async fn handle_post(
    state: &AppState,
    request_id: &str,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let Some(api_key) = state.credentials.api_key() else {
        let err = Error::missing_credential(state.credentials.name());
        error!("Upstream API key is not configured: {}", err);
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), request_id);
    };

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            error!(
                status = rejection.status().as_u16(),
                error = %rejection.body_text(),
                "Failed to read inbound body"
            );
            return error_response(rejection.status(), rejection.body_text(), request_id);
        }
    };

    match forward(state, request_id, api_key, body).await {
        Ok(response) => response,
        Err(e) => {
            error!(
                error = %e,
                trace = %e.source_chain(),
                "Relay to upstream failed"
            );
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), request_id)
        }
    }
}

async fn forward(
    state: &AppState,
    request_id: &str,
    api_key: String,
    body: Bytes,
) -> Result<Response> {
    log_request(&body, state.verbosity);

    let upstream = state
        .upstream
        .send_message(UpstreamRequest { api_key, body })
        .await?;

    log_response(&upstream);

    let UpstreamResponse { status, body } = upstream;
    let mut fields = match body {
        Value::Object(fields) => fields,
        other => {
            return Err(Error::upstream(format!(
                "expected a JSON object from upstream, got {}",
                json_kind(&other)
            )));
        }
    };
    fields.insert(
        "requestId".to_string(),
        Value::String(request_id.to_string()),
    );

    Ok((status, Json(Value::Object(fields))).into_response())
}

fn log_request(body: &Bytes, verbosity: LogVerbosity) {
    let parsed = match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                error = %e,
                "Inbound body is not valid JSON, forwarding unchanged"
            );
            Value::Null
        }
    };
    let summary = RequestSummary::from_body(&parsed);

    if let MessagesField::Invalid(messages) = summary.messages {
        warn!(
            model = ?summary.model,
            max_tokens = ?summary.max_tokens,
            system_length = summary.system_length,
            messages = %preview(&messages.to_string()),
            "Inbound messages field is not an array, forwarding unchanged"
        );
        return;
    }

    info!(
        model = ?summary.model,
        max_tokens = ?summary.max_tokens,
        system_length = summary.system_length,
        message_count = summary.message_count(),
        "Forwarding request upstream"
    );

    if verbosity == LogVerbosity::Full {
        let messages = match summary.messages {
            MessagesField::List(list) => Value::from(list.to_vec()),
            _ => Value::Array(Vec::new()),
        };
        let stats = serde_json::to_string(&summary.message_stats()).unwrap_or_default();
        info!(
            messages = %messages,
            message_stats = %stats,
            "Request messages"
        );
    }
}

fn log_response(upstream: &UpstreamResponse) {
    let usage = upstream.usage().map(Value::to_string).unwrap_or_default();
    let output_preview = upstream.primary_text().map(preview).unwrap_or_default();

    info!(
        status = upstream.status.as_u16(),
        usage = %usage,
        output_preview = %output_preview,
        "Upstream responded"
    );
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn error_response(status: StatusCode, error: String, request_id: &str) -> Response {
    (
        status,
        Json(ErrorResponse::with_request_id(error, request_id)),
    )
        .into_response()
}
