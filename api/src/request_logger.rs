//! Structured request logging middleware for the TODO routes
//!
//! Emits one `tracing` event per `/todos` request with method, status,
//! latency and a truncated summary of the JSON body or query string.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::Value;
use std::time::Instant;

use crate::error::ApiError;

/// Largest request body buffered for a `/todos` call
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Maximum length for a logged field value before truncation
const MAX_FIELD_LENGTH: usize = 30;

const TRUNCATION_SUFFIX: &str = "...";

/// Request logging middleware
///
/// Only `/todos` is logged; health probes would drown the log otherwise.
/// The body is buffered up to [`MAX_BODY_BYTES`] so it can be summarized,
/// then handed on unchanged. Larger bodies are answered with a JSON 413
/// without reading past the limit.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if !path.starts_with("/todos") {
        return next.run(request).await;
    }

    let start_time = Instant::now();
    let method = request.method().clone();
    let query = request.uri().query().unwrap_or_default().to_string();

    let (parts, body) = request.into_parts();
    let (response, summary) = match buffer_body(&parts.headers, body).await {
        Ok(bytes) => {
            let summary = if bytes.is_empty() {
                truncate_string(&query, MAX_FIELD_LENGTH * 2)
            } else {
                summarize_body(&bytes)
            };
            let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;
            (response, summary)
        }
        Err(error) => {
            tracing::warn!(%method, path = %path, error = %error, "Rejected request body");
            (error.into_response(), "<rejected body>".to_string())
        }
    };

    tracing::info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        params = %summary,
        "HTTP request"
    );

    response
}

async fn buffer_body(headers: &axum::http::HeaderMap, body: Body) -> Result<Bytes, ApiError> {
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    if let Some(len) = declared.filter(|len| *len > MAX_BODY_BYTES as u64) {
        return Err(ApiError::PayloadTooLarge(format!(
            "declared {len} bytes, limit is {MAX_BODY_BYTES}"
        )));
    }

    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(
            ApiError::PayloadTooLarge(format!("body exceeds {MAX_BODY_BYTES} bytes")),
        ),
        Err(e) => Err(ApiError::BadRequest(format!("Failed to read request body: {e}"))),
    }
}

fn summarize_body(bytes: &[u8]) -> String {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| {
                if is_sensitive_field(key) {
                    format!("{key}=\"[REDACTED]\"")
                } else {
                    format!("{key}=\"{}\"", format_field_value(value))
                }
            })
            .collect::<Vec<_>>()
            .join(", "),
        Ok(other) => format_field_value(&other),
        Err(_) => "<invalid json>".to_string(),
    }
}

fn format_field_value(value: &Value) -> String {
    let rendered = match value {
        Value::String(s) => s.clone(),
        Value::Array(items) if items.len() <= 5 => {
            let inner: Vec<String> = items.iter().map(Value::to_string).collect();
            format!("[{}]", inner.join(","))
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{...{} fields}}", fields.len()),
        other => other.to_string(),
    };

    truncate_string(&rendered, MAX_FIELD_LENGTH)
}

/// Truncate to at most `max_chars` characters, including the suffix
fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        return input.to_string();
    }

    let keep = max_chars.saturating_sub(TRUNCATION_SUFFIX.len());
    let mut truncated: String = input.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_SUFFIX);
    truncated
}

fn is_sensitive_field(key: &str) -> bool {
    const SENSITIVE: [&str; 6] = ["password", "token", "secret", "key", "auth", "credential"];

    let key = key.to_lowercase();
    SENSITIVE.iter().any(|needle| key.contains(needle))
}
