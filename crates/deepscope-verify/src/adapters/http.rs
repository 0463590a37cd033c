//! Shared HTTP plumbing for the built-in adapters

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::Instant;

use crate::error::{AdapterError, VerifyError};

/// Maps a non-success status (with any retry-after hint and the body) to an error
pub(crate) type StatusClassifier = fn(u16, Option<Duration>, &str) -> AdapterError;

/// Default status mapping: 429 is throttling, 401/403 are auth, 5xx upstream.
pub(crate) fn classify_status(status: u16, retry_after: Option<Duration>, body: &str) -> AdapterError {
    match AdapterError::from_status(status, body) {
        AdapterError::RateLimited { .. } => AdapterError::RateLimited { retry_after },
        other => other,
    }
}

/// Build the client shared by every adapter.
pub(crate) fn build_client(request_timeout: Duration) -> Result<Client, VerifyError> {
    let client = Client::builder()
        .timeout(request_timeout)
        .gzip(true)
        .build()?;
    Ok(client)
}

/// Send `request`, bounded by `deadline`, and return the successful response.
pub(crate) async fn send(
    request: RequestBuilder,
    deadline: Instant,
    classify: StatusClassifier,
) -> Result<Response, AdapterError> {
    let response = dispatch(request, deadline).await?;
    if response.status().is_success() {
        return Ok(response);
    }
    Err(status_error(response, classify).await)
}

/// Like [`send`], but a 404 is an empty answer rather than an error.
pub(crate) async fn send_allow_missing(
    request: RequestBuilder,
    deadline: Instant,
    classify: StatusClassifier,
) -> Result<Option<Response>, AdapterError> {
    let response = dispatch(request, deadline).await?;
    if response.status().is_success() {
        return Ok(Some(response));
    }
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    Err(status_error(response, classify).await)
}

async fn dispatch(request: RequestBuilder, deadline: Instant) -> Result<Response, AdapterError> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return Err(AdapterError::Timeout);
    }
    Ok(request.timeout(remaining).send().await?)
}

async fn status_error(response: Response, classify: StatusClassifier) -> AdapterError {
    let status = response.status().as_u16();
    let retry_after = retry_after(response.headers());
    let body = response.text().await.unwrap_or_default();
    classify(status, retry_after, &body)
}

/// Read a successful response body as JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AdapterError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| AdapterError::Parse(e.to_string()))
}

/// `Retry-After` in its delay-seconds form
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Clip source text for use as evidence
pub(crate) fn clip(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max_chars).collect();
    clipped.push('…');
    clipped
}
