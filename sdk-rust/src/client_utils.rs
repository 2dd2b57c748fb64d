use crate::errors::{ApiError, ErrorCode, InkPilotsError, InkPilotsResult};
use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Client, Method, Url,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");
const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// A success response and what is known about the exchange.
#[derive(Debug)]
pub struct ApiResponse<R> {
    pub data: R,
    pub status: u16,
    pub request_id: Option<String>,
}

/// Join the base URL and path, then append the present query parameters in
/// the order given.
pub fn build_url(
    base_url: &str,
    path: &str,
    query: &[(&str, Option<String>)],
) -> InkPilotsResult<Url> {
    let mut url = Url::parse(&format!("{base_url}{path}")).map_err(|error| {
        InkPilotsError::InvalidInput(format!("Invalid request URL '{base_url}{path}': {error}"))
    })?;

    let mut present = query
        .iter()
        .filter_map(|(key, value)| value.as_deref().map(|value| (*key, value)))
        .peekable();
    if present.peek().is_some() {
        url.query_pairs_mut().extend_pairs(present);
    }

    Ok(url)
}

/// Headers sent with every request. The API expects the key in `x-api-key`
/// with a `Bearer ` prefix, not in `Authorization`.
pub fn request_headers(api_key: &str) -> InkPilotsResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut api_key_header =
        HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|error| {
            InkPilotsError::InvalidInput(format!("Invalid InkPilots API key header value: {error}"))
        })?;
    api_key_header.set_sensitive(true);

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(API_KEY_HEADER, api_key_header);

    Ok(headers)
}

/// Send a request and decode a JSON response.
/// Non-success statuses and timeouts are returned as [`ApiError`].
pub async fn send_json<R: DeserializeOwned>(
    client: &Client,
    method: Method,
    url: Url,
    headers: HeaderMap,
    timeout: Duration,
) -> InkPilotsResult<ApiResponse<R>> {
    debug!(%method, %url, "sending InkPilots request");

    let response = client
        .request(method, url)
        .headers(headers)
        .timeout(timeout)
        .send()
        .await
        .map_err(|error| transport_error(error, timeout))?;

    let status = response.status();
    let request_id = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);

    let text = response
        .text()
        .await
        .map_err(|error| transport_error(error, timeout))?;
    let body = parse_body(&text);

    if !status.is_success() {
        let error = api_error(status.as_u16(), request_id, body);
        debug!(
            status = error.status,
            code = %error.code,
            request_id = ?error.request_id,
            "InkPilots request failed"
        );
        return Err(error.into());
    }

    let data = serde_json::from_value(body.unwrap_or(Value::Null)).map_err(|error| {
        InkPilotsError::InvalidResponse(format!(
            "Failed to decode response (status {status}): {error}"
        ))
    })?;

    Ok(ApiResponse {
        data,
        status: status.as_u16(),
        request_id,
    })
}

fn transport_error(error: reqwest::Error, timeout: Duration) -> InkPilotsError {
    if error.is_timeout() {
        ApiError::timed_out(timeout.as_millis()).into()
    } else {
        InkPilotsError::Transport(error)
    }
}

/// JSON when the body parses, the raw text otherwise, nothing when empty.
pub fn parse_body(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

/// Pick an error message from the common body shapes: `{ "message" }`,
/// `{ "error": { "message" } }` or a plain string.
pub fn pick_message(body: Option<&Value>) -> Option<String> {
    match body? {
        Value::String(text) => Some(text.clone()),
        Value::Object(object) => object
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| {
                object
                    .get("error")
                    .and_then(|error| error.get("message"))
                    .and_then(Value::as_str)
            })
            .map(ToString::to_string),
        _ => None,
    }
}

/// Classify a non-success response.
pub fn api_error(status: u16, request_id: Option<String>, body: Option<Value>) -> ApiError {
    let message = pick_message(body.as_ref());

    if status == 402 {
        return ApiError::quota_exceeded(message, request_id, body);
    }

    ApiError {
        message: message.unwrap_or_else(|| format!("Request failed with status {status}.")),
        status,
        code: ErrorCode::from_status(status),
        request_id,
        details: body,
    }
}
