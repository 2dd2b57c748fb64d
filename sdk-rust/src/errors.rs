use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub(crate) const QUOTA_EXCEEDED_MESSAGE: &str = "Access quota exceeded (402).";

/// Classification of a failed API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimited,
    /// HTTP 402. The usage allowance of the API key is spent.
    AccessQuotaExceeded,
    BadRequest,
    ServerError,
    Unknown,
}

impl ErrorCode {
    /// Map a non-success HTTP status to its code. 402 is not handled here;
    /// it always produces [`ApiError::quota_exceeded`].
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            s if s >= 500 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::RateLimited => "rate_limited",
            Self::AccessQuotaExceeded => "access_quota_exceeded",
            Self::BadRequest => "bad_request",
            Self::ServerError => "server_error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error returned by the InkPilots API, or a request that never got an
/// answer in time (`status == 0`).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    /// The HTTP status, or `0` when the request timed out.
    pub status: u16,
    pub code: ErrorCode,
    /// Value of the `x-request-id` response header. Include it when
    /// contacting support.
    pub request_id: Option<String>,
    /// The full response body: parsed JSON, or a string when the body was
    /// not JSON.
    pub details: Option<Value>,
}

impl ApiError {
    /// The error for HTTP 402. Falls back to a default message when the
    /// body did not provide one.
    #[must_use]
    pub fn quota_exceeded(
        message: Option<String>,
        request_id: Option<String>,
        details: Option<Value>,
    ) -> Self {
        Self {
            message: message.unwrap_or_else(|| QUOTA_EXCEEDED_MESSAGE.to_string()),
            status: 402,
            code: ErrorCode::AccessQuotaExceeded,
            request_id,
            details,
        }
    }

    pub(crate) fn timed_out(timeout_ms: u128) -> Self {
        Self {
            message: format!("Request timed out after {timeout_ms}ms."),
            status: 0,
            code: ErrorCode::Unknown,
            request_id: None,
            details: None,
        }
    }

    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        self.code == ErrorCode::AccessQuotaExceeded
    }

    /// Whether the failure is of a transient kind. The SDK never retries on
    /// its own; this is a hint for callers with their own policy.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.code, ErrorCode::RateLimited | ErrorCode::ServerError) || self.status == 0
    }
}

#[derive(Error, Debug)]
pub enum InkPilotsError {
    /// No API key was passed and `INKPILOTS_API_KEY` is not set.
    #[error("Missing INKPILOTS_API_KEY (or pass `api_key` to InkPilotsClientOptions).")]
    MissingApiKey,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The API answered with a non-success status, or did not answer before
    /// the timeout.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The request could not be sent or its response could not be read.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// A success response whose body does not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl InkPilotsError {
    /// The API error carried by this error, if it is one.
    #[must_use]
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        self.api().is_some_and(ApiError::is_quota_exceeded)
    }
}

pub type InkPilotsResult<T> = Result<T, InkPilotsError>;
