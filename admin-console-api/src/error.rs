use serde::{Deserialize, Serialize};

/// Unified error type for every call made against the admin backend.
///
/// Each variant carries the `endpoint` that produced it (the route label used in
/// logs, e.g. `administrator/invite`) plus variant-specific context. All variants
/// are serializable for structured error reporting.
///
/// # Status classification
///
/// Non-success HTTP responses are classified by [`ApiError::from_status`]:
///
/// | Status | Variant |
/// |--------|---------|
/// | 401 | [`Unauthorized`](Self::Unauthorized) |
/// | 403 | [`Forbidden`](Self::Forbidden) |
/// | 404 | [`NotFound`](Self::NotFound) |
/// | 400, 409, 422 | [`BadRequest`](Self::BadRequest) |
/// | anything else | [`Http`](Self::Http) |
///
/// # Retryable Errors
///
/// [`Network`](Self::Network), [`Timeout`](Self::Timeout) and gateway failures
/// (HTTP 502–504) are transient; list calls retry them with exponential backoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ApiError {
    /// The request never produced a response (DNS failure, connection refused, ...).
    Network {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Error details.
        detail: String,
    },

    /// The request timed out.
    Timeout {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Error details.
        detail: String,
    },

    /// The bearer token is missing, invalid or expired (HTTP 401).
    Unauthorized {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Message returned by the backend, if any.
        raw_message: Option<String>,
    },

    /// The token is valid but lacks access to the company or resource (HTTP 403).
    Forbidden {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Message returned by the backend, if any.
        raw_message: Option<String>,
    },

    /// The addressed entity does not exist (HTTP 404).
    NotFound {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Message returned by the backend, if any.
        raw_message: Option<String>,
    },

    /// The backend rejected the request body (HTTP 400, 409 or 422).
    BadRequest {
        /// Endpoint that produced the error.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Message returned by the backend, if any.
        raw_message: Option<String>,
    },

    /// Any other non-success status.
    Http {
        /// Endpoint that produced the error.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Message returned by the backend, if any.
        raw_message: Option<String>,
    },

    /// The response body could not be parsed.
    Parse {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// The request body could not be serialized.
    Serialization {
        /// Endpoint that produced the error.
        endpoint: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// The HTTP client could not be constructed.
    Configuration {
        /// Details about the invalid configuration.
        detail: String,
    },
}

impl ApiError {
    /// Classify a non-success HTTP status.
    ///
    /// `body` is the raw response text; when it is a JSON object with a
    /// `message` (or `error`) string, that string becomes `raw_message`.
    pub fn from_status(endpoint: impl Into<String>, status: u16, body: &str) -> Self {
        let endpoint = endpoint.into();
        let raw_message = extract_message(body);
        match status {
            401 => Self::Unauthorized {
                endpoint,
                raw_message,
            },
            403 => Self::Forbidden {
                endpoint,
                raw_message,
            },
            404 => Self::NotFound {
                endpoint,
                raw_message,
            },
            400 | 409 | 422 => Self::BadRequest {
                endpoint,
                status,
                raw_message,
            },
            _ => Self::Http {
                endpoint,
                status,
                raw_message,
            },
        }
    }

    /// HTTP status behind this error, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::BadRequest { status, .. } | Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure is transient and the request may be repeated.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Http { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// Whether this is expected behavior (user input, missing resource, expired
    /// session), used to pick the log level.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. }
                | Self::Forbidden { .. }
                | Self::NotFound { .. }
                | Self::BadRequest { .. }
        )
    }
}

fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(trimmed).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network { endpoint, detail } => {
                write!(f, "[{endpoint}] Network error: {detail}")
            }
            Self::Timeout { endpoint, detail } => {
                write!(f, "[{endpoint}] Request timeout: {detail}")
            }
            Self::Unauthorized {
                endpoint,
                raw_message,
            } => write_with_message(f, endpoint, "Unauthorized", raw_message.as_deref()),
            Self::Forbidden {
                endpoint,
                raw_message,
            } => write_with_message(f, endpoint, "Forbidden", raw_message.as_deref()),
            Self::NotFound {
                endpoint,
                raw_message,
            } => write_with_message(f, endpoint, "Not found", raw_message.as_deref()),
            Self::BadRequest {
                endpoint,
                status,
                raw_message,
            } => write_with_message(
                f,
                endpoint,
                &format!("Bad request (HTTP {status})"),
                raw_message.as_deref(),
            ),
            Self::Http {
                endpoint,
                status,
                raw_message,
            } => write_with_message(
                f,
                endpoint,
                &format!("HTTP {status}"),
                raw_message.as_deref(),
            ),
            Self::Parse { endpoint, detail } => {
                write!(f, "[{endpoint}] Parse error: {detail}")
            }
            Self::Serialization { endpoint, detail } => {
                write!(f, "[{endpoint}] Serialization error: {detail}")
            }
            Self::Configuration { detail } => write!(f, "Invalid client configuration: {detail}"),
        }
    }
}

fn write_with_message(
    f: &mut std::fmt::Formatter<'_>,
    endpoint: &str,
    label: &str,
    raw_message: Option<&str>,
) -> std::fmt::Result {
    if let Some(msg) = raw_message {
        write!(f, "[{endpoint}] {label}: {msg}")
    } else {
        write!(f, "[{endpoint}] {label}")
    }
}

impl std::error::Error for ApiError {}

/// Convenience type alias for `Result<T, ApiError>`.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
