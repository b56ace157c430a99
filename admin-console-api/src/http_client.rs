//! Generic HTTP execution helpers
//!
//! Every call against the admin backend goes through [`HttpUtils`]: it sends the
//! prepared `RequestBuilder`, logs the exchange (with secrets redacted), and turns
//! non-success statuses into a classified [`ApiError`].

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{ApiError, ApiResult};
use crate::utils::log_sanitizer::sanitize_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the response text.
    ///
    /// # Arguments
    /// * `request_builder` - fully configured request (URL, headers, body)
    /// * `method_name` - HTTP verb, for logging
    /// * `endpoint` - route label, for logging and error context
    ///
    /// # Returns
    /// * `Ok(response_text)` on any 2xx status
    /// * `Err(ApiError)` classified by [`ApiError::from_status`] otherwise
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        endpoint: &str,
    ) -> ApiResult<String> {
        log::debug!("[{endpoint}] {method_name}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    endpoint: endpoint.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ApiError::Network {
                    endpoint: endpoint.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{endpoint}] Response Status: {status_code}");

        let response_text = response.text().await.map_err(|e| ApiError::Network {
            endpoint: endpoint.to_string(),
            detail: format!("Failed to read response body: {e}"),
        })?;

        log::debug!(
            "[{endpoint}] Response Body: {}",
            sanitize_for_log(&response_text)
        );

        if !(200..300).contains(&status_code) {
            let err = ApiError::from_status(endpoint, status_code, &response_text);
            if err.is_expected() {
                log::warn!("{err}");
            } else {
                log::error!("{err}");
            }
            return Err(err);
        }

        Ok(response_text)
    }

    /// Parse a JSON response body.
    pub fn parse_json<T>(response_text: &str, endpoint: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{endpoint}] JSON parse failed: {e}");
            log::error!(
                "[{endpoint}] Raw response: {}",
                sanitize_for_log(response_text)
            );
            ApiError::Parse {
                endpoint: endpoint.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Performs an HTTP request with retries on transient failures.
    ///
    /// Only idempotent reads should use this; mutating calls are sent once.
    ///
    /// # Retry strategy
    /// - Only [`ApiError::is_retryable`] errors are retried
    /// - Exponential backoff: 100ms, 200ms, 400ms, ... (maximum 10 seconds)
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        method_name: &str,
        endpoint: &str,
        max_retries: u32,
    ) -> ApiResult<String> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, method_name, endpoint).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            // RequestBuilder is single-use
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{endpoint}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, method_name, endpoint).await;
            };

            match Self::execute_request(req, method_name, endpoint).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_retryable() => {
                    let delay = backoff_delay(attempt);
                    log::warn!(
                        "[{}] Request failed (attempt {}/{}), retrying in {:.1}s: {}",
                        endpoint,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::Network {
            endpoint: endpoint.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Exponential backoff: 100ms, 200ms, 400ms, 800ms, 1.6s, ... capped at 10 seconds.
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}
