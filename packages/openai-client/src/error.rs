//! Error types for the OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// OpenAI client errors.
///
/// Quota exhaustion and rate limiting get their own variants because
/// callers apply different recovery policies to each: quota failures
/// are permanent for the billing period, rate limits are transient.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API quota exhausted for the current billing period
    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),

    /// Rate limit exceeded; the request may succeed if retried later
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other API error (non-2xx response, invalid request)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OpenAIError {
    /// Classify a non-success API response body into the right variant.
    ///
    /// The API signals quota exhaustion with an `insufficient_quota`
    /// error code and rate limiting with HTTP 429 / a `rate_limit`
    /// error type, so matching on the body text covers both shapes.
    pub(crate) fn from_api_response(status: reqwest::StatusCode, body: String) -> Self {
        if body.contains("insufficient_quota") {
            OpenAIError::QuotaExhausted(body)
        } else if status.as_u16() == 429 || body.contains("rate_limit") {
            OpenAIError::RateLimited(body)
        } else {
            OpenAIError::Api(format!("OpenAI API error ({}): {}", status, body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_quota_classified_before_rate_limit() {
        // insufficient_quota also arrives with HTTP 429; quota wins.
        let err = OpenAIError::from_api_response(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"code":"insufficient_quota"}}"#.to_string(),
        );
        assert!(matches!(err, OpenAIError::QuotaExhausted(_)));
    }

    #[test]
    fn test_429_classified_as_rate_limited() {
        let err = OpenAIError::from_api_response(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"type":"requests"}}"#.to_string(),
        );
        assert!(matches!(err, OpenAIError::RateLimited(_)));
    }

    #[test]
    fn test_rate_limit_error_type_on_other_status() {
        let err = OpenAIError::from_api_response(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error":{"type":"rate_limit_exceeded"}}"#.to_string(),
        );
        assert!(matches!(err, OpenAIError::RateLimited(_)));
    }

    #[test]
    fn test_other_errors_fall_through_to_api() {
        let err = OpenAIError::from_api_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":"invalid_request"}}"#.to_string(),
        );
        assert!(matches!(err, OpenAIError::Api(_)));
    }
}
