//! Retry utilities for transient coach failures.

use crate::error::CoachError;
use std::time::Duration;

/// Determine whether a coach error is worth retrying.
///
/// Retryable errors: timeouts, rate limits (429), server errors (5xx).
/// Non-retryable: auth failures, bad requests, empty replies.
pub fn is_retryable(error: &CoachError) -> bool {
    match error {
        CoachError::Timeout { .. } => true,
        CoachError::Http {
            status_code,
            message,
        } => {
            if let Some(code) = status_code {
                return *code == 429 || (500..=599).contains(code);
            }
            // Transport failures carry no status (connection refused, DNS)
            message.contains("timed out") || message.contains("connect")
        }
        CoachError::EmptyReply => false,
    }
}

/// Exponential backoff: `base_delay * 2^attempt`, capped at 30 seconds.
pub fn backoff_duration(attempt: u32, base_delay_ms: u64) -> Duration {
    let delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    Duration::from_millis(delay.min(30_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status_code: Option<u16>, message: &str) -> CoachError {
        CoachError::Http {
            message: message.to_string(),
            status_code,
        }
    }

    #[test]
    fn test_timeout_is_retryable() {
        assert!(is_retryable(&CoachError::Timeout { timeout_ms: 60000 }));
    }

    #[test]
    fn test_rate_limit_and_server_errors_retryable() {
        assert!(is_retryable(&http(Some(429), "rate limit exceeded")));
        assert!(is_retryable(&http(Some(503), "service unavailable")));
    }

    #[test]
    fn test_client_errors_not_retryable() {
        assert!(!is_retryable(&http(Some(401), "unauthorized")));
        assert!(!is_retryable(&http(Some(400), "bad request")));
        assert!(!is_retryable(&CoachError::EmptyReply));
    }

    #[test]
    fn test_status_less_errors_classified_by_message() {
        assert!(is_retryable(&http(None, "error trying to connect: refused")));
        assert!(!is_retryable(&http(None, "Processed 500 tokens successfully")));
    }

    #[test]
    fn test_backoff_exponential() {
        assert_eq!(backoff_duration(0, 1000), Duration::from_millis(1000));
        assert_eq!(backoff_duration(1, 1000), Duration::from_millis(2000));
        assert_eq!(backoff_duration(3, 1000), Duration::from_millis(8000));
    }

    #[test]
    fn test_backoff_capped_at_30s() {
        assert_eq!(backoff_duration(10, 1000), Duration::from_millis(30_000));
        assert_eq!(backoff_duration(200, u64::MAX), Duration::from_millis(30_000));
    }
}
