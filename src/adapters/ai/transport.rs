//! HTTP plumbing shared by the vendor providers: error mapping and retries.

use reqwest::Response;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::AIError;

/// Maps a reqwest send failure onto the port's error type.
pub(super) fn send_error(err: reqwest::Error, timeout: Duration) -> AIError {
    if err.is_timeout() {
        AIError::Timeout {
            timeout_secs: timeout.as_secs() as u32,
        }
    } else if err.is_connect() {
        AIError::network(format!("Connection failed: {}", err))
    } else {
        AIError::network(err.to_string())
    }
}

/// Passes successful responses through and classifies the rest.
pub(super) async fn check_status(
    response: Response,
    default_retry_after: u32,
) -> Result<Response, AIError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status.as_u16(), body, default_retry_after))
}

pub(super) fn status_error(status: u16, body: String, default_retry_after: u32) -> AIError {
    match status {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(parse_retry_after(&body, default_retry_after)),
        400 | 404 | 422 => AIError::InvalidRequest(body),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, body)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Reads "try again in Ns" out of a provider error body.
pub(super) fn parse_retry_after(body: &str, default_secs: u32) -> u32 {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

    message
        .as_deref()
        .and_then(|s| s.find("try again in ").map(|idx| &s[idx + 13..]))
        .and_then(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse::<u32>().ok()
        })
        .unwrap_or(default_secs)
}

/// Runs `attempt` until it succeeds, fails permanently, or retries run out.
///
/// Backoff doubles from one second: 1s, 2s, 4s, ...
pub(super) async fn with_retries<F, Fut, T>(max_retries: u32, mut attempt: F) -> Result<T, AIError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AIError>>,
{
    let mut retry_count = 0;
    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_retryable() || retry_count >= max_retries => return Err(err),
            Err(err) => {
                tracing::debug!(retry_count, error = %err, "retrying AI request");
                sleep(Duration::from_secs(1 << retry_count)).await;
                retry_count += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn parse_retry_after_from_message() {
        let body = r#"{"error":{"message":"Rate limit exceeded. Please try again in 30 seconds."}}"#;
        assert_eq!(parse_retry_after(body, 60), 30);
    }

    #[test]
    fn parse_retry_after_default() {
        let body = r#"{"error":{"message":"Something went wrong"}}"#;
        assert_eq!(parse_retry_after(body, 60), 60);
        assert_eq!(parse_retry_after("not json", 30), 30);
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(status_error(401, String::new(), 30), AIError::AuthenticationFailed));
        assert!(matches!(
            status_error(429, String::new(), 30),
            AIError::RateLimited { retry_after_secs: 30 }
        ));
        assert!(status_error(503, "down".into(), 30).is_retryable());
        assert!(!status_error(400, "bad".into(), 30).is_retryable());
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), AIError> = with_retries(3, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(AIError::AuthenticationFailed) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_retries_returns_first_transient_error() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), AIError> = with_retries(0, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(AIError::unavailable("down")) }
        })
        .await;

        assert!(matches!(result, Err(AIError::Unavailable { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
