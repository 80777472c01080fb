//! Application service — bounded download retry and service readiness wait.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;
use std::time::Duration;

use crate::application::ports::{CommandRunner, ExecContext, Fetcher};
use crate::domain::{DownloadError, RetryPolicy, ServiceTimeout};

/// Download `url` to `dest`, making at most `policy.max_attempts` attempts.
///
/// Sleeps `policy.backoff` between a failed attempt and the next one, never
/// after the last.
///
/// # Errors
///
/// Returns [`DownloadError::Exhausted`] once every attempt has failed, and
/// without fetching at all when `max_attempts` is 0.
pub async fn download_with_retry(
    fetcher: &impl Fetcher,
    url: &str,
    dest: &Path,
    policy: &RetryPolicy,
) -> Result<(), DownloadError> {
    let attempts = policy.max_attempts;
    let mut last_error = String::from("retry policy allows no attempts");

    for attempt in 1..=attempts {
        match fetcher.fetch(url, dest, policy).await {
            Ok(()) => {
                tracing::debug!(url, attempt, "download complete");
                return Ok(());
            }
            Err(e) => {
                last_error = format!("{e:#}");
                tracing::warn!(url, attempt, error = %last_error, "download attempt failed");
                if attempt < attempts {
                    tokio::time::sleep(policy.backoff).await;
                }
            }
        }
    }

    Err(DownloadError::Exhausted {
        url: url.to_string(),
        attempts,
        last_error,
    })
}

/// Poll `systemctl is-active --quiet <service>` once per second.
///
/// Checks at t = 0, 1, ..., `timeout_secs - 1` and gives up after the
/// sleep that follows the last check, so a unit that never comes up fails
/// after exactly `timeout_secs` seconds.
///
/// # Errors
///
/// Returns [`ServiceTimeout`] if the unit is not active by then.
pub async fn wait_for_service(
    runner: &impl CommandRunner,
    ctx: &ExecContext,
    service: &str,
    timeout_secs: u64,
) -> Result<(), ServiceTimeout> {
    for _ in 0..timeout_secs {
        let active = runner
            .run(ctx, "systemctl", &["is-active", "--quiet", service])
            .await
            .is_ok_and(|o| o.status.success());
        if active {
            tracing::debug!(service, "service active");
            return Ok(());
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Err(ServiceTimeout {
        service: service.to_string(),
        timeout_secs,
    })
}
