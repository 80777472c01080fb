//! Application service — post-install verification.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ExecContext, HostProbe, HttpProbe, ProgressReporter};
use crate::application::services::preflight::check_disk_stage;
use crate::domain::verify::{
    HealthOutcome, VerificationReport, container_is_up, filesystem_errors, join_url,
};
use crate::domain::{DiskStage, VerificationError};

/// Log lines dumped when the container is not running.
pub const LOG_TAIL_LINES: &str = "50";

/// Check the running stack.
///
/// Container status, kernel filesystem errors and free disk are hard
/// checks. The HTTP health probe only warns.
///
/// # Errors
///
/// Returns `VerificationError` or `InsufficientDiskSpace` for a hard
/// failure, or an error if a probe command cannot run.
pub async fn verify(
    runner: &impl CommandRunner,
    http: &impl HttpProbe,
    host: &impl HostProbe,
    reporter: &impl ProgressReporter,
    ctx: &ExecContext,
    app_url: &str,
    health_path: &str,
) -> Result<VerificationReport> {
    let ps = runner
        .run(ctx, "docker", &["compose", "ps"])
        .await
        .context("running docker compose ps")?;
    if !container_is_up(&String::from_utf8_lossy(&ps.stdout)) {
        let logs = runner
            .run(ctx, "docker", &["compose", "logs", "--tail", LOG_TAIL_LINES])
            .await
            .map(|o| {
                let mut text = String::from_utf8_lossy(&o.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&o.stderr));
                text
            })
            .unwrap_or_else(|e| format!("(logs unavailable: {e})"));
        return Err(VerificationError::ContainerNotRunning { logs }.into());
    }
    reporter.success("application container is up");

    let health_url = join_url(app_url, health_path);
    reporter.wait(&format!("probing {health_url}..."));
    let health = match http.get_status(&health_url, None).await {
        Ok(status) => HealthOutcome::from_status(status),
        Err(e) => HealthOutcome::Unhealthy {
            reason: format!("{e:#}"),
        },
    };
    match &health {
        HealthOutcome::Healthy { status } => {
            reporter.success(&format!("{health_url} answered {status}"));
        }
        HealthOutcome::Unhealthy { reason } => {
            reporter.warn(&format!("{health_url} not healthy yet: {reason}"));
        }
    }

    let journal = runner
        .run(ctx, "journalctl", &["-k", "--since", "today", "--no-pager"])
        .await
        .context("reading kernel log")?;
    let entries = filesystem_errors(&String::from_utf8_lossy(&journal.stdout));
    if !entries.is_empty() {
        return Err(VerificationError::FilesystemErrors { entries }.into());
    }

    check_disk_stage(host, DiskStage::PostInstall).await?;

    Ok(VerificationReport { health_url, health })
}
