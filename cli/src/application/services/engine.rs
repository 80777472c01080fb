//! Application service — system packages and container engine setup.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ExecContext, Fetcher, ProgressReporter};
use crate::application::services::retry::{download_with_retry, wait_for_service};
use crate::domain::RetryPolicy;
use crate::domain::retry::DEFAULT_SERVICE_TIMEOUT_SECS;

/// Packages every run installs.
pub const BASE_PACKAGES: &[&str] = &["curl", "git", "ca-certificates", "python3", "python3-pip"];

/// Extra packages for the kiosk display session.
pub const KIOSK_PACKAGES: &[&str] = &["chromium-browser", "unclutter", "x11-xserver-utils"];

/// Upstream convenience installer for the container engine.
pub const ENGINE_INSTALLER_URL: &str = "https://get.docker.com";

/// Where the installer script is downloaded to.
pub const ENGINE_INSTALLER_PATH: &str = "/tmp/get-docker.sh";

fn apt_context(base: &ExecContext) -> ExecContext {
    base.clone().with_env("DEBIAN_FRONTEND", "noninteractive")
}

/// Refresh the package index and install the required packages.
///
/// # Errors
///
/// Returns an error if `apt-get` cannot run or exits non-zero.
pub async fn install_packages(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    ctx: &ExecContext,
    kiosk: bool,
) -> Result<()> {
    let apt = apt_context(ctx);

    reporter.step("refreshing package index...");
    let status = runner
        .run_status(&apt, "apt-get", &["update"])
        .await
        .context("running apt-get update")?;
    anyhow::ensure!(status.success(), "apt-get update failed ({status})");

    let mut args = vec!["install", "-y"];
    args.extend_from_slice(BASE_PACKAGES);
    if kiosk {
        args.extend_from_slice(KIOSK_PACKAGES);
    }
    reporter.step(&format!("installing {} packages...", args.len() - 2));
    let status = runner
        .run_status(&apt, "apt-get", &args)
        .await
        .context("running apt-get install")?;
    anyhow::ensure!(status.success(), "apt-get install failed ({status})");
    Ok(())
}

/// Install and start the container engine for `user`.
///
/// The upstream installer only runs when `docker --version` fails. The
/// compose plugin, group membership and unit enablement are applied every
/// time.
///
/// # Errors
///
/// Returns `DownloadError` when the installer cannot be fetched,
/// `ServiceTimeout` when the engine never becomes active, or an error for
/// any failing command.
pub async fn install_container_engine(
    runner: &impl CommandRunner,
    fetcher: &impl Fetcher,
    reporter: &impl ProgressReporter,
    ctx: &ExecContext,
    user: &str,
    policy: &RetryPolicy,
) -> Result<()> {
    let present = runner
        .run(ctx, "docker", &["--version"])
        .await
        .is_ok_and(|o| o.status.success());

    if present {
        reporter.success("container engine already installed");
    } else {
        reporter.wait("downloading container engine installer...");
        let script = Path::new(ENGINE_INSTALLER_PATH);
        download_with_retry(fetcher, ENGINE_INSTALLER_URL, script, policy).await?;

        reporter.step("running container engine installer...");
        let status = runner
            .run_status(ctx, "sh", &[ENGINE_INSTALLER_PATH])
            .await
            .context("running container engine installer")?;
        anyhow::ensure!(status.success(), "container engine installer failed ({status})");
    }

    let compose = runner
        .run(ctx, "docker", &["compose", "version"])
        .await
        .is_ok_and(|o| o.status.success());
    if !compose {
        reporter.step("installing compose plugin...");
        let status = runner
            .run_status(&apt_context(ctx), "apt-get", &["install", "-y", "docker-compose-plugin"])
            .await
            .context("installing docker-compose-plugin")?;
        anyhow::ensure!(status.success(), "docker-compose-plugin install failed ({status})");
    }

    for (program, args) in [
        ("usermod", vec!["-aG", "docker", user]),
        ("systemctl", vec!["enable", "docker"]),
        ("systemctl", vec!["start", "docker"]),
    ] {
        let output = runner
            .run(ctx, program, &args)
            .await
            .with_context(|| format!("running {program} {}", args.join(" ")))?;
        anyhow::ensure!(
            output.status.success(),
            "{program} {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    reporter.wait("waiting for container engine...");
    wait_for_service(runner, ctx, "docker", DEFAULT_SERVICE_TIMEOUT_SECS).await?;
    Ok(())
}
