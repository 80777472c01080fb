//! Application service — host prerequisite checks.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{HostProbe, LocalFs, ProgressReporter};
use crate::domain::preflight::{self, REQUIRED_FILES};
use crate::domain::{DiskStage, ValidationError};

/// Run every pre-install check.
///
/// Order: privileges, platform (soft), disk at [`DiskStage::PreInstall`],
/// memory, then the project's required input files. Platform mismatches are
/// reported through `reporter` and never abort.
///
/// # Errors
///
/// Returns the first hard [`ValidationError`], or an error if the host
/// could not be probed.
pub async fn run_preflight(
    host: &impl HostProbe,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    project_dir: &Path,
) -> Result<()> {
    if !host.is_root().await.context("checking privileges")? {
        return Err(ValidationError::NotRoot.into());
    }

    let info = host.host_info().await.context("probing host resources")?;
    tracing::info!(
        model = info.device_model.as_deref().unwrap_or("<unknown>"),
        free_disk_gb = info.free_disk_gb(),
        total_memory_mb = info.total_memory_mb,
        "host probed"
    );

    for warning in preflight::validate(&info, DiskStage::PreInstall.required_gb())? {
        reporter.warn(&warning.to_string());
    }

    preflight::check_required_files(project_dir, REQUIRED_FILES, |p| fs.exists(p))?;
    Ok(())
}

/// Re-check free disk space at a later stage of the run.
///
/// # Errors
///
/// Returns `InsufficientDiskSpace` when the stage's threshold is not met.
pub async fn check_disk_stage(host: &impl HostProbe, stage: DiskStage) -> Result<()> {
    let info = host.host_info().await.context("probing free disk space")?;
    preflight::check_disk(&info, stage.required_gb())?;
    tracing::debug!(?stage, free_disk_gb = info.free_disk_gb(), "disk check passed");
    Ok(())
}
