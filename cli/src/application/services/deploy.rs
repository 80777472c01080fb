//! Application service — image build, stack launch and unit registration.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, ExecContext, HostProbe, LocalFs, ProgressReporter, TemplateSource,
};
use crate::application::services::artifacts::ArtifactWriter;
use crate::application::services::preflight::check_disk_stage;
use crate::domain::artifacts::{app_unit, hardware_unit};
use crate::domain::{DiskStage, ProvisionConfig};

/// Build the application image after re-checking disk space.
///
/// # Errors
///
/// Returns `InsufficientDiskSpace` below the pre-build threshold, or an
/// error if the build fails.
pub async fn build_image(
    runner: &impl CommandRunner,
    host: &impl HostProbe,
    reporter: &impl ProgressReporter,
    ctx: &ExecContext,
) -> Result<()> {
    check_disk_stage(host, DiskStage::PreBuild).await?;

    reporter.step("building application image...");
    let status = runner
        .run_status(ctx, "docker", &["compose", "build"])
        .await
        .context("running docker compose build")?;
    anyhow::ensure!(status.success(), "docker compose build failed ({status})");
    Ok(())
}

/// Start the compose stack in the background.
///
/// # Errors
///
/// Returns an error if `docker compose up -d` fails.
pub async fn launch_compose(runner: &impl CommandRunner, ctx: &ExecContext) -> Result<()> {
    let status = runner
        .run_status(ctx, "docker", &["compose", "up", "-d"])
        .await
        .context("running docker compose up")?;
    anyhow::ensure!(status.success(), "docker compose up -d failed ({status})");
    Ok(())
}

/// Write and enable the app and hardware units.
///
/// The hardware unit is only written and started when its entrypoint
/// exists in the project; otherwise a warning is emitted and it is skipped.
///
/// # Errors
///
/// Returns an error if a unit cannot be written or `systemctl` fails.
pub async fn register_services(
    runner: &impl CommandRunner,
    writer: &ArtifactWriter<'_, impl TemplateSource, impl LocalFs>,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    ctx: &ExecContext,
    cfg: &ProvisionConfig,
) -> Result<()> {
    let app = app_unit(cfg);
    writer.write_unit(&app, &cfg.unit_dir)?;

    let entrypoint = cfg.project_dir.join(&cfg.hardware_entrypoint);
    let hardware = fs.exists(&entrypoint).then(|| hardware_unit(cfg));
    if let Some(unit) = &hardware {
        writer.write_unit(unit, &cfg.unit_dir)?;
    } else {
        reporter.warn(&format!(
            "{} not found, skipping hardware service",
            entrypoint.display()
        ));
    }

    systemctl(runner, ctx, &["daemon-reload"]).await?;
    systemctl(runner, ctx, &["enable", &app.file_name()]).await?;
    reporter.success(&format!("enabled {}", app.file_name()));

    if let Some(unit) = hardware {
        systemctl(runner, ctx, &["enable", "--now", &unit.file_name()]).await?;
        reporter.success(&format!("started {}", unit.file_name()));
    }
    Ok(())
}

async fn systemctl(runner: &impl CommandRunner, ctx: &ExecContext, args: &[&str]) -> Result<()> {
    let output = runner
        .run(ctx, "systemctl", args)
        .await
        .with_context(|| format!("running systemctl {}", args.join(" ")))?;
    anyhow::ensure!(
        output.status.success(),
        "systemctl {} failed: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stderr).trim()
    );
    Ok(())
}
