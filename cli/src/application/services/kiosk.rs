//! Application service — kiosk browser session.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{
    CommandRunner, ExecContext, HostProbe, LocalFs, ProgressReporter, TemplateSource,
};
use crate::application::services::artifacts::ArtifactWriter;
use crate::application::services::secrets::PUBLIC_FILE_MODE;
use crate::domain::ProvisionConfig;
use crate::domain::artifacts::{
    self, BROWSERS, blanking_script_path, kiosk_command, kiosk_variables, loading_page_path,
    select_browser,
};

/// Mode for the screen-blanking helper script.
pub const SCRIPT_MODE: u32 = 0o755;

/// Install the loading page, autostart entries and blanking helper for
/// the login user, then hand ownership of the user directories back.
///
/// When no known browser is on `PATH` the first candidate is used by name
/// and a warning is emitted; the kiosk packages install it on a later boot.
///
/// # Errors
///
/// Returns an error if an artifact cannot be written or `chown` fails.
pub async fn configure_kiosk(
    runner: &impl CommandRunner,
    host: &impl HostProbe,
    writer: &ArtifactWriter<'_, impl TemplateSource, impl LocalFs>,
    reporter: &impl ProgressReporter,
    ctx: &ExecContext,
    cfg: &ProvisionConfig,
    app_url: &str,
) -> Result<Vec<PathBuf>> {
    let page = loading_page_path(cfg);
    let (candidate, browser) = match select_browser(BROWSERS, |name| host.find_executable(name)) {
        Some(found) => found,
        None => {
            let fallback = BROWSERS[0];
            reporter.warn(&format!(
                "no supported browser on PATH, defaulting to {}",
                fallback.binary
            ));
            (fallback, PathBuf::from(fallback.binary))
        }
    };
    tracing::info!(browser = %browser.display(), "kiosk browser selected");

    let command = kiosk_command(&browser, &candidate, &page);
    let vars = kiosk_variables(cfg, app_url, &command);
    let autostart = cfg.autostart_dir();

    let written = vec![
        writer.render(artifacts::LOADING_PAGE, &vars, &page, PUBLIC_FILE_MODE)?,
        writer.render(
            artifacts::KIOSK_DESKTOP,
            &vars,
            &autostart.join(format!("{}-kiosk.desktop", cfg.app_name)),
            PUBLIC_FILE_MODE,
        )?,
        writer.render(
            artifacts::BLANKING_SCRIPT,
            &vars,
            &blanking_script_path(cfg),
            SCRIPT_MODE,
        )?,
        writer.render(
            artifacts::BLANKING_DESKTOP,
            &vars,
            &autostart.join(format!("{}-disable-blanking.desktop", cfg.app_name)),
            PUBLIC_FILE_MODE,
        )?,
    ];

    let owner = format!("{0}:{0}", cfg.user());
    for dir in [autostart, cfg.script_dir()] {
        let dir = dir.display().to_string();
        let output = runner
            .run(ctx, "chown", &["-R", &owner, &dir])
            .await
            .with_context(|| format!("changing owner of {dir}"))?;
        anyhow::ensure!(
            output.status.success(),
            "chown -R {owner} {dir} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    reporter.success(&format!("kiosk session installed for {}", cfg.user()));
    Ok(written)
}
