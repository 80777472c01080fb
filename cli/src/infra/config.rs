//! Configuration loading from `KIOSK_*` environment variables.

use anyhow::{Context, Result};

use crate::domain::config::ProvisionConfig;

/// Prefix for every provisioning environment variable.
pub const ENV_PREFIX: &str = "KIOSK_";

/// Load the provisioning config from the process environment, resolve the
/// defaults that depend on the invoking user and anchor a relative project
/// directory at the current working directory.
///
/// # Errors
///
/// Returns an error if a `KIOSK_*` variable has the wrong type or the
/// current directory cannot be determined.
pub fn load_from_env() -> Result<ProvisionConfig> {
    let config: ProvisionConfig = envy::prefixed(ENV_PREFIX)
        .from_env()
        .context("invalid KIOSK_* configuration")?;
    let cwd = std::env::current_dir().context("resolving current directory")?;
    let config = config
        .resolve(std::env::var("SUDO_USER").ok())
        .anchored(&cwd);
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}
